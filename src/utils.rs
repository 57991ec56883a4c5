use bitflags::bitflags;

bitflags! {
    #[derive(Default)]
    pub struct CompileFlags: u32 {
        const NO_FLAG = 0;
        /// The pattern already spells out every concatenation with `.`.
        const EXPLICIT_CONCAT = 1 << 1;
        /// Report each pipeline stage at `info` level instead of `debug`.
        const DEBUG = 1 << 2;
    }
}

impl CompileFlags {
    pub(crate) fn stage_level(&self) -> log::Level {
        if self.intersects(CompileFlags::DEBUG) {
            log::Level::Info
        } else {
            log::Level::Debug
        }
    }
}
