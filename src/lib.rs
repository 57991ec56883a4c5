//! Regular expression to NFA compiler built on Thompson's construction.
//!
//! A pattern over alphanumerics, `(`, `)`, `|` and `*` goes through four
//! stages: implicit concatenations are made explicit, the infix form is
//! turned into postfix with a shunting-yard pass, the postfix tokens are
//! folded into an automaton, and the automaton can then be walked edge by
//! edge.
//!
//! ```
//! let nfa = reg_thompson::compile("(a|b)*c").unwrap();
//! assert_eq!(nfa.state_count(), 10);
//! for edge in nfa.edges() {
//!     println!("{}", edge);
//! }
//! ```

pub mod fsm;
pub mod lexer;
pub mod parser;
pub mod traversal;
pub mod utils;

#[cfg(test)]
mod simulation;

pub use fsm::{Nfa, ReError, State, StateId};
pub use parser::ParserError;
pub use traversal::{Edge, Edges, Label};
pub use utils::CompileFlags;

pub fn compile(pattern: &str) -> Result<Nfa, ReError> {
    Nfa::compile(pattern)
}

pub fn compile_with_flags(pattern: &str, flags: CompileFlags) -> Result<Nfa, ReError> {
    Nfa::compile_with_flags(pattern, flags)
}
