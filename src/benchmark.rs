use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reg_thompson::{compile, parser::add_concat};

fn nested_pattern(depth: usize) -> String {
    (0..depth).fold(String::from("a"), |inner, level| {
        let symbol = char::from(b'a' + (level % 26) as u8);
        format!("({}|{}{})*{}", inner, symbol, symbol, symbol)
    })
}

fn criterion_benchmark_compile(c: &mut Criterion) {
    let pattern = nested_pattern(64);
    c.bench_function("expand nested pattern", |b| {
        b.iter(|| add_concat(black_box(&pattern)))
    });
    c.bench_function("compile nested pattern", |b| {
        b.iter(|| compile(black_box(&pattern)).unwrap())
    });

    let nfa = compile(&pattern).unwrap();
    c.bench_function("traverse nested pattern", |b| {
        b.iter(|| black_box(&nfa).edges().count())
    });
}

criterion_group!(benches, criterion_benchmark_compile);
criterion_main!(benches);
