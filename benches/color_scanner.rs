use criterion::{black_box, criterion_group, criterion_main, Criterion};

use svgreplay::color_to_hex;

static NOISY: &str = "function(#someurl, 0) nonexistent rgb( 3 ,4,5 ) white";

fn color_scanner(c: &mut Criterion) {
    c.bench_function("hex shorthand", |b| {
        b.iter(|| color_to_hex(black_box("#9ab")));
    });

    c.bench_function("color keyword", |b| {
        b.iter(|| color_to_hex(black_box("cornflowerblue")));
    });

    c.bench_function("first color in noisy descriptor", |b| {
        b.iter(|| color_to_hex(black_box(NOISY)));
    });
}

criterion_group!(benches, color_scanner);
criterion_main!(benches);
