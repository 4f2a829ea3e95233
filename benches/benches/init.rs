use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stm_core::Stm;

pub fn criterion_benchmark(c: &mut Criterion) {
    let stm = Stm::create();

    let mut group = c.benchmark_group("tvar-init");
    group.bench_function("bool", |b| b.iter(|| black_box(stm.new_tvar(false))));
    group.bench_function("u32", |b| b.iter(|| black_box(stm.new_tvar(23123_u32))));
    group.bench_function("struct", |b| {
        b.iter(|| black_box(stm.new_tvar((1.0_f64, 2.5_f64, 4.9_f64))))
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
