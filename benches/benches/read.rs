use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stm_core::{Action, Stm, Transaction};

pub fn criterion_benchmark(c: &mut Criterion) {
    let stm = Stm::create();
    let bool_var = black_box(stm.new_tvar(false));
    let u32_var = black_box(stm.new_tvar(21123_u32));
    let struct_var = black_box(stm.new_tvar((1.0_f64, 2.5_f64, 4.9_f64)));

    let mut atomic_group = c.benchmark_group("tvar-read-atomic");
    atomic_group.bench_function("bool", |b| b.iter(|| black_box(bool_var.read_atomic())));
    atomic_group.bench_function("u32", |b| b.iter(|| black_box(u32_var.read_atomic())));
    atomic_group.bench_function("struct", |b| {
        b.iter(|| black_box(struct_var.read_atomic()))
    });
    atomic_group.finish();

    let mut tx_group = c.benchmark_group("tvar-read-transactional");
    tx_group.bench_function("u32", |b| {
        b.iter(|| {
            let var = u32_var.clone();
            stm.perform(vec![Box::new(move |tx: &mut Transaction| {
                black_box(tx.read(&var));
                true
            }) as Action])
            .unwrap();
        })
    });
    tx_group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
