use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stm_core::{Action, Stm, Transaction};

pub fn criterion_benchmark(c: &mut Criterion) {
    let stm = Stm::create();
    let bool_var = stm.new_tvar(false);
    let u32_var = stm.new_tvar(21123_u32);
    let struct_var = stm.new_tvar((1.0_f64, 2.5_f64, 4.9_f64));

    let mut group = c.benchmark_group("tvar-write-transactional");

    group.bench_function("bool", |b| {
        b.iter(|| {
            let var = bool_var.clone();
            stm.perform(vec![
                Box::new(move |tx: &mut Transaction| tx.write(&var, black_box(true))) as Action,
            ])
            .unwrap();
        })
    });
    group.bench_function("u32", |b| {
        b.iter(|| {
            let var = u32_var.clone();
            stm.perform(vec![
                Box::new(move |tx: &mut Transaction| tx.write(&var, black_box(21424))) as Action,
            ])
            .unwrap();
        })
    });
    group.bench_function("struct", |b| {
        b.iter(|| {
            let var = struct_var.clone();
            stm.perform(vec![Box::new(move |tx: &mut Transaction| {
                tx.write(&var, black_box((2.0, 1.0, 3.1)))
            }) as Action])
            .unwrap();
        })
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
