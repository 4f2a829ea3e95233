use criterion::{criterion_group, criterion_main, Criterion};

use stm_core::{Action, Stm, Transaction};

/// Measures commit throughput when several threads contend for the same
/// cell, each retrying under the global commit mutex until its own
/// increment lands.
pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("commit-under-contention");

    for thread_count in [2usize, 4, 8] {
        group.bench_function(format!("{thread_count}-threads"), |b| {
            b.iter(|| {
                let stm = Stm::create();
                let counter = stm.new_tvar(0_i64);

                std::thread::scope(|scope| {
                    for _ in 0..thread_count {
                        let var = counter.clone();
                        let stm = stm.clone();
                        scope.spawn(move || {
                            stm.perform(vec![Box::new(move |tx: &mut Transaction| {
                                let current = tx.read(&var);
                                tx.write(&var, current + 1)
                            }) as Action])
                            .unwrap();
                        });
                    }
                });

                assert_eq!(counter.read_atomic(), thread_count as i64);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
