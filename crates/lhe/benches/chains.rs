use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lhe::{EvaluatorSession, RelinPolicy, SchemeProfile};
use lhe_rlwe::{Encoding, Plaintext, RlweParameters, RlweProvider};
use lhe_traits::FheEncoder;
use rand::thread_rng;
use std::time::Duration;

pub fn chains_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("chains");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(600));
    group.measurement_time(Duration::from_millis(1000));

    let mut rng = thread_rng();
    for degree in [16, 64] {
        let par = RlweParameters::bgv_arc(2, degree).unwrap();
        let session = EvaluatorSession::new(
            SchemeProfile::integer(2, 3).unwrap(),
            RlweProvider::new(&par),
            &mut rng,
        )
        .unwrap();
        let cts = [2u64, 3, 4]
            .iter()
            .map(|v| {
                let pt = Plaintext::try_encode(&[*v] as &[u64], Encoding::integer(), &par).unwrap();
                session.encrypt(&pt, &mut rng).unwrap()
            })
            .collect::<Vec<_>>();

        for policy in [RelinPolicy::Eager, RelinPolicy::Deferred] {
            group.bench_function(
                BenchmarkId::new(format!("multiply_chain/{policy}"), degree),
                |b| b.iter(|| session.evaluate_multiply_chain(&cts, policy).unwrap()),
            );
        }

        group.bench_function(BenchmarkId::new("add_chain", degree), |b| {
            b.iter(|| session.evaluate_add_chain(&cts).unwrap())
        });
    }

    group.finish();
}

criterion_group!(chains, chains_benchmark);
criterion_main!(chains);
