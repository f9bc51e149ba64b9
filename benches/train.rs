use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mlpnet::{Activation, Backprop, Cost, Network, TrainingSample, WeightUpdates};

fn network_128_256_256_10() -> Network {
    Network::seeded(
        &[128, 256, 256, 10],
        &[Activation::Sigmoid, Activation::Sigmoid, Activation::Sigmoid],
        0,
    )
    .unwrap()
}

fn evaluate_bench(c: &mut Criterion) {
    let nn = network_128_256_256_10();
    let input = vec![0.1; nn.input_dim()];

    c.bench_function("evaluate_128_256_256_10", |b| {
        b.iter(|| {
            let out = nn.evaluate(black_box(&input));
            black_box(out);
        })
    });
}

fn process_bench(c: &mut Criterion) {
    let nn = network_128_256_256_10();
    let sample = TrainingSample::new(vec![0.1; nn.input_dim()], vec![0.0; nn.output_dim()]);
    let mut trainer = Backprop::new(&nn, Cost::Quadratic);
    let mut wu = WeightUpdates::new(&nn);

    c.bench_function("backprop_process_128_256_256_10", |b| {
        b.iter(|| {
            trainer.process(black_box(&nn), black_box(&sample), &mut wu);
            black_box(wu.biases(0)[0]);
        })
    });
}

criterion_group!(benches, evaluate_bench, process_bench);
criterion_main!(benches);
