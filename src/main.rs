use mlpnet::{
    correctness, load, samples_from_rows, save, train, Activation, Cost, Network, TrainOptions,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> mlpnet::Result<()> {
    env_logger::init();

    // Classic XOR dataset.
    let xs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let ys = vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]];
    let mut samples = samples_from_rows(&xs, &ys);

    let mut rng = StdRng::seed_from_u64(2);
    let mut nn = Network::with_rng(
        &[2, 2, 1],
        &[Activation::Sigmoid, Activation::Sigmoid],
        &mut rng,
    )?;

    train(
        &mut nn,
        &mut samples,
        TrainOptions {
            epochs: 1000,
            mini_batch_size: 4,
            learning_rate: 3.0,
            cost: Cost::CrossEntropy,
            epoch_hook: Some(Box::new(|epoch, elapsed| {
                if epoch % 250 == 0 {
                    println!("epoch {epoch} ({elapsed:?})");
                }
            })),
            ..TrainOptions::default()
        },
        &mut rng,
    )?;

    for x in &xs {
        println!("x={x:?} y={:.4}", nn.evaluate(x)[0]);
    }
    let eval = correctness(&nn, Cost::CrossEntropy, &samples);
    println!("avg_cost={:.4} error_rate={:.2}", eval.avg_cost, eval.error_rate);

    // Round-trip the parameters through the binary format.
    let mut buffer = Vec::new();
    save(&nn, &mut buffer)?;
    let mut restored = Network::with_rng(
        &[2, 2, 1],
        &[Activation::Sigmoid, Activation::Sigmoid],
        &mut rng,
    )?;
    load(&mut restored, buffer.as_slice())?;
    println!(
        "restored network agrees: {}",
        restored.evaluate(&xs[0]) == nn.evaluate(&xs[0])
    );

    Ok(())
}
