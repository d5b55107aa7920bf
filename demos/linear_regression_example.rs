use ndarray::Axis;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use regressions::{Dataset, LinearRegression, Matrix, TrainingConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== Linear Regression (mini-batch gradient descent) ===\n");

    // mpg ≈ 50 - 0.1·horsepower - 8·weight + noise
    let mut rng = StdRng::seed_from_u64(42);
    let features = Matrix::random_using((200, 2), Uniform::new(0.0, 1.0), &mut rng);
    let horsepower = features.column(0).mapv(|v| 60.0 + 170.0 * v);
    let weight = features.column(1).mapv(|v| 0.8 + 1.6 * v);
    let noise = Matrix::random_using((200, 1), Uniform::new(-1.0, 1.0), &mut rng);

    let features = ndarray::stack(Axis(1), &[horsepower.view(), weight.view()])?;
    let labels = (50.0 - 0.1 * &horsepower - 8.0 * &weight).insert_axis(Axis(1)) + noise;

    let dataset = Dataset::new(features, labels)?.shuffle(7);
    let (train, test) = dataset.split(50)?;
    println!("Training samples: {}", train.n_samples());
    println!("Test samples: {}", test.n_samples());

    let config = TrainingConfig::default()
        .with_learning_rate(0.1)
        .with_iterations(100)
        .with_batch_size(10);
    let mut model = LinearRegression::new(&train.features, &train.labels, config)?;
    model.train();

    let r2 = model.test(&test.features, &test.labels)?;
    println!("\nR² on held-out data: {:.4}", r2);
    println!("Final learning rate: {:.5}", model.learning_rate());

    println!("\nMSE by epoch:");
    for (epoch, mse) in model.mse_history().iter().rev().enumerate().step_by(10) {
        println!("  {:>3}: {:.4}", epoch, mse);
    }

    let observations = ndarray::array![[155.0, 1.7], [68.0, 0.8]];
    let predictions = model.predict(&observations)?;
    println!("\nPredictions:");
    for (row, prediction) in observations.rows().into_iter().zip(predictions.iter()) {
        println!("  horsepower={:.0}, weight={:.1} → mpg {:.2}", row[0], row[1], prediction);
    }

    Ok(())
}
