use ndarray::Axis;
use ndarray_rand::rand_distr::Normal;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use regressions::dataset::one_hot;
use regressions::{Dataset, Matrix, MultinomialRegression, TrainingConfig};

const CENTERS: [[f64; 2]; 4] = [[0.0, 4.0], [4.0, 0.0], [0.0, -4.0], [-4.0, 0.0]];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== Multinomial Regression: 4 gaussian blobs ===\n");

    let mut rng = StdRng::seed_from_u64(11);
    let per_class = 100;
    let n = per_class * CENTERS.len();

    let mut features = Matrix::random_using((n, 2), Normal::new(0.0, 1.0)?, &mut rng);
    let mut classes = Vec::with_capacity(n);
    for (i, mut row) in features.axis_iter_mut(Axis(0)).enumerate() {
        let class = i % CENTERS.len();
        row[0] += CENTERS[class][0];
        row[1] += CENTERS[class][1];
        classes.push(class);
    }
    let labels = one_hot(&classes, CENTERS.len())?;

    let dataset = Dataset::new(features, labels)?.shuffle(5);
    let (train, test) = dataset.train_test_split(0.25)?;

    let config = TrainingConfig::default()
        .with_learning_rate(1.0)
        .with_iterations(40)
        .with_batch_size(50);
    let mut model = MultinomialRegression::new(&train.features, &train.labels, config)?;
    model.train();

    let accuracy = model.test(&test.features, &test.labels)?;
    println!("Accuracy: {:.1}%", accuracy * 100.0);

    let probe = ndarray::array![[0.2, 3.5], [3.0, -0.5], [-0.1, -5.0], [-6.0, 1.0]];
    let classes = model.predict(&probe)?;
    println!("Predicted classes for probe points: {:?}", classes.to_vec());

    println!("\nCost by epoch:");
    for (epoch, cost) in model.cost_history().iter().rev().enumerate().step_by(5) {
        println!("  {:>3}: {:.4}", epoch, cost);
    }

    Ok(())
}
