use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use regressions::metrics::mean_relative_error;
use regressions::{KNearestNeighbors, Matrix};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== K-Nearest Neighbours: house prices ===\n");

    // price grows with living area and falls with distance from the centre
    let mut rng = StdRng::seed_from_u64(1);
    let features = Matrix::random_using((500, 2), Uniform::new(0.0, 1.0), &mut rng);
    let prices = features
        .rows()
        .into_iter()
        .map(|row| 200_000.0 + 400_000.0 * row[0] - 150_000.0 * row[1])
        .collect::<Vec<_>>();
    let prices = regressions::Vector::from(prices);

    let n_train = 450;
    let train_x = features.slice(ndarray::s![..n_train, ..]).to_owned();
    let train_y = prices.slice(ndarray::s![..n_train]).to_owned();
    let test_x = features.slice(ndarray::s![n_train.., ..]).to_owned();
    let test_y = prices.slice(ndarray::s![n_train..]).to_owned();

    let mut knn = KNearestNeighbors::new(10)?;
    knn.fit(&train_x, &train_y)?;

    let predictions = knn.predict(&test_x)?;
    for (actual, guess) in test_y.iter().zip(predictions.iter()).take(5) {
        let err = (actual - guess) / actual;
        println!("  Error: {:.2}%", err * 100.0);
    }

    let mre = mean_relative_error(test_y.view(), predictions.view())?;
    println!("\nMean relative error over {} points: {:.2}%", test_y.len(), mre * 100.0);

    Ok(())
}
