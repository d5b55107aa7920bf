use regressions::{CsvOptions, Dataset, LogisticRegression, TrainingConfig};

const CARS: &str = "\
displacement,horsepower,weight,passedemissions
307,130,1.752,FALSE
350,165,1.8465,FALSE
318,150,1.718,FALSE
304,150,1.7165,FALSE
302,140,1.7245,FALSE
429,198,2.1705,FALSE
454,220,2.177,FALSE
440,215,2.156,FALSE
455,225,2.2125,FALSE
390,190,1.925,FALSE
113,95,1.186,TRUE
198,95,1.4165,TRUE
199,97,1.387,TRUE
200,85,1.4935,TRUE
97,88,1.065,TRUE
97,46,0.9175,TRUE
110,87,1.336,TRUE
107,90,1.215,TRUE
104,95,1.1875,TRUE
121,113,1.1615,TRUE
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== Logistic Regression: emissions test ===\n");

    let options = CsvOptions::new(&["displacement", "horsepower", "weight"], &["passedemissions"])
        .with_converter("passedemissions", |v| if v == "TRUE" { 1.0 } else { 0.0 });
    let dataset = Dataset::from_csv_reader(CARS.as_bytes(), &options)?.shuffle(3);
    let (train, test) = dataset.split(6)?;

    let config = TrainingConfig::default()
        .with_learning_rate(0.5)
        .with_iterations(100)
        .with_batch_size(7);
    let mut model = LogisticRegression::new(&train.features, &train.labels, config)?;
    model.train();

    let accuracy = model.test(&test.features, &test.labels)?;
    println!("Accuracy: {:.1}%", accuracy * 100.0);

    let probabilities = model.predict_proba(&test.features)?;
    let predictions = model.predict(&test.features)?;
    for i in 0..test.n_samples() {
        println!(
            "  actual={:.0} predicted={:.0} p={:.3}",
            test.labels[(i, 0)],
            predictions[(i, 0)],
            probabilities[(i, 0)]
        );
    }

    let history: Vec<f64> = model.cost_history().iter().rev().copied().collect();
    println!("\nCross-entropy, first and last epoch: {:.4} → {:.4}", history[0], history[history.len() - 1]);

    Ok(())
}
