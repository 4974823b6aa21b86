use bus_predictor::config::TrainConfig;
use bus_predictor::trainer::{self, TrainOptions};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = TrainConfig::from_env();
    let options = TrainOptions {
        num_samples: config.num_samples,
        seed: config.seed,
        ..TrainOptions::default()
    };

    let report = trainer::run(&config.models_dir, &options)?;
    tracing::info!(
        eta_model = %report.eta.regressor,
        eta_r2 = report.eta.r2,
        occupancy_r2 = report.occupancy.r2,
        "training completed successfully"
    );
    Ok(())
}
