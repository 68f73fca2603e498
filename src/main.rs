use dotenv::dotenv;
use std::env;
use std::str::FromStr;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use truckbot::infra::{CompositeObserver, DefaultObserver, GameObserver, RecordFile};
use truckbot::{Game, GameConfig};

fn get_env_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|val| val.parse::<T>().ok())
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("truckbot=info,warn"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging()?;

    let defaults = GameConfig::default();
    let config = GameConfig {
        seed: get_env_var("TRUCK_SEED").unwrap_or(defaults.seed),
        first_stage: get_env_var("TRUCK_FIRST_STAGE").unwrap_or(defaults.first_stage),
        stage_count: get_env_var("TRUCK_STAGE_COUNT").unwrap_or(defaults.stage_count),
        records_folder: env::var("TRUCK_RECORDS_FOLDER").ok(),
    };

    tracing::info!(
        "Seed {}, stages {}..{}",
        config.seed,
        config.first_stage,
        config.first_stage.saturating_add(config.stage_count)
    );

    let mut observers: Vec<Box<dyn GameObserver>> = vec![Box::new(DefaultObserver)];
    if let Some(folder) = &config.records_folder {
        tracing::info!("Recording stages to {}", folder);
        observers.push(Box::new(RecordFile::new(folder)?));
    }

    let mut game = Game::new(config, CompositeObserver::new(observers));
    let summary = game.run()?;
    tracing::info!(
        "Score {} ({} of {} stages complete)",
        summary.total_score,
        summary.complete,
        summary.stages
    );

    Ok(())
}
