use std::env::args;

use holidays::{experiment, Settings};
use tracing::info;

fn main() -> anyhow::Result<()> {
    use tracing::Level;
    use tracing_subscriber::{
        filter::Targets, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };
    tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_writer(std::io::stderr)
        .finish()
        .with(if let Ok(var) = std::env::var("RUST_LOG") {
            var.parse()?
        } else {
            Targets::new().with_default(Level::INFO)
        })
        .init();

    let mut settings = Settings::default();
    if let Some(days) = args().nth(1) {
        settings.days = days.parse()?
    }
    if let Some(trials) = args().nth(2) {
        settings.trials = trials.parse()?
    }
    if let Some(seed) = args().nth(3) {
        settings.seed = seed.parse()?
    }
    if let Some(workers) = args().nth(4) {
        settings.workers = workers.parse()?
    }

    info!("We're on planet J. A year consists of {} days.", settings.days);
    let report = experiment::run(&settings)?;
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
