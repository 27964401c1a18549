use std::{num::NonZeroUsize, thread};

use derive_more::{Display, Error};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::trial::run_trial;

#[derive(Debug, Display, Error)]
#[display(fmt = "invalid settings: {}", reason)]
pub struct InvalidSettings {
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub days: usize,
    pub trials: usize,
    pub seed: u64,
    pub workers: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            days: 10_000,
            trials: 250,
            seed: 121212,
            workers: 1,
        }
    }
}

impl Settings {
    pub fn new(days: usize, trials: usize) -> Self {
        Self {
            days,
            trials,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub days: usize,
    pub trials: usize,
    pub seed: u64,
    /// Emperors crowned in each trial, in trial order.
    pub emperors: Vec<u64>,
    /// Mean over the first `i + 1` trials at index `i`.
    pub running_mean: Vec<f64>,
    pub mean: f64,
}

// trial `index` always draws from the same generator, whichever worker runs it
fn trial_rng(seed: u64, index: usize) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add(index as u64))
}

pub fn run(settings: &Settings) -> anyhow::Result<Report> {
    anyhow::ensure!(
        settings.trials > 0,
        InvalidSettings {
            reason: "at least one trial is required"
        }
    );
    let Some(workers) = NonZeroUsize::new(settings.workers) else {
        anyhow::bail!(InvalidSettings {
            reason: "at least one worker is required"
        })
    };
    let emperors = if workers.get() == 1 {
        (0..settings.trials)
            .map(|index| trial(settings, index))
            .collect::<anyhow::Result<Vec<_>>>()?
    } else {
        run_parallel(settings, workers)?
    };

    let mut running_mean = Vec::with_capacity(emperors.len());
    let mut total = 0;
    for (index, &count) in emperors.iter().enumerate() {
        total += count;
        running_mean.push(total as f64 / (index + 1) as f64)
    }
    let mean = running_mean.last().copied().unwrap_or_default();
    info!("E({}) = {mean} over {} trials", settings.days, settings.trials);
    Ok(Report {
        days: settings.days,
        trials: settings.trials,
        seed: settings.seed,
        emperors,
        running_mean,
        mean,
    })
}

fn trial(settings: &Settings, index: usize) -> anyhow::Result<u64> {
    let emperors = run_trial(settings.days, &mut trial_rng(settings.seed, index))?;
    debug!("trial #{index}: {emperors} emperors until the calendar was full");
    Ok(emperors)
}

fn run_parallel(settings: &Settings, workers: NonZeroUsize) -> anyhow::Result<Vec<u64>> {
    let workers = workers.get().min(settings.trials);
    let results = thread::scope(|scope| {
        let handles = (0..workers)
            .map(|worker| {
                scope.spawn(move || {
                    (worker..settings.trials)
                        .step_by(workers)
                        .map(|index| anyhow::Ok((index, trial(settings, index)?)))
                        .collect::<anyhow::Result<Vec<_>>>()
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(_) => Err(anyhow::anyhow!("trial worker panicked")),
            })
            .collect::<anyhow::Result<Vec<_>>>()
    })?;

    let mut emperors = vec![0; settings.trials];
    for (index, count) in results.into_iter().flatten() {
        emperors[index] = count
    }
    Ok(emperors)
}
