use rand::Rng;
use tracing::trace;

use crate::calendar::Calendar;

/// Source of birthdays, each uniformly distributed over `0..days`.
pub trait Draw {
    fn draw(&mut self, days: usize) -> usize;
}

impl<R: Rng> Draw for R {
    fn draw(&mut self, days: usize) -> usize {
        self.gen_range(0..days)
    }
}

// one line of emperors, from an empty calendar until every day is a holiday
#[derive(Debug)]
pub struct Trial {
    calendar: Calendar,
    emperors: u64,
}

impl Trial {
    pub fn new(days: usize) -> anyhow::Result<Self> {
        Ok(Self {
            calendar: Calendar::new(days)?,
            emperors: 0,
        })
    }

    pub fn crown(&mut self, birthday: usize) -> anyhow::Result<()> {
        self.calendar.mark_with_closure(birthday)?;
        self.emperors += 1;
        trace!(
            "emperor #{} has birthday on {birthday}: {}",
            self.emperors,
            self.calendar
        );
        Ok(())
    }

    pub fn emperors(&self) -> u64 {
        self.emperors
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn is_over(&self) -> bool {
        self.calendar.is_full()
    }
}

/// Crowns emperors with birthdays from `source` until every day of a
/// `days`-day year is a holiday, and returns how many were crowned.
///
/// Birthdays that are already holidays still count. The loop has no upper
/// bound, a source that never covers the year never returns.
pub fn run_trial(days: usize, source: &mut impl Draw) -> anyhow::Result<u64> {
    let mut trial = Trial::new(days)?;
    while !trial.is_over() {
        trial.crown(source.draw(days))?
    }
    Ok(trial.emperors())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    use crate::calendar::{IndexOutOfRange, InvalidSize};

    use super::*;

    struct Script(VecDeque<usize>);

    impl Draw for Script {
        fn draw(&mut self, _: usize) -> usize {
            self.0.pop_front().expect("script exhausted")
        }
    }

    fn script(birthdays: &[usize]) -> Script {
        Script(birthdays.iter().copied().collect())
    }

    #[test]
    fn scripted() -> anyhow::Result<()> {
        // 2 bridges 1, 4 bridges 3, 6 bridges 5 and fills the year
        let mut source = script(&[0, 2, 2, 4, 6, 7]);
        anyhow::ensure!(run_trial(7, &mut source)? == 5);
        anyhow::ensure!(source.0 == [7]);
        Ok(())
    }

    #[test]
    fn repeated_birthdays_count() -> anyhow::Result<()> {
        let mut source = script(&[1, 1, 1, 3]);
        anyhow::ensure!(run_trial(4, &mut source)? == 4);
        Ok(())
    }

    #[test]
    fn tiny_years() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(121212);
        for _ in 0..100 {
            anyhow::ensure!(run_trial(1, &mut rng)? == 1);
            anyhow::ensure!(run_trial(2, &mut rng)? == 1)
        }
        Ok(())
    }

    #[test]
    fn invalid_size() {
        let err = run_trial(0, &mut script(&[])).unwrap_err();
        assert!(err.is::<InvalidSize>())
    }

    #[test]
    fn faulty_source() -> anyhow::Result<()> {
        let err = run_trial(3, &mut script(&[0, 3])).unwrap_err();
        anyhow::ensure!(err.is::<IndexOutOfRange>());
        let mut trial = Trial::new(3)?;
        trial.crown(0)?;
        anyhow::ensure!(trial.crown(3).is_err());
        anyhow::ensure!(trial.emperors() == 1);
        Ok(())
    }

    #[test]
    fn states() -> anyhow::Result<()> {
        let mut trial = Trial::new(3)?;
        anyhow::ensure!(trial.calendar().marked_count() == 0 && !trial.is_over());
        trial.crown(1)?;
        anyhow::ensure!(trial.calendar().marked_count() == 1 && !trial.is_over());
        trial.crown(0)?;
        // day 2 sits between 1 and 0 across the year end
        anyhow::ensure!(trial.is_over());
        anyhow::ensure!(trial.emperors() == 2);
        Ok(())
    }

    #[test]
    fn permutation_bounded_by_days() {
        arbtest::arbtest(|u| {
            let days = u.int_in_range(1..=200)?;
            let mut birthdays = (0..days).collect::<Vec<_>>();
            birthdays.shuffle(&mut StdRng::seed_from_u64(u.arbitrary()?));
            let mut source = script(&birthdays);
            let emperors = run_trial(days, &mut source).unwrap();
            assert!(emperors >= 1);
            assert!(emperors <= days as u64);
            // every birthday short of `days` was saved by a bridge day
            assert_eq!(source.0.len(), days - emperors as usize);
            Ok(())
        });
    }

    #[test]
    fn uniform_always_terminates() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        for days in 1..50 {
            let emperors = run_trial(days, &mut rng)?;
            anyhow::ensure!(emperors >= 1, "{days} days took {emperors} emperors")
        }
        Ok(())
    }

    #[test]
    fn five_day_year() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(121212);
        let trials = 20_000;
        let mut total = 0;
        for _ in 0..trials {
            total += run_trial(5, &mut rng)?
        }
        let mean = total as f64 / trials as f64;
        // E(5) = 31/6
        anyhow::ensure!((mean - 31. / 6.).abs() < 0.15, "mean {mean}");
        Ok(())
    }
}
