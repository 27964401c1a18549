use std::fmt;

use derive_more::{Display, Error};
use tracing::trace;

#[derive(Debug, Display, Error)]
#[display(fmt = "invalid calendar size {}", days)]
pub struct InvalidSize {
    pub days: usize,
}

#[derive(Debug, Display, Error)]
#[display(fmt = "day {} out of range for a {}-day calendar", day, days)]
pub struct IndexOutOfRange {
    pub day: usize,
    pub days: usize,
}

// a year of `days` days arranged in a circle, day `days - 1` is followed by
// day 0. days only ever become holidays, never the other way around
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    holidays: Vec<bool>,
    marked: usize,
}

impl Calendar {
    pub fn new(days: usize) -> anyhow::Result<Self> {
        anyhow::ensure!(days >= 1, InvalidSize { days });
        Ok(Self {
            holidays: vec![false; days],
            marked: 0,
        })
    }

    pub fn days(&self) -> usize {
        self.holidays.len()
    }

    pub fn marked_count(&self) -> usize {
        self.marked
    }

    pub fn is_full(&self) -> bool {
        self.marked == self.days()
    }

    pub fn is_marked(&self, day: usize) -> anyhow::Result<bool> {
        self.check(day)?;
        Ok(self.holidays[day])
    }

    /// Declares `day` a holiday without looking at its neighbours.
    pub fn mark(&mut self, day: usize) -> anyhow::Result<()> {
        self.check(day)?;
        if !self.holidays[day] {
            self.holidays[day] = true;
            self.marked += 1
        }
        Ok(())
    }

    /// Declares `day` a holiday, then turns each of its two neighbours into a
    /// holiday if it has become a bridge day.
    ///
    /// Only the immediate neighbours are checked. A bridged neighbour already
    /// has both of its own neighbours marked, so nothing further can bridge
    /// from it.
    pub fn mark_with_closure(&mut self, day: usize) -> anyhow::Result<()> {
        self.mark(day)?;
        for neighbour in [self.prev(day), self.next(day)] {
            if self.is_bridge_day(neighbour)? {
                trace!("bridge day {neighbour}");
                self.mark(neighbour)?
            }
        }
        Ok(())
    }

    /// An unmarked day whose predecessor and successor are both marked.
    pub fn is_bridge_day(&self, day: usize) -> anyhow::Result<bool> {
        self.check(day)?;
        Ok(!self.holidays[day]
            && self.holidays[self.prev(day)]
            && self.holidays[self.next(day)])
    }

    fn check(&self, day: usize) -> anyhow::Result<()> {
        let days = self.days();
        anyhow::ensure!(day < days, IndexOutOfRange { day, days });
        Ok(())
    }

    fn prev(&self, day: usize) -> usize {
        (day + self.days() - 1) % self.days()
    }

    fn next(&self, day: usize) -> usize {
        (day + 1) % self.days()
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &holiday in &self.holidays {
            write!(f, "{}", if holiday { '#' } else { '.' })?
        }
        Ok(())
    }
}
