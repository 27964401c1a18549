// a year on planet J has `D` days. every emperor declares their birthday a
// holiday, and a day whose both neighbours are holidays becomes one as well.
// the question is how many emperors it takes on average until the whole year
// is holidays
//
// `calendar` is the only place that knows about the bridge day rule, `trial`
// only feeds it birthdays and counts, and `experiment` repeats trials with one
// generator per trial so that the worker count never changes the numbers

pub mod calendar;
pub mod experiment;
pub mod trial;

pub use calendar::{Calendar, IndexOutOfRange, InvalidSize};
pub use experiment::{InvalidSettings, Report, Settings};
pub use trial::{run_trial, Draw, Trial};
