use chrono::{Datelike, Months, NaiveDate};

use super::period_model::{DateWindow, Period};
use crate::errors::{Error, Result};
use crate::transactions::Transaction;

/// Supplies the inception date of a portfolio.
pub trait InceptionLookup {
    /// Earliest transaction date, or `None` when there is no history.
    fn inception_date(&self) -> Option<NaiveDate>;
}

impl InceptionLookup for [Transaction] {
    fn inception_date(&self) -> Option<NaiveDate> {
        self.iter().map(|t| t.date).min()
    }
}

impl InceptionLookup for Vec<Transaction> {
    fn inception_date(&self) -> Option<NaiveDate> {
        self.as_slice().inception_date()
    }
}

impl InceptionLookup for Option<NaiveDate> {
    fn inception_date(&self) -> Option<NaiveDate> {
        *self
    }
}

/// Resolves `period` to a window ending on `reference_date`.
///
/// Month arithmetic clamps to month end, so three months before May 31st is
/// the last day of February. An inception after the reference date collapses
/// to the single reference day.
pub fn resolve<L>(period: Period, reference_date: NaiveDate, inception: &L) -> Result<DateWindow>
where
    L: InceptionLookup + ?Sized,
{
    let start = match period {
        Period::YearToDate => NaiveDate::from_ymd_opt(reference_date.year(), 1, 1)
            .ok_or_else(|| out_of_range(period, reference_date))?,
        Period::Inception => {
            let first = inception.inception_date().ok_or_else(|| {
                Error::InvalidPeriod(format!(
                    "{} requires at least one transaction",
                    Period::Inception
                ))
            })?;
            first.min(reference_date)
        }
        _ => {
            let months = period.months().unwrap_or(0);
            reference_date
                .checked_sub_months(Months::new(months))
                .ok_or_else(|| out_of_range(period, reference_date))?
        }
    };

    DateWindow::custom(start, reference_date)
}

fn out_of_range(period: Period, reference_date: NaiveDate) -> Error {
    Error::InvalidPeriod(format!(
        "{} before {} is out of range",
        period, reference_date
    ))
}
