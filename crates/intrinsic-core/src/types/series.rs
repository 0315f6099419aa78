//! Ordered history of fiscal periods.

use serde::{Deserialize, Serialize};

use super::{FinancialPeriod, FiscalYear};
use crate::error::{CoreError, CoreResult};

/// Fiscal periods in strictly increasing fiscal-year order.
///
/// Ordering is checked on construction, on [`push`](Self::push) and on
/// deserialization, so every consumer can rely on `periods()[i]` being
/// earlier than `periods()[i + 1]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<FinancialPeriod>", into = "Vec<FinancialPeriod>")]
pub struct HistoricalSeries {
    periods: Vec<FinancialPeriod>,
}

impl HistoricalSeries {
    /// Builds a series, rejecting duplicate or out-of-order fiscal years.
    pub fn new(periods: Vec<FinancialPeriod>) -> CoreResult<Self> {
        if let Some(err) = first_ordering_violation(&periods) {
            return Err(err);
        }
        Ok(Self { periods })
    }

    /// Appends a period that must be later than the current latest.
    pub fn push(&mut self, period: FinancialPeriod) -> CoreResult<()> {
        if let Some(last) = self.periods.last() {
            if period.fiscal_year <= last.fiscal_year {
                return Err(CoreError::MalformedSeries {
                    position: self.periods.len(),
                    previous: last.fiscal_year,
                    found: period.fiscal_year,
                });
            }
        }
        self.periods.push(period);
        Ok(())
    }

    /// All periods, oldest first.
    pub fn periods(&self) -> &[FinancialPeriod] {
        &self.periods
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// True when the series holds no periods.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Oldest period.
    pub fn first(&self) -> Option<&FinancialPeriod> {
        self.periods.first()
    }

    /// Most recent period.
    pub fn latest(&self) -> Option<&FinancialPeriod> {
        self.periods.last()
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> std::slice::Iter<'_, FinancialPeriod> {
        self.periods.iter()
    }

    /// Looks up a period by fiscal year.
    pub fn get(&self, year: FiscalYear) -> Option<&FinancialPeriod> {
        self.periods
            .binary_search_by_key(&year, |p| p.fiscal_year)
            .ok()
            .map(|idx| &self.periods[idx])
    }

    /// Fiscal years covered, oldest first.
    pub fn years(&self) -> Vec<FiscalYear> {
        self.periods.iter().map(|p| p.fiscal_year).collect()
    }

    /// Consumes the series and returns its periods.
    pub fn into_periods(self) -> Vec<FinancialPeriod> {
        self.periods
    }
}

fn first_ordering_violation(periods: &[FinancialPeriod]) -> Option<CoreError> {
    periods.windows(2).enumerate().find_map(|(idx, pair)| {
        (pair[1].fiscal_year <= pair[0].fiscal_year).then(|| CoreError::MalformedSeries {
            position: idx + 1,
            previous: pair[0].fiscal_year,
            found: pair[1].fiscal_year,
        })
    })
}

impl TryFrom<Vec<FinancialPeriod>> for HistoricalSeries {
    type Error = CoreError;

    fn try_from(periods: Vec<FinancialPeriod>) -> CoreResult<Self> {
        Self::new(periods)
    }
}

impl From<HistoricalSeries> for Vec<FinancialPeriod> {
    fn from(series: HistoricalSeries) -> Self {
        series.periods
    }
}

impl<'a> IntoIterator for &'a HistoricalSeries {
    type Item = &'a FinancialPeriod;
    type IntoIter = std::slice::Iter<'a, FinancialPeriod>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.iter()
    }
}
