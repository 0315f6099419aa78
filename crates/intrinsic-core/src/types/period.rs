//! One fiscal year of reported financial facts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::FiscalYear;
use crate::error::{CoreError, CoreResult};

/// One fiscal year's reported facts.
///
/// Every line item is optional: a value that was not reported (or could not
/// be extracted from a filing) is `None` and stays `None` through every
/// derived metric. Nothing is ever defaulted to zero.
///
/// Signs follow the reported statement except for `capex`, which is
/// interpreted by magnitude wherever it is used.
///
/// # Example
///
/// ```rust
/// use intrinsic_core::types::{FinancialPeriod, FiscalYear};
///
/// let period = FinancialPeriod::new(FiscalYear::new(2024))
///     .with_revenue(1_000.0)
///     .with_operating_income(250.0)
///     .with_total_debt(300.0)
///     .with_cash(120.0);
///
/// assert_eq!(period.net_debt(), Some(180.0));
/// assert_eq!(period.net_income, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialPeriod {
    /// Fiscal year key.
    pub fiscal_year: FiscalYear,
    /// Balance-sheet date closing the fiscal year.
    #[serde(default)]
    pub period_end: Option<NaiveDate>,

    // Income statement
    /// Total revenue.
    #[serde(default)]
    pub revenue: Option<f64>,
    /// Cost of revenue (COGS).
    #[serde(default)]
    pub cost_of_revenue: Option<f64>,
    /// Reported gross profit.
    #[serde(default)]
    pub gross_profit: Option<f64>,
    /// Operating income (EBIT).
    #[serde(default)]
    pub operating_income: Option<f64>,
    /// Income before income taxes.
    #[serde(default)]
    pub pretax_income: Option<f64>,
    /// Income tax expense.
    #[serde(default)]
    pub income_tax: Option<f64>,
    /// Net income attributable to shareholders.
    #[serde(default)]
    pub net_income: Option<f64>,
    /// Interest expense.
    #[serde(default)]
    pub interest_expense: Option<f64>,
    /// Research and development expense.
    #[serde(default)]
    pub rd_expense: Option<f64>,

    // Cash flow statement
    /// Depreciation and amortisation.
    #[serde(default)]
    pub depreciation: Option<f64>,
    /// Capital expenditure.
    #[serde(default)]
    pub capex: Option<f64>,
    /// Cash flow from operations.
    #[serde(default)]
    pub operating_cash_flow: Option<f64>,

    // Balance sheet
    /// Cash and cash equivalents.
    #[serde(default)]
    pub cash: Option<f64>,
    /// Accounts receivable.
    #[serde(default)]
    pub receivables: Option<f64>,
    /// Inventory.
    #[serde(default)]
    pub inventory: Option<f64>,
    /// Accounts payable.
    #[serde(default)]
    pub payables: Option<f64>,
    /// Total financial debt (short and long term).
    #[serde(default)]
    pub total_debt: Option<f64>,
    /// Total shareholders' equity.
    #[serde(default)]
    pub total_equity: Option<f64>,
    /// Shares outstanding.
    #[serde(default)]
    pub shares_outstanding: Option<f64>,
}

impl FinancialPeriod {
    /// Creates a period with every line item unreported.
    #[must_use]
    pub fn new(fiscal_year: FiscalYear) -> Self {
        Self {
            fiscal_year,
            period_end: None,
            revenue: None,
            cost_of_revenue: None,
            gross_profit: None,
            operating_income: None,
            pretax_income: None,
            income_tax: None,
            net_income: None,
            interest_expense: None,
            rd_expense: None,
            depreciation: None,
            capex: None,
            operating_cash_flow: None,
            cash: None,
            receivables: None,
            inventory: None,
            payables: None,
            total_debt: None,
            total_equity: None,
            shares_outstanding: None,
        }
    }

    /// Sets the balance-sheet date.
    #[must_use]
    pub fn with_period_end(mut self, date: NaiveDate) -> Self {
        self.period_end = Some(date);
        self
    }

    /// Sets revenue.
    #[must_use]
    pub fn with_revenue(mut self, value: f64) -> Self {
        self.revenue = Some(value);
        self
    }

    /// Sets cost of revenue.
    #[must_use]
    pub fn with_cost_of_revenue(mut self, value: f64) -> Self {
        self.cost_of_revenue = Some(value);
        self
    }

    /// Sets reported gross profit.
    #[must_use]
    pub fn with_gross_profit(mut self, value: f64) -> Self {
        self.gross_profit = Some(value);
        self
    }

    /// Sets operating income.
    #[must_use]
    pub fn with_operating_income(mut self, value: f64) -> Self {
        self.operating_income = Some(value);
        self
    }

    /// Sets pretax income.
    #[must_use]
    pub fn with_pretax_income(mut self, value: f64) -> Self {
        self.pretax_income = Some(value);
        self
    }

    /// Sets income tax expense.
    #[must_use]
    pub fn with_income_tax(mut self, value: f64) -> Self {
        self.income_tax = Some(value);
        self
    }

    /// Sets net income.
    #[must_use]
    pub fn with_net_income(mut self, value: f64) -> Self {
        self.net_income = Some(value);
        self
    }

    /// Sets interest expense.
    #[must_use]
    pub fn with_interest_expense(mut self, value: f64) -> Self {
        self.interest_expense = Some(value);
        self
    }

    /// Sets R&D expense.
    #[must_use]
    pub fn with_rd_expense(mut self, value: f64) -> Self {
        self.rd_expense = Some(value);
        self
    }

    /// Sets depreciation and amortisation.
    #[must_use]
    pub fn with_depreciation(mut self, value: f64) -> Self {
        self.depreciation = Some(value);
        self
    }

    /// Sets capital expenditure.
    #[must_use]
    pub fn with_capex(mut self, value: f64) -> Self {
        self.capex = Some(value);
        self
    }

    /// Sets operating cash flow.
    #[must_use]
    pub fn with_operating_cash_flow(mut self, value: f64) -> Self {
        self.operating_cash_flow = Some(value);
        self
    }

    /// Sets cash and equivalents.
    #[must_use]
    pub fn with_cash(mut self, value: f64) -> Self {
        self.cash = Some(value);
        self
    }

    /// Sets accounts receivable.
    #[must_use]
    pub fn with_receivables(mut self, value: f64) -> Self {
        self.receivables = Some(value);
        self
    }

    /// Sets inventory.
    #[must_use]
    pub fn with_inventory(mut self, value: f64) -> Self {
        self.inventory = Some(value);
        self
    }

    /// Sets accounts payable.
    #[must_use]
    pub fn with_payables(mut self, value: f64) -> Self {
        self.payables = Some(value);
        self
    }

    /// Sets total debt.
    #[must_use]
    pub fn with_total_debt(mut self, value: f64) -> Self {
        self.total_debt = Some(value);
        self
    }

    /// Sets total equity.
    #[must_use]
    pub fn with_total_equity(mut self, value: f64) -> Self {
        self.total_equity = Some(value);
        self
    }

    /// Sets shares outstanding.
    #[must_use]
    pub fn with_shares_outstanding(mut self, value: f64) -> Self {
        self.shares_outstanding = Some(value);
        self
    }

    /// Total debt minus cash; negative means net cash.
    ///
    /// `None` unless both debt and cash are reported.
    pub fn net_debt(&self) -> Option<f64> {
        Some(self.total_debt? - self.cash?)
    }

    /// Returns a reported value or a [`CoreError::MissingField`] naming it.
    pub fn require(&self, field: &'static str, value: Option<f64>) -> CoreResult<f64> {
        value.ok_or_else(|| CoreError::missing_field(self.fiscal_year, field))
    }
}
