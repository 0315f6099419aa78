//! Property-based tests for the valuation engine.

use intrinsic_analytics::prelude::*;
use intrinsic_core::{FinancialPeriod, FiscalYear, HistoricalSeries, ProjectionAssumptions};
use proptest::prelude::*;

fn scenario(growth: Vec<f64>, margin: f64, wacc: f64, terminal_growth: f64) -> Scenario {
    let explicit_years = u32::try_from(growth.len()).unwrap() + 5;
    let assumptions = ProjectionAssumptions::default()
        .with_near_term_growth(growth)
        .with_long_term_growth(0.03)
        .with_explicit_years(explicit_years)
        .with_target_operating_margin(margin)
        .with_margin_fade_years(3)
        .with_terminal_growth(terminal_growth)
        .with_reinvestment(0.04, 0.04, 0.0)
        .with_tax_rate(0.25);
    Scenario::new(ProjectionAnchor::new(500.0, margin), assumptions, wacc, 50.0, 10.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Raising one near-term growth rate never lowers equity value when
    /// every year's cash flow is a positive share of revenue.
    #[test]
    fn prop_value_monotone_in_near_term_growth(
        growth in prop::collection::vec(-0.05f64..0.25, 1..6),
        idx in 0usize..6,
        bump in 0.0f64..0.1,
        margin in 0.05f64..0.4,
        wacc in 0.06f64..0.14,
    ) {
        let idx = idx % growth.len();
        let base = scenario(growth.clone(), margin, wacc, 0.02);

        let mut raised = growth;
        raised[idx] += bump;
        let bumped = scenario(raised, margin, wacc, 0.02);

        let low = base.evaluate().unwrap().equity_value;
        let high = bumped.evaluate().unwrap().equity_value;
        prop_assert!(high >= low - 1e-9 * low.abs().max(1.0));
    }

    #[test]
    fn prop_projection_is_idempotent(
        growth in prop::collection::vec(-0.1f64..0.3, 1..8),
        margin in -0.1f64..0.5,
    ) {
        let s = scenario(growth, margin, 0.09, 0.02);
        let first = s.project().unwrap();
        let second = s.project().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_terminal_growth_at_or_above_wacc_rejected(
        wacc in 0.01f64..0.15,
        excess in 0.0f64..0.05,
    ) {
        let s = scenario(vec![0.05], 0.2, wacc, wacc + excess);
        let rejected = matches!(
            s.evaluate(),
            Err(AnalyticsError::InvalidTerminalAssumption { .. })
        );
        prop_assert!(rejected);
    }

    #[test]
    fn prop_first_period_roic_undefined(
        revenues in prop::collection::vec(1.0f64..1e6, 1..8),
        equity in 1.0f64..1e6,
    ) {
        let periods = revenues
            .iter()
            .zip(2000..)
            .map(|(&revenue, year)| {
                FinancialPeriod::new(FiscalYear::new(year))
                    .with_revenue(revenue)
                    .with_operating_income(revenue * 0.1)
                    .with_total_debt(10.0)
                    .with_total_equity(equity)
                    .with_cash(5.0)
            })
            .collect();
        let series = HistoricalSeries::new(periods).unwrap();
        let ratios = compute_ratios(&series, 0.21);
        prop_assert_eq!(ratios.len(), revenues.len());
        prop_assert!(ratios[0].roic.is_none());
        prop_assert!(ratios[0].revenue_growth.is_none());
        for r in &ratios {
            prop_assert!(r.operating_margin.unwrap() <= 1.0);
        }
    }

    #[test]
    fn prop_tornado_sorted_by_magnitude(
        wacc in 0.07f64..0.12,
        width in 0.001f64..0.02,
    ) {
        let s = scenario(vec![0.08, 0.06], 0.2, wacc, 0.02);
        let ranges: Vec<DriverRange> = ValueDriver::ALL
            .iter()
            .map(|d| DriverRange::around(&s, *d, -width, width))
            .collect();
        let entries = rank_drivers(&s, &ranges, &SensitivityConfig::sequential()).unwrap();
        prop_assert_eq!(entries.len(), ranges.len());

        for pair in entries.windows(2) {
            match (pair[0].magnitude(), pair[1].magnitude()) {
                (Some(a), Some(b)) => prop_assert!(a >= b),
                (None, Some(_)) => prop_assert!(false, "undefined entry before a defined one"),
                _ => {}
            }
        }
    }

    #[test]
    fn prop_grid_cells_finite_or_undefined(
        waccs in prop::collection::vec(0.0f64..0.15, 1..5),
        growths in prop::collection::vec(0.0f64..0.06, 1..5),
    ) {
        let s = scenario(vec![0.05], 0.2, 0.09, 0.02);
        let table = grid(
            &s,
            &GridAxis::new(ValueDriver::Wacc, waccs.clone()),
            &GridAxis::new(ValueDriver::TerminalGrowth, growths.clone()),
            &SensitivityConfig::sequential(),
        )
        .unwrap();
        for (i, w) in waccs.iter().enumerate() {
            for (j, g) in growths.iter().enumerate() {
                match table.get(i, j) {
                    Some(v) => {
                        prop_assert!(v.is_finite());
                        prop_assert!(w > g);
                    }
                    None => prop_assert!(w <= g),
                }
            }
        }
    }
}
