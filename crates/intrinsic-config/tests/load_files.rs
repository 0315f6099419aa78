//! Loading scenario files from disk.

use std::io::Write;

use intrinsic_config::{ConfigError, ScenarioConfig};
use tempfile::Builder;

const SCENARIO_TOML: &str = r#"
[company]
name = "Harbor Logistics"
ticker = "HBR"

[tax]
effective_rate = 0.22
statutory_rate = 0.25

[cost_of_capital]
risk_free_rate = 0.042
beta = 0.95
equity_risk_premium = 0.05
country_risk_premium = 0.01
pre_tax_cost_of_debt = 0.065
target_debt_to_capital = 0.3

[projection]
explicit_years = 8
terminal_growth_rate = 0.02
margin_fade_years = 4

[revenue]
near_term_growth_rates = [0.07, 0.06]
long_term_growth_rate = 0.025

[margins]
target_operating_margin = 0.12

[capital_intensity]
capex_to_revenue = 0.06
depreciation_to_revenue = 0.05
nwc_to_revenue = 0.08

[solver]
tolerance = 1e-9

[plausibility]
max_growth = 0.15
"#;

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn load_toml_file() {
    let file = write_temp(".toml", SCENARIO_TOML);
    let config = ScenarioConfig::load(file.path()).unwrap();

    assert_eq!(config.company.name, "Harbor Logistics");
    assert_eq!(config.projection.explicit_years, 8);
    assert_eq!(config.solver.max_iterations, 200);
    assert_eq!(config.solver_config().tolerance, 1e-9);

    let bounds = config.plausibility_bounds();
    assert_eq!(bounds.max_growth, 0.15);
    assert_eq!(bounds.max_operating_margin, 0.45);

    let coc = config.cost_of_capital(1_000.0, 50.0).unwrap();
    assert!((coc.debt_weight - 0.3).abs() < 1e-12);
}

#[test]
fn load_json_file_written_from_toml() {
    let config = ScenarioConfig::from_toml_str(SCENARIO_TOML).unwrap();
    let file = write_temp(".json", &config.to_json_string().unwrap());
    assert_eq!(ScenarioConfig::load(file.path()).unwrap(), config);
}

#[test]
fn extension_is_case_insensitive() {
    let file = write_temp(".TOML", SCENARIO_TOML);
    assert!(ScenarioConfig::load(file.path()).is_ok());
}

#[test]
fn unsupported_extension() {
    let file = write_temp(".yaml", SCENARIO_TOML);
    assert!(matches!(
        ScenarioConfig::load(file.path()),
        Err(ConfigError::UnsupportedFormat { .. })
    ));
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ScenarioConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn invalid_file_is_rejected_before_conversion() {
    let file = write_temp(".toml", &SCENARIO_TOML.replace("beta = 0.95", "beta = nan"));
    assert!(matches!(
        ScenarioConfig::load(file.path()),
        Err(ConfigError::Validation { field, .. }) if field == "cost_of_capital.beta"
    ));
}
