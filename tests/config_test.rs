//! Tests for chart configuration defaults and validation

use rstest::rstest;

use zoompack::config::ChartConfig;

#[test]
fn given_defaults_then_original_chart_values() {
    let config = ChartConfig::default();
    assert_eq!(config.diameter, 800.0);
    assert_eq!(config.margin, 20.0);
    assert_eq!(config.padding, 2.0);
    assert_eq!(config.ring_thickness, 20.0);
    assert_eq!(config.pie_source_field, "sectors");
    assert_eq!(config.transition_duration_normal, 750.0);
    assert_eq!(config.transition_duration_slow, 7500.0);
}

#[test]
fn given_defaults_then_validation_passes() {
    assert!(ChartConfig::default().validate().is_ok());
}

#[rstest]
#[case::zero_diameter(ChartConfig { diameter: 0.0, ..ChartConfig::default() })]
#[case::negative_margin(ChartConfig { margin: -5.0, ..ChartConfig::default() })]
#[case::negative_padding(ChartConfig { padding: -0.5, ..ChartConfig::default() })]
#[case::zero_ring(ChartConfig { ring_thickness: 0.0, ..ChartConfig::default() })]
#[case::zero_duration(ChartConfig { transition_duration_normal: 0.0, ..ChartConfig::default() })]
#[case::nan_diameter(ChartConfig { diameter: f64::NAN, ..ChartConfig::default() })]
#[case::empty_pie_field(ChartConfig { pie_source_field: String::new(), ..ChartConfig::default() })]
fn given_invalid_settings_then_validation_rejects(#[case] config: ChartConfig) {
    assert!(config.validate().is_err());
}

#[test]
fn given_config_when_round_tripped_through_toml_then_identical() {
    let config = ChartConfig {
        diameter: 650.0,
        ring_thickness: 25.0,
        ..ChartConfig::default()
    };
    let serialized = toml::to_string(&config).unwrap();
    let parsed: ChartConfig = toml::from_str(&serialized).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn given_partial_toml_then_missing_fields_fall_back_to_defaults() {
    let parsed: ChartConfig = toml::from_str("diameter = 650.0\n").unwrap();
    assert_eq!(parsed.diameter, 650.0);
    assert_eq!(parsed.margin, ChartConfig::default().margin);
    assert_eq!(parsed.pie_source_field, "sectors");
}
