//! Loading `GridConfig` from TOML and JSON files.

use std::io::Write;

use cardgrid_core::{CardId, Collection, ConfigError, GridConfig};

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn toml_file_round_trips_into_collection() {
    let file = write_temp(
        ".toml",
        r#"
card_count = 4
first_id = 100
url_template = "https://images.example.com/{index}.jpg"
"#,
    );
    let config = GridConfig::from_toml_file(file.path()).unwrap();
    let collection = Collection::from_config(&config).unwrap();
    assert_eq!(
        collection.ids(),
        vec![
            CardId::new(100),
            CardId::new(101),
            CardId::new(102),
            CardId::new(103)
        ]
    );
    assert_eq!(
        collection.cards()[2].url(),
        "https://images.example.com/2.jpg"
    );
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let config = GridConfig::from_toml_str("card_count = 3").unwrap();
    assert_eq!(config.card_count, 3);
    assert_eq!(config.first_id, 1);
    assert_eq!(config.url_template, GridConfig::default().url_template);

    let config = GridConfig::from_json_str("{}").unwrap();
    assert_eq!(config, GridConfig::default());
}

#[test]
fn json_file_loads() {
    let file = write_temp(".json", r#"{ "card_count": 2, "url_template": "x{index}" }"#);
    let config = GridConfig::from_json_file(file.path()).unwrap();
    let collection = Collection::from_config(&config).unwrap();
    let urls: Vec<&str> = collection.iter().map(|c| c.url()).collect();
    assert_eq!(urls, vec!["x0", "x1"]);
}

#[test]
fn malformed_input_reports_the_format() {
    let err = GridConfig::from_toml_str("card_count = \"lots\"").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
    assert!(err.to_string().starts_with("TOML parse error"));
    assert!(std::error::Error::source(&err).is_some());

    let err = GridConfig::from_json_str("{ card_count: 1 ").unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn invalid_values_fail_validation() {
    let err = GridConfig::from_toml_str("url_template = \"\"").unwrap_err();
    match err {
        ConfigError::Validation(errors) => {
            assert_eq!(errors, vec!["url_template must not be empty".to_string()]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = GridConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
