use flowscope::{ConfigError, JournalLevel, JournalSettings, TableConfig, DEFAULT_CAPACITY};

#[test]
fn empty_document_yields_the_defaults() {
    let config = TableConfig::from_json("{}").expect("config parses");
    assert_eq!(config.capacity, DEFAULT_CAPACITY);
    assert!(config.journal.is_none());
    assert_eq!(config, TableConfig::default());
}

#[test]
fn full_document_parses_every_field() {
    let config = TableConfig::from_json(
        r#"{
            "capacity": 2048,
            "journal": {
                "max_bytes_per_segment": 65536,
                "max_segments": 8,
                "level": "warn"
            }
        }"#,
    )
    .expect("config parses");

    assert_eq!(config.capacity, 2048);
    let journal = config.journal.expect("journal section");
    assert_eq!(journal.max_bytes_per_segment, 65_536);
    assert_eq!(journal.max_segments, 8);
    assert_eq!(journal.level, JournalLevel::Warn);
}

#[test]
fn empty_journal_section_fills_its_own_defaults() {
    let config = TableConfig::from_json(r#"{ "journal": {} }"#).expect("config parses");
    assert_eq!(config.journal, Some(JournalSettings::default()));
    assert_eq!(
        config.journal.expect("journal section").level,
        JournalLevel::Info
    );
}

#[test]
fn zero_capacity_is_rejected() {
    let err = TableConfig::from_json(r#"{ "capacity": 0 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::ZeroCapacity));
}

#[test]
fn zero_journal_budgets_are_rejected() {
    let err = TableConfig::from_json(
        r#"{ "journal": { "max_bytes_per_segment": 0 } }"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::ZeroJournalBytes));

    let err = TableConfig::from_json(r#"{ "journal": { "max_segments": 0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::ZeroJournalSegments));
}

#[test]
fn malformed_json_surfaces_the_parse_error() {
    let err = TableConfig::from_json("{ capacity: 16 }").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().contains("failed to parse configuration"));
}

#[test]
fn validate_catches_a_hand_built_config() {
    let config = TableConfig {
        capacity: 0,
        journal: None,
    };
    assert!(matches!(config.validate(), Err(ConfigError::ZeroCapacity)));

    let config = TableConfig {
        capacity: 16,
        journal: Some(JournalSettings::default()),
    };
    assert!(config.validate().is_ok());
}
