use notefmt_core::{AppConfig, ConfigError, NoteFormatter, TagPlacement};
use std::io::Write;

#[test]
fn load_reads_json_file_into_working_formatter() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r##"{{
            "formatter": {{
                "tag_marker": "#refnote #type/literature/article",
                "lookup_url_template": "things:///search?query={{url}}"
            }},
            "logging": {{ "level": "warn" }}
        }}"##
    )
    .unwrap();

    let config = AppConfig::load(file.path()).unwrap();
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.formatter.tag_placement, TagPlacement::AfterPublication);

    let formatter = NoteFormatter::new(&config.formatter).unwrap();
    assert_eq!(
        formatter.lookup_url("http://x"),
        "things:///search?query=http://x"
    );
}

#[test]
fn load_reports_missing_file_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let err = AppConfig::load(&missing).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn load_reports_malformed_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    let err = AppConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
