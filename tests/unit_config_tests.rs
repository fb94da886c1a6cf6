use solver_bench::config::{
    load_config, parse_config, BenchConfig, ConfigOverrides, FailurePolicy, InputMode,
};
use solver_bench::models::BenchError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

#[test]
fn test_defaults() {
    let config = BenchConfig::default();
    assert_eq!(config.cases_dir, PathBuf::from("test_cases"));
    assert_eq!(config.extension, "txt");
    assert_eq!(config.log_path, PathBuf::from("results.csv"));
    assert_eq!(config.input_mode, InputMode::Stdin);
    assert_eq!(config.on_failure, FailurePolicy::Continue);
    assert!(config.driver.command.is_empty());
    assert!(config.advisory.is_empty());
}

#[test]
fn test_empty_file_equals_defaults() {
    assert_eq!(parse_config("").unwrap(), BenchConfig::default());
}

#[test]
fn test_full_file() {
    let config = parse_config(
        r#"
language = "zh-CN"
cases_dir = "graphs"
extension = "col"
log_path = "logs/times.csv"
input_mode = "argument"
on_failure = "stop"

[driver]
command = "python3 cs412_mingraphcolor_exact.py"
script = "cs412_mingraphcolor_exact.py"

[[advisory]]
case = "test_case_large.txt"
message = "Expect about 21 minutes."

[[advisory]]
case = "test_case_huge.txt"
"#,
    )
    .unwrap();

    assert_eq!(config.language.as_deref(), Some("zh-CN"));
    assert_eq!(config.cases_dir, PathBuf::from("graphs"));
    assert_eq!(config.extension, "col");
    assert_eq!(config.input_mode, InputMode::Argument);
    assert_eq!(config.on_failure, FailurePolicy::Stop);
    assert_eq!(config.driver.command, "python3 cs412_mingraphcolor_exact.py");
    assert_eq!(
        config.driver.script,
        Some(PathBuf::from("cs412_mingraphcolor_exact.py"))
    );
    assert_eq!(config.advisory.len(), 2);
    assert_eq!(config.advisory[1].message, None);
}

#[test]
fn test_unknown_enum_value_is_rejected() {
    assert!(parse_config("input_mode = \"pipe\"").is_err());
    assert!(parse_config("on_failure = \"retry\"").is_err());
}

#[test]
fn test_from_str() {
    assert_eq!("stdin".parse::<InputMode>().unwrap(), InputMode::Stdin);
    assert_eq!("ARG".parse::<InputMode>().unwrap(), InputMode::Argument);
    assert_eq!("Stop".parse::<FailurePolicy>().unwrap(), FailurePolicy::Stop);
    assert!("later".parse::<FailurePolicy>().is_err());
}

#[test]
fn test_overrides_replace_only_given_values() {
    let mut config = parse_config(
        r#"
extension = "col"
on_failure = "stop"

[driver]
command = "python3 a.py"
script = "a.py"
"#,
    )
    .unwrap();

    config.apply_overrides(ConfigOverrides {
        driver_command: Some("cat".to_string()),
        input_mode: Some(InputMode::Argument),
        ..ConfigOverrides::default()
    });

    assert_eq!(config.driver.command, "cat");
    assert_eq!(config.driver.script, Some(PathBuf::from("a.py")));
    assert_eq!(config.input_mode, InputMode::Argument);
    assert_eq!(config.extension, "col");
    assert_eq!(config.on_failure, FailurePolicy::Stop);
}

#[test]
fn test_validate() {
    assert!(matches!(
        BenchConfig::default().validate(),
        Err(BenchError::NoDriverConfigured)
    ));

    let mut config = BenchConfig::default();
    config.driver.command = "cat".to_string();
    assert!(config.validate().is_ok());

    config.extension = ".".to_string();
    assert!(matches!(config.validate(), Err(BenchError::InvalidConfig(_))));

    let config = parse_config(
        r#"
[driver]
command = "cat"

[[advisory]]
case = "  "
"#,
    )
    .unwrap();
    assert!(matches!(config.validate(), Err(BenchError::InvalidConfig(_))));
}

#[test]
fn test_into_settings_resolves_paths() {
    let work_dir = Path::new("/srv/bench");
    let mut config = BenchConfig::default();
    config.driver.command = "python3 solver.py".to_string();
    config.driver.script = Some(PathBuf::from("solver.py"));
    config.log_path = PathBuf::from("/tmp/abs.csv");
    config.extension = ".txt".to_string();

    let settings = config.into_settings(work_dir).unwrap();
    assert_eq!(settings.cases_dir, PathBuf::from("/srv/bench/test_cases"));
    assert_eq!(settings.log_path, PathBuf::from("/tmp/abs.csv"));
    assert_eq!(settings.driver_script, Some(PathBuf::from("/srv/bench/solver.py")));
    assert_eq!(settings.extension, "txt");
    assert_eq!(settings.work_dir, work_dir);
}

#[test]
fn test_check_driver() {
    let dir = tempdir().unwrap();
    let mut config = BenchConfig::default();
    config.driver.command = "python3 solver.py".to_string();
    config.driver.script = Some(PathBuf::from("solver.py"));

    let settings = config.clone().into_settings(dir.path()).unwrap();
    match settings.check_driver() {
        Err(BenchError::MissingDriver(path)) => assert_eq!(path, dir.path().join("solver.py")),
        other => panic!("expected MissingDriver, got {other:?}"),
    }

    fs::write(dir.path().join("solver.py"), "").unwrap();
    assert!(settings.check_driver().is_ok());

    config.driver.script = None;
    assert!(config.into_settings(dir.path()).unwrap().check_driver().is_ok());
}

#[test]
fn test_advisory_lookup() {
    let config = parse_config(
        r#"
[driver]
command = "cat"

[[advisory]]
case = "big.txt"
"#,
    )
    .unwrap();
    let settings = config.into_settings(Path::new("/w")).unwrap();

    assert!(settings.advisory_for("big.txt").is_some());
    assert!(settings.advisory_for("Big.txt").is_none());
    assert!(settings.advisory_for("small.txt").is_none());
}

#[test]
fn test_load_config_fallback_and_explicit() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("BenchConfig.toml");

    assert_eq!(load_config(&missing, false).unwrap(), BenchConfig::default());
    assert!(load_config(&missing, true).is_err());

    fs::write(&missing, "extension = \"in\"").unwrap();
    assert_eq!(load_config(&missing, false).unwrap().extension, "in");
}

#[test]
fn test_serialized_config_round_trips() {
    let mut config = BenchConfig::default();
    config.driver.command = "python3 solver.py".to_string();
    config.on_failure = FailurePolicy::Stop;

    let text = toml::to_string_pretty(&config).unwrap();
    assert!(text.contains("on_failure = \"stop\""));
    assert_eq!(parse_config(&text).unwrap(), config);
}
