// tests/integration/config_loading.rs

use std::io::Write;
use std::path::Path;

use apex_ls_mcp::config::{DEFAULT_JAR_VERSION, MIN_JAVA_MAJOR, load_config};
use apex_ls_mcp::errors::LauncherError;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn full_config_file_is_honoured() {
    let file = write_config(
        r#"
jar_version = "2.0.0"
download_url = "https://mirror.example.com/apex-ls-mcp-{jarVersion}.jar"
java = "/opt/jdk/bin/java"
min_java_major = 21
cache_dir = "/tmp/apex-cache"
"#,
    );

    let config = load_config(Some(file.path())).unwrap();

    assert_eq!(config.jar_version(), "2.0.0");
    assert_eq!(config.java(), "/opt/jdk/bin/java");
    assert_eq!(config.min_java_major(), 21);
    let descriptor = config.descriptor().unwrap();
    assert_eq!(descriptor.cache_dir(), Path::new("/tmp/apex-cache"));
    assert_eq!(
        descriptor.remote_location(),
        "https://mirror.example.com/apex-ls-mcp-2.0.0.jar"
    );
}

#[test]
fn omitted_keys_fall_back_to_defaults() {
    let file = write_config("jar_version = \"3.1.4\"\n");

    let config = load_config(Some(file.path())).unwrap();

    assert_eq!(config.jar_version(), "3.1.4");
    assert_eq!(config.java(), "java");
    assert_eq!(config.min_java_major(), MIN_JAVA_MAJOR);
}

#[test]
fn empty_file_is_all_defaults() {
    let file = write_config("");
    let config = load_config(Some(file.path())).unwrap();
    assert_eq!(config.jar_version(), DEFAULT_JAR_VERSION);
}

#[test]
fn unknown_key_is_a_toml_error() {
    let file = write_config("jar_versoin = \"1.0.0\"\n");
    match load_config(Some(file.path())) {
        Err(LauncherError::TomlError(e)) => assert!(e.to_string().contains("jar_versoin")),
        other => panic!("expected TomlError, got {other:?}"),
    }
}

#[test]
fn template_without_placeholder_is_rejected() {
    let file = write_config("download_url = \"https://example.com/fixed.jar\"\n");
    match load_config(Some(file.path())) {
        Err(LauncherError::ConfigError(msg)) => assert!(msg.contains("{jarVersion}")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn explicit_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
    assert!(matches!(err, LauncherError::IoError(_)), "got {err:?}");
}

#[test]
fn descriptor_paths_stay_inside_the_cache_dir() {
    use apex_ls_mcp_test_utils::builders::ConfigBuilder;

    let dir = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::new()
        .jar_version("2.1.0")
        .download_url("http://127.0.0.1/{jarVersion}/apex-ls-mcp-{jarVersion}.jar")
        .cache_dir(dir.path())
        .build();

    let descriptor = config.descriptor().unwrap();

    assert_eq!(descriptor, config.descriptor_in(dir.path()));
    assert!(descriptor.artifact_path().starts_with(dir.path()));
    assert!(descriptor.version_marker_path().starts_with(dir.path()));
    assert_eq!(
        descriptor.remote_location(),
        "http://127.0.0.1/2.1.0/apex-ls-mcp-2.1.0.jar"
    );
}
