//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

/// The binary with settings pinned to defaults, independent of the machine's config dir.
fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("alchemize");
    cmd.args(["--config", "/nonexistent/alchemize/config.json"]);
    cmd
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{name}")
}

#[test]
fn test_cli_file_input() {
    cmd()
        .arg(get_fixture_path("article.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("# Shipping Services with Docker"));
}

#[test]
fn test_cli_stdin_input() {
    let html = std::fs::read_to_string(get_fixture_path("article.html")).unwrap();
    cmd()
        .arg("-")
        .write_stdin(html)
        .assert()
        .success()
        .stdout(predicate::str::contains("```dockerfile"));
}

#[test]
fn test_cli_stdin_is_default_input() {
    cmd()
        .write_stdin("<html><body><article><p>From a pipe</p></article></body></html>")
        .assert()
        .success()
        .stdout(predicate::str::contains("From a pipe"));
}

#[test]
fn test_cli_frontmatter_default_on() {
    cmd()
        .arg(get_fixture_path("article.html"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("---\ntitle: \"Shipping Services with Docker\""))
        .stdout(predicate::str::contains("author: \"Jordan Lee\""));
}

#[test]
fn test_cli_no_frontmatter() {
    cmd()
        .args(["--no-frontmatter", &get_fixture_path("article.html")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Shipping Services with Docker"));
}

#[test]
fn test_cli_source_url_flag() {
    cmd()
        .args(["--url", "https://blog.example.com/docker", &get_fixture_path("article.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("source: \"https://blog.example.com/docker\""));
}

#[test]
fn test_cli_json_format() {
    let output = cmd().args(["-f", "json", &get_fixture_path("skill_builder.html")]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["metadata"]["extractor"], "aws-skill-builder");
    assert_eq!(json["tags"][0], "aws");
}

#[test]
fn test_cli_html_format() {
    cmd()
        .args(["-f", "html", &get_fixture_path("article.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("data-pseudo-table"))
        .stdout(predicate::str::contains("style=").not());
}

#[test]
fn test_cli_study_mode() {
    cmd()
        .args(["-m", "study", "--no-frontmatter", &get_fixture_path("article.html")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("## Summary"))
        .stdout(predicate::str::contains("## Review Questions"));
}

#[test]
fn test_cli_flashcards_mode() {
    cmd()
        .args(["--mode", "flashcards", &get_fixture_path("skill_builder.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("#flashcard"))
        .stdout(predicate::str::contains("exportMode: \"flashcards\""));
}

#[test]
fn test_cli_invalid_mode() {
    cmd().args(["-m", "summary", &get_fixture_path("article.html")]).assert().failure();
}

#[test]
fn test_cli_no_tags() {
    cmd()
        .args(["--no-tags", &get_fixture_path("article.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("tags:").not());
}

#[test]
fn test_cli_markdown_import() {
    cmd()
        .arg(get_fixture_path("note.md"))
        .assert()
        .success()
        .stdout(predicate::str::contains("title: \"Kubernetes Networking\""))
        .stdout(predicate::str::contains("extractor: \"markdown-import\""));
}

#[test]
fn test_cli_markdown_import_rejects_html_output() {
    cmd().args(["-f", "html", &get_fixture_path("note.md")]).assert().failure();
}

#[test]
fn test_cli_output_file() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("note.md");

    cmd()
        .args(["-o", output.to_str().unwrap(), &get_fixture_path("article.html")])
        .assert()
        .success()
        .stderr(predicate::str::contains("Note written to"));

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("# Shipping Services with Docker"));
}

#[test]
fn test_cli_output_directory_uses_template() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config.json");
    std::fs::write(&config, r#"{"filename_template": "clip-{{title}}"}"#).unwrap();

    assert_cmd::cargo::cargo_bin_cmd!("alchemize")
        .args(["--config", config.to_str().unwrap()])
        .args(["-o", tmp.path().to_str().unwrap(), &get_fixture_path("article.html")])
        .assert()
        .success();

    assert!(tmp.path().join("clip-shipping-services-with-docker.md").exists());
}

#[test]
fn test_cli_custom_tags_from_config() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config.json");
    std::fs::write(&config, r#"{"custom_tags": ["inbox"], "auto_tagging": false}"#).unwrap();

    assert_cmd::cargo::cargo_bin_cmd!("alchemize")
        .args(["--config", config.to_str().unwrap(), &get_fixture_path("article.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("tags:\n  - inbox\nmetadata:"));
}

#[test]
fn test_cli_malformed_config() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("config.json");
    std::fs::write(&config, "{ nope").unwrap();

    assert_cmd::cargo::cargo_bin_cmd!("alchemize")
        .args(["--config", config.to_str().unwrap(), &get_fixture_path("article.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_cli_invalid_file() {
    cmd().arg("nonexistent.html").assert().failure();
}

#[test]
fn test_cli_empty_input() {
    cmd().arg("-").write_stdin("   \n").assert().failure();
}

#[test]
fn test_cli_verbose() {
    cmd()
        .args(["-v", &get_fixture_path("article.html")])
        .assert()
        .success()
        .stderr(predicate::str::contains("Alchemize"))
        .stderr(predicate::str::contains("Extractor"));
}
