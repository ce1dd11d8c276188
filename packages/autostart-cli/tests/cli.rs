use std::path::Path;
use std::process::Command;

fn autostart() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_autostart"));
    cmd.env_remove("AUTOSTART_APP_NAME")
        .env_remove("AUTOSTART_LAUNCH_FLAG")
        .env_remove("AUTOSTART_DIR")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &Path, autostart_dir: &Path) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    let content = format!(
        "[autostart]\nautostart_dir = {:?}\n",
        autostart_dir.display().to_string()
    );
    std::fs::write(&path, content).expect("write config");
    path
}

#[test]
fn help_exits_successfully() {
    // Arrange
    let mut cmd = autostart();
    cmd.arg("--help");

    // Act
    let output = cmd.output().expect("failed to execute autostart");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("launch at login"));
}

#[test]
fn version_exits_successfully() {
    // Arrange
    let mut cmd = autostart();
    cmd.arg("--version");

    // Act
    let output = cmd.output().expect("failed to execute autostart");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("autostart"));
}

#[test]
fn config_subcommand_reports_file_values() {
    // Arrange
    let tmp = tempfile::tempdir().expect("temp");
    let config = write_config(tmp.path(), &tmp.path().join("entries"));
    let mut cmd = autostart();
    cmd.arg("--config").arg(&config).args(["--format", "json", "config"]);

    // Act
    let output = cmd.output().expect("failed to execute autostart");

    // Assert
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("config output is JSON");
    assert_eq!(json["source"], "config file");
    assert_eq!(json["launch_flag"], "--autostart");
    assert_eq!(
        json["autostart_dir"],
        tmp.path().join("entries").display().to_string()
    );
}

#[test]
fn missing_config_file_fails() {
    // Arrange
    let tmp = tempfile::tempdir().expect("temp");
    let mut cmd = autostart();
    cmd.arg("--config").arg(tmp.path().join("absent.toml")).arg("status");

    // Act
    let output = cmd.output().expect("failed to execute autostart");

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"));
}

#[cfg(target_os = "linux")]
#[test]
fn enable_status_disable_round_trip() {
    // Arrange
    let tmp = tempfile::tempdir().expect("temp");
    let entries = tmp.path().join("autostart");
    let config = write_config(tmp.path(), &entries);
    let run = |args: &[&str]| {
        autostart()
            .arg("--config")
            .arg(&config)
            .args(["--executable", "/usr/bin/mytool", "--format", "json"])
            .args(args)
            .output()
            .expect("failed to execute autostart")
    };

    // Act
    let enable = run(&["enable"]);
    let enabled_status = run(&["status"]);
    let desktop_file = std::fs::read_to_string(entries.join("mytool.desktop"));
    let disable = run(&["disable"]);
    let disabled_status = run(&["status"]);

    // Assert
    assert!(enable.status.success());
    assert_eq!(
        desktop_file.expect("desktop file written"),
        "[Desktop Entry]\nExec=/usr/bin/mytool --autostart\nType=Application\n"
    );

    let status: serde_json::Value = serde_json::from_slice(&enabled_status.stdout).unwrap();
    assert_eq!(status["enabled"], true);
    assert_eq!(status["name"], "mytool");
    assert_eq!(status["platform"], "linux");

    assert!(disable.status.success());
    let status: serde_json::Value = serde_json::from_slice(&disabled_status.stdout).unwrap();
    assert_eq!(status["enabled"], false);
    assert!(!entries.join("mytool.desktop").exists());
}

#[cfg(target_os = "linux")]
#[test]
fn disable_when_not_enabled_succeeds() {
    // Arrange
    let tmp = tempfile::tempdir().expect("temp");
    let config = write_config(tmp.path(), &tmp.path().join("autostart"));
    let mut cmd = autostart();
    cmd.arg("--config")
        .arg(&config)
        .args(["--executable", "/usr/bin/mytool", "--name", "renamed", "disable"]);

    // Act
    let output = cmd.output().expect("failed to execute autostart");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Autostart disabled for 'renamed'"));
}

#[test]
fn name_with_path_separators_is_rejected() {
    // Arrange
    let tmp = tempfile::tempdir().expect("temp");
    let entries = tmp.path().join("autostart");
    let config = write_config(tmp.path(), &entries);
    let mut cmd = autostart();
    cmd.arg("--config")
        .arg(&config)
        .args(["--executable", "/usr/bin/mytool", "--name", "../escaped", "enable"]);

    // Act
    let output = cmd.output().expect("failed to execute autostart");

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid registration name"));
    assert!(!entries.exists());
    assert!(!tmp.path().join("escaped.desktop").exists());
}
