//! Drives the real process runner against a scripted stand-in for adb
#![cfg(unix)]

use maml::{Bridge, DeviceState, MamlError, WaitPolicy};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;

struct Fixtures {
    dir: TempDir,
    online: PathBuf,
    offline: PathBuf,
    not_executable: PathBuf,
}

/// Scripts are written once, before any test spawns them
fn fixtures() -> &'static Fixtures {
    static FIXTURES: OnceLock<Fixtures> = OnceLock::new();
    FIXTURES.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();
        let online = write_script(dir.path(), "adb-online", "device");
        let offline = write_script(dir.path(), "adb-offline", "offline");

        let not_executable = dir.path().join("adb-plain");
        fs::write(&not_executable, "#!/bin/sh\n").unwrap();

        Fixtures {
            dir,
            online,
            offline,
            not_executable,
        }
    })
}

fn write_script(dir: &Path, name: &str, state: &str) -> PathBuf {
    let path = dir.join(name);
    let script = format!(
        r#"#!/bin/sh
serial=none
if [ "$1" = "-s" ]; then serial="$2"; shift 2; fi
printf '%s\n' "$*" >> "{dir}/$serial.log"
case "$1" in
  devices) printf 'List of devices attached\nemulator-5554\t{state}\n\n' ;;
  get-state) echo "{state}" ;;
  install) echo "Performing Streamed Install"; echo "Success" ;;
  uninstall) echo "Failure [DELETE_FAILED_INTERNAL_ERROR]" >&2; exit 1 ;;
esac
exit 0
"#,
        dir = dir.display(),
        state = state,
    );
    fs::write(&path, script).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn bridge(path: &Path) -> Bridge {
    Bridge::with_path(path.to_string_lossy().to_string())
}

/// Invocations recorded for one serial, minus the state checks
fn actions(serial: &str) -> Vec<String> {
    let log = fixtures().dir.path().join(format!("{}.log", serial));
    fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .filter(|line| *line != "get-state")
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_online_device() {
    let bridge = bridge(&fixtures().online);
    assert!(bridge.is_online(Some("state-online")).await.unwrap());
    assert_eq!(
        bridge.device_state(Some("state-online")).await.unwrap(),
        DeviceState::Device
    );
}

#[tokio::test]
async fn test_offline_device() {
    let bridge = bridge(&fixtures().offline);
    assert!(!bridge.is_online(Some("state-offline")).await.unwrap());
    assert_eq!(bridge.first_device().await.unwrap(), None);
}

#[tokio::test]
async fn test_discovery_from_listing() {
    let bridge = bridge(&fixtures().online);
    assert_eq!(
        bridge.first_device().await.unwrap(),
        Some("emulator-5554".to_string())
    );
    let devices = bridge.list_devices().await.unwrap();
    assert_eq!(devices.len(), 1);
}

#[tokio::test]
async fn test_missing_bridge_is_not_empty_output() {
    let missing = fixtures().dir.path().join("no-such-adb");
    let err = bridge(&missing).list_devices().await.unwrap_err();
    assert!(matches!(err, MamlError::BridgeNotFound(_)));
}

#[tokio::test]
async fn test_unlaunchable_bridge() {
    let err = bridge(&fixtures().not_executable)
        .get_state(Some("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, MamlError::Launch { .. }));
    assert!(err.is_launch_failure());
}

#[tokio::test]
async fn test_type_text_through_process() {
    let bridge = bridge(&fixtures().online);
    bridge
        .type_text("hello world", false, Some("typist"), None)
        .await
        .unwrap();

    assert_eq!(
        actions("typist"),
        vec![
            "shell input text hello",
            "shell input keyevent 62",
            "shell input text world",
        ]
    );
}

#[tokio::test]
async fn test_clear_through_process() {
    let bridge = bridge(&fixtures().online);
    bridge.clear(Some(5), Some("clearer"), None).await.unwrap();

    let actions = actions("clearer");
    assert_eq!(actions.len(), 6);
    assert_eq!(actions[0], "shell input keyevent 123");
    assert!(actions[1..].iter().all(|a| a == "shell input keyevent 67"));
}

#[tokio::test]
async fn test_install_output_is_trimmed() {
    let bridge = bridge(&fixtures().online);
    let output = bridge.install("app.apk", Some("installer")).await.unwrap();
    assert_eq!(output.stdout, "Performing Streamed Install\nSuccess");
    assert_eq!(output.stderr, "");
    assert_eq!(output.exit_code, Some(0));
}

#[tokio::test]
async fn test_failed_uninstall_still_returns_output() {
    let bridge = bridge(&fixtures().online);
    let output = bridge
        .uninstall("com.example", Some("uninstaller"))
        .await
        .unwrap();
    assert_eq!(output.stdout, "");
    assert_eq!(output.stderr, "Failure [DELETE_FAILED_INTERNAL_ERROR]");
    assert_eq!(output.exit_code, Some(1));
}

#[tokio::test]
async fn test_connect_with_online_serial() {
    let bridge = bridge(&fixtures().online);
    let serial = bridge
        .connect(Some("connector"), WaitPolicy::from_secs(5))
        .await
        .unwrap();
    assert_eq!(serial, "connector");
}

#[tokio::test]
async fn test_offline_device_sends_nothing() {
    let bridge = bridge(&fixtures().offline);
    let err = bridge.back(3, Some("declined"), None).await.unwrap_err();
    assert!(matches!(err, MamlError::DeviceOffline(_)));
    assert!(actions("declined").is_empty());
}
