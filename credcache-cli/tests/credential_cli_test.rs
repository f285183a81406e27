use std::fs;

use assert_cmd::Command;
use credcache_test_utils::{HomeEnvTestGuard, StoreTestGuard};
use credcache_test_utils::home::SCRUBBED_VARS;
use predicates::prelude::*;

/// A `credcache` command isolated inside `home`
fn credcache(home: &HomeEnvTestGuard) -> Command {
  let mut cmd = Command::cargo_bin("credcache").unwrap();
  for var in SCRUBBED_VARS {
    cmd.env_remove(var);
  }
  cmd.envs(home.envs()).arg("--colors").arg("never");
  cmd
}

fn set(home: &HomeEnvTestGuard, name: &str, username: &str, password: &str, extra: &[&str]) {
  credcache(home)
    .args(["set", name, "--username", username, "--password-stdin"])
    .args(extra)
    .write_stdin(format!("{password}\n"))
    .assert()
    .success();
}

#[test]
fn test_set_then_get_prints_json() {
  let home = HomeEnvTestGuard::new();
  set(&home, "vCenter", "admin", "s3cr3t", &[]);

  let output = credcache(&home)
    .args(["get", "vCenter", "--no-prompt"])
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();

  let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
  assert_eq!(value["name"], "vCenter");
  assert_eq!(value["username"], "admin");
  assert_eq!(value["password"], "s3cr3t");
}

#[test]
fn test_get_single_field_formats() {
  let home = HomeEnvTestGuard::new();
  set(&home, "vCenter", "admin", "s3cr3t", &[]);

  credcache(&home)
    .args(["get", "vCenter", "--no-prompt", "--format", "username"])
    .assert()
    .success()
    .stdout("admin\n");

  credcache(&home)
    .args(["get", "vCenter", "--no-prompt", "--format", "password"])
    .assert()
    .success()
    .stdout("s3cr3t\n");
}

#[test]
fn test_stored_artifacts_live_in_default_store() {
  let home = HomeEnvTestGuard::new();
  set(&home, "vCenter", "admin", "s3cr3t", &[]);

  let store = home.default_store();
  assert_eq!(fs::read_to_string(store.join("vCenter.username")).unwrap(), "admin\n");

  let token = fs::read_to_string(store.join("vCenter.password")).unwrap();
  assert_eq!(token.lines().count(), 1);
  assert!(!token.contains("s3cr3t"));
}

#[test]
fn test_no_prompt_without_stored_credential_reports_and_succeeds() {
  let home = HomeEnvTestGuard::new();

  credcache(&home)
    .args(["get", "vCenter", "--no-prompt"])
    .assert()
    .success()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("prompting for a new credential is not allowed"));

  assert!(!home.default_store().join("vCenter.username").exists());
  assert!(!home.default_store().join("vCenter.password").exists());
}

#[test]
fn test_get_without_terminal_reports_prompt_failure() {
  let home = HomeEnvTestGuard::new();

  credcache(&home)
    .args(["get", "vCenter"])
    .assert()
    .success()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("Interactive prompt failed"));
}

#[test]
fn test_invalid_name_is_reported_before_touching_disk() {
  let home = HomeEnvTestGuard::new();

  credcache(&home)
    .args(["get", "bad name!", "--no-prompt"])
    .assert()
    .success()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("Invalid credential name 'bad name!'"));

  assert!(!home.default_store().exists());
}

#[test]
fn test_set_rejects_invalid_name() {
  let home = HomeEnvTestGuard::new();

  credcache(&home)
    .args(["set", "../escape", "--username", "admin", "--password-stdin"])
    .write_stdin("s3cr3t\n")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid credential name"));
}

#[test]
fn test_set_with_empty_stdin_fails() {
  let home = HomeEnvTestGuard::new();

  credcache(&home)
    .args(["set", "vCenter", "--username", "admin", "--password-stdin"])
    .write_stdin("")
    .assert()
    .failure()
    .stderr(predicate::str::contains("No password on stdin"));

  assert!(!home.default_store().join("vCenter.username").exists());
}

#[test]
fn test_set_rejects_empty_username() {
  let home = HomeEnvTestGuard::new();

  credcache(&home)
    .args(["set", "vCenter", "--username", "", "--password-stdin"])
    .write_stdin("s3cr3t\n")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid username for credential 'vCenter'"))
    .stderr(predicate::str::contains("Stored credential").not());

  assert!(!home.default_store().join("vCenter.username").exists());
  assert!(!home.default_store().join("vCenter.password").exists());
}

#[test]
#[cfg(unix)]
fn test_empty_key_file_variable_uses_default_key() {
  let home = HomeEnvTestGuard::new();

  credcache(&home)
    .env("CREDCACHE_KEY_FILE", "")
    .args(["set", "vCenter", "--username", "admin", "--password-stdin"])
    .write_stdin("s3cr3t\n")
    .assert()
    .success();

  credcache(&home)
    .env("CREDCACHE_KEY_FILE", "")
    .args(["get", "vCenter", "--no-prompt", "--format", "password"])
    .assert()
    .success()
    .stdout("s3cr3t\n");

  assert!(!home.key_file().exists());
}

#[test]
fn test_set_overwrites_existing_credential() {
  let home = HomeEnvTestGuard::new();
  set(&home, "vCenter", "admin", "old", &[]);
  set(&home, "vCenter", "root", "new", &[]);

  credcache(&home)
    .args(["get", "vCenter", "--no-prompt", "--format", "username"])
    .assert()
    .success()
    .stdout("root\n");
}

#[test]
fn test_delete_is_idempotent() {
  let home = HomeEnvTestGuard::new();
  set(&home, "vCenter", "admin", "s3cr3t", &[]);

  credcache(&home).args(["delete", "vCenter"]).assert().success();
  credcache(&home).args(["delete", "vCenter"]).assert().success();
  credcache(&home).args(["delete", "never-stored"]).assert().success();

  assert!(!home.default_store().join("vCenter.username").exists());
  assert!(!home.default_store().join("vCenter.password").exists());
}

#[test]
fn test_store_path_override() {
  let home = HomeEnvTestGuard::new();
  let store = StoreTestGuard::new();
  let store_arg = store.path().to_str().unwrap().to_string();

  set(&home, "vCenter", "admin", "s3cr3t", &["--store-path", &store_arg]);
  assert!(store.has_record("vCenter"));
  assert!(!home.default_store().join("vCenter.username").exists());

  credcache(&home)
    .args(["get", "vCenter", "--no-prompt", "--format", "password", "--store-path", &store_arg])
    .assert()
    .success()
    .stdout("s3cr3t\n");

  credcache(&home)
    .args(["delete", "vCenter", "--store-path", &store_arg])
    .assert()
    .success();
  assert!(!store.has_any_artifact("vCenter"));
}

#[test]
fn test_store_path_from_environment() {
  let home = HomeEnvTestGuard::new();
  let store = StoreTestGuard::new();

  credcache(&home)
    .env("CREDCACHE_STORE_PATH", store.path())
    .args(["set", "vCenter", "--username", "admin", "--password-stdin"])
    .write_stdin("s3cr3t\n")
    .assert()
    .success();

  assert!(store.has_record("vCenter"));
  assert_eq!(store.read_username("vCenter").unwrap(), "admin");
}

#[test]
#[cfg(target_os = "linux")]
fn test_store_path_from_config_file() {
  let home = HomeEnvTestGuard::new();
  let store = StoreTestGuard::new();

  let config_dir = home.config_dir().join("credcache");
  fs::create_dir_all(&config_dir).unwrap();
  fs::write(
    config_dir.join("config.toml"),
    format!("store_path = {:?}\n", store.path().to_str().unwrap()),
  )
  .unwrap();

  set(&home, "vCenter", "admin", "s3cr3t", &[]);

  assert!(store.has_record("vCenter"));
  assert!(!home.default_store().join("vCenter.username").exists());
}

#[test]
fn test_partial_record_is_not_returned() {
  let home = HomeEnvTestGuard::new();
  let store = StoreTestGuard::new();
  let store_arg = store.path().to_str().unwrap().to_string();

  set(&home, "vCenter", "admin", "s3cr3t", &["--store-path", &store_arg]);
  store.drop_password("vCenter").unwrap();

  credcache(&home)
    .args(["get", "vCenter", "--no-prompt", "--store-path", &store_arg])
    .assert()
    .success()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("prompting for a new credential is not allowed"));
}

#[test]
#[cfg(unix)]
fn test_replaced_key_makes_credential_unreadable() {
  let home = HomeEnvTestGuard::new();
  set(&home, "vCenter", "admin", "s3cr3t", &[]);

  // A new key is a new key epoch; the old token can no longer be decrypted
  fs::remove_file(home.key_file()).unwrap();
  set(&home, "other", "admin", "other", &[]);

  credcache(&home)
    .args(["get", "vCenter", "--no-prompt"])
    .assert()
    .success()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("prompting for a new credential is not allowed"));
}

#[test]
fn test_list_reports_complete_and_partial_records() {
  let home = HomeEnvTestGuard::new();
  let store = StoreTestGuard::new();
  let store_arg = store.path().to_str().unwrap().to_string();

  set(&home, "vCenter", "admin", "s3cr3t", &["--store-path", &store_arg]);
  set(&home, "jenkins", "ci", "token", &["--store-path", &store_arg]);
  store.drop_password("jenkins").unwrap();

  credcache(&home)
    .args(["list", "--store-path", &store_arg])
    .assert()
    .success()
    .stdout(predicate::str::contains("vCenter"))
    .stdout(predicate::str::contains("complete"))
    .stdout(predicate::str::contains("jenkins"))
    .stdout(predicate::str::contains("missing password"));
}

#[test]
#[cfg(target_os = "linux")]
fn test_list_aligns_unicode_names() {
  let home = HomeEnvTestGuard::new();
  let store = StoreTestGuard::new();
  let store_arg = store.path().to_str().unwrap().to_string();

  set(&home, "vCenter", "admin", "s3cr3t", &["--store-path", &store_arg]);
  set(&home, "Ärger", "admin", "s3cr3t", &["--store-path", &store_arg]);

  credcache(&home)
    .args(["list", "--store-path", &store_arg])
    .assert()
    .success()
    .stdout("vCenter  complete\nÄrger    complete\n");
}

#[test]
fn test_list_empty_store() {
  let home = HomeEnvTestGuard::new();

  credcache(&home)
    .arg("list")
    .assert()
    .success()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("No credentials stored"));
}

#[test]
fn test_completion_script() {
  let home = HomeEnvTestGuard::new();

  credcache(&home)
    .args(["completion", "bash"])
    .assert()
    .success()
    .stdout(predicate::str::contains("credcache"));
}
