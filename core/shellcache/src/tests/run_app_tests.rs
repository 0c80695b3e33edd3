use super::controller_tests::ScriptedNetwork;
use crate::cli::Config;
use crate::domain::ShellResponse;
use crate::ports::inbound::UseCaseRunner;
use crate::wiring;
use common::error::Error;
use std::env;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

// MEMO_HOME / SHELLCACHE_NAME を書き換えるテストを直列化する
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[derive(Clone, Default)]
struct SharedOut(Arc<Mutex<Vec<u8>>>);

impl SharedOut {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedOut {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// 偽のネットワークで App を組み立て、Runner で run する（テスト用の入口）
fn run_app(
    config: Config,
    home: &Path,
    network: Arc<ScriptedNetwork>,
) -> (Result<i32, Error>, String) {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
    let original = env::var("MEMO_HOME").ok();
    let original_name = env::var("SHELLCACHE_NAME").ok();
    env::set_var("MEMO_HOME", home);
    env::remove_var("SHELLCACHE_NAME");

    let out = SharedOut::default();
    let result = wiring::wire_shellcache(&config, network).and_then(|app| {
        let mut runner = crate::Runner {
            app,
            out: Box::new(out.clone()),
        };
        runner.run(config)
    });

    match original {
        Some(v) => env::set_var("MEMO_HOME", v),
        None => env::remove_var("MEMO_HOME"),
    }
    if let Some(v) = original_name {
        env::set_var("SHELLCACHE_NAME", v);
    }
    (result, out.text())
}

fn command(name: &str, cache_name: &str) -> Config {
    Config {
        command: Some(name.to_string()),
        cache_name: Some(cache_name.to_string()),
        ..Default::default()
    }
}

fn network() -> Arc<ScriptedNetwork> {
    Arc::new(ScriptedNetwork::serve_manifest("http://localhost:8080/"))
}

#[test]
fn test_update_then_fetch_from_disk_cache() {
    let home = tempfile::tempdir().unwrap();
    let net = network();

    let (result, out) = run_app(command("update", "handy-memo-cache-v1"), home.path(), net.clone());
    assert_eq!(result.unwrap(), 0);
    assert!(out.contains("Installed handy-memo-cache-v1 (6 resources)"));
    assert!(out.contains("Activated handy-memo-cache-v1"));
    assert!(home.path().join("cache").join("handy-memo-cache-v1.json").is_file());
    assert!(home.path().join("cache").join(".controller.json").is_file());

    let fetches_before = net.calls().len();
    let config = Config {
        url: Some("app.js".to_string()),
        ..command("fetch", "handy-memo-cache-v1")
    };
    let (result, out) = run_app(config, home.path(), net.clone());
    assert_eq!(result.unwrap(), 0);
    assert_eq!(out, "body of http://localhost:8080/app.js");
    assert_eq!(net.calls().len(), fetches_before);

    let log = std::fs::read_to_string(home.path().join("log").join("shellcache.jsonl")).unwrap();
    assert!(log.contains("\"kind\":\"cache\""));
    assert!(log.contains("cache hit"));
}

#[test]
fn test_version_change_removes_old_snapshot_on_disk() {
    let home = tempfile::tempdir().unwrap();
    let (result, _) = run_app(command("update", "handy-memo-cache-v1"), home.path(), network());
    assert_eq!(result.unwrap(), 0);
    let (result, out) = run_app(command("update", "handy-memo-cache-v2"), home.path(), network());
    assert_eq!(result.unwrap(), 0);
    assert!(out.contains("deleted: handy-memo-cache-v1"));

    let (result, out) = run_app(command("status", "handy-memo-cache-v2"), home.path(), network());
    assert_eq!(result.unwrap(), 0);
    assert!(out.contains("State: active"));
    assert!(out.contains("Snapshots: handy-memo-cache-v2\n"));
    assert!(out.contains("Controller: handy-memo-cache-v2"));
}

#[test]
fn test_install_failure_exit_code_and_no_snapshot() {
    let home = tempfile::tempdir().unwrap();
    let net = network();
    net.respond("http://localhost:8080/manifest.json", Ok(ShellResponse::new(500, "")));

    let (result, _) = run_app(command("install", "handy-memo-cache-v1"), home.path(), net);
    assert_eq!(result.unwrap_err().exit_code(), 74);
    assert!(!home.path().join("cache").join("handy-memo-cache-v1.json").exists());
}

#[test]
fn test_fetch_miss_with_error_status_exits_nonzero() {
    let home = tempfile::tempdir().unwrap();
    let net = network();
    net.respond("http://localhost:8080/missing", Ok(ShellResponse::new(404, "nope")));
    let config = Config {
        url: Some("/missing".to_string()),
        ..command("fetch", "handy-memo-cache-v1")
    };
    let (result, out) = run_app(config, home.path(), net);
    assert_eq!(result.unwrap(), 1);
    assert_eq!(out, "nope");
}

#[test]
fn test_invalid_cache_name_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let (result, _) = run_app(command("status", "../escape"), home.path(), network());
    assert_eq!(result.unwrap_err().exit_code(), 64);
}
