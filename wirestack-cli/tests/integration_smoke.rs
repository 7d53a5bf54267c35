//! Smoke tests for the wirestack binary

use std::net::SocketAddr;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use tokio::runtime::Runtime;
use wirestack_core::contract::hello::HELLO_WORLD_MESSAGE;
use wirestack_core::Environment;
use wirestack_db::{create_pool, Database, DbConfig};
use wirestack_server::{app_router, serve, AppState, ServerConfig};

/// Command isolated from the developer's ~/.wirestack and ./.env
fn wirestack(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("wirestack").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("WIRESTACK_QUIET", "1")
        .env_remove("DATABASE_URL")
        .env_remove("WIRESTACK_URL")
        .env_remove("RUST_LOG");
    cmd
}

/// Serve the app router on an ephemeral port with a pool that never connects
fn spawn_server(rt: &Runtime) -> SocketAddr {
    rt.block_on(async {
        let db_config = DbConfig::new("postgres://nobody@127.0.0.1:1/none")
            .with_environment(Environment::Test);
        let db = Database::from_pool(create_pool(&db_config).unwrap());
        let state = AppState::new(db, app_router().unwrap());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let config = ServerConfig::default();
            serve(listener, state, &config, std::future::pending()).await
        });
        addr
    })
}

// === Help ===

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    wirestack(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("seed"))
        .stdout(predicate::str::contains("hello"));
}

#[test]
fn test_serve_help() {
    let home = TempDir::new().unwrap();
    wirestack(&home)
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--cors-permissive"));
}

// === Seed ===

#[test]
fn test_seed_without_database_url_fails() {
    let home = TempDir::new().unwrap();
    wirestack(&home)
        .arg("seed")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

#[test]
fn test_seed_with_malformed_url_fails() {
    let home = TempDir::new().unwrap();
    wirestack(&home)
        .args(["seed", "--database-url", "definitely not a url"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_seed_against_unreachable_database_fails() {
    let home = TempDir::new().unwrap();
    wirestack(&home)
        .args([
            "seed",
            "--database-url",
            "postgres://nobody@127.0.0.1:1/none",
            "--acquire-timeout",
            "1",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("seeding failed"));
}

// === Hello ===

#[test]
fn test_hello_prints_server_greeting() {
    let rt = Runtime::new().unwrap();
    let addr = spawn_server(&rt);
    let home = TempDir::new().unwrap();

    wirestack(&home)
        .args(["hello", "--url", &format!("http://{}/trpc", addr)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Connected to backend via RPC!"))
        .stdout(predicate::str::contains(HELLO_WORLD_MESSAGE));
}

#[test]
fn test_hello_without_server_fails() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let home = TempDir::new().unwrap();

    wirestack(&home)
        .args(["hello", "--url", &format!("http://{}/trpc", addr)])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Loading..."));
}

// === Config ===

#[test]
fn test_config_path_under_home() {
    let home = TempDir::new().unwrap();
    wirestack(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".wirestack"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_reads_file() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".wirestack");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "[server]\nbind = \"0.0.0.0:8080\"\n").unwrap();

    wirestack(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.0.0.0:8080"))
        .stdout(predicate::str::contains("http://localhost:4000/trpc"));
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    wirestack(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wirestack"));
}
