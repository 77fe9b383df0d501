use std::path::Path;
use std::process::Output;

use tokio::process::Command;

/// Run the CLI binary against `api` with an isolated credentials file.
pub async fn run_cli(args: &[&str], api: &str, credentials: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_hotelbook"));
    cmd.args(args);
    cmd.env("HOTELBOOK_API", api);
    cmd.env("HOTELBOOK_CREDENTIALS", credentials);
    cmd.env_remove("HOTELBOOK_PASSWORD");
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd.output().await.expect("Failed to execute CLI")
}

/// Run the CLI and expect success.
pub async fn run_cli_success(args: &[&str], api: &str, credentials: &Path) -> String {
    let output = run_cli(args, api, credentials).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure. Returns stderr.
pub async fn run_cli_failure(args: &[&str], api: &str, credentials: &Path) -> String {
    let output = run_cli(args, api, credentials).await;
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Write a credentials file holding the given tokens.
pub fn write_credentials(path: &Path, access: &str, refresh: &str) {
    let json = serde_json::json!({ "access_token": access, "refresh_token": refresh });
    std::fs::write(path, json.to_string()).unwrap();
}

/// Read the tokens back from a credentials file.
pub fn read_credentials(path: &Path) -> serde_json::Value {
    match std::fs::read_to_string(path) {
        Ok(json) => serde_json::from_str(&json).unwrap(),
        Err(_) => serde_json::Value::Null,
    }
}
