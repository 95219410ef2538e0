use std::fs;
use std::path::PathBuf;
use std::process::Command;

use assert_cmd::prelude::*;
use serde_json::json;
use tempfile::TempDir;

pub const ACCOUNT_ID: &str = "test-account";
pub const API_TOKEN: &str = "test-token";

const SCRIPT: &str = "export default { async fetch() { return new Response('ok') } }\n";

/// A scratch project directory for driving the binary.
pub struct Fixture {
    dir: TempDir,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Fixture {
        let dir = TempDir::new().unwrap();
        eprintln!("Created fixture at {}", dir.path().display());
        Fixture { dir }
    }

    /// A deployable project: config, script and credentials.
    pub fn scaffold(worker_name: &str) -> Fixture {
        let fixture = Fixture::new();
        fixture.create_config(json!({
            "worker_name": worker_name,
            "kv_namespaces": [{ "binding": "MY_KV", "id": "abc123" }],
            "vars": { "ENV": "prod" }
        }));
        fixture.create_file("worker.js", SCRIPT);
        fixture.create_secrets();
        fixture
    }

    pub fn get_path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn create_file(&self, name: &str, content: &str) {
        fs::write(self.get_path().join(name), content).unwrap();
    }

    pub fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.get_path().join(name)).unwrap()
    }

    pub fn create_config(&self, config: serde_json::Value) {
        self.create_file(
            ".cfworker.json",
            &serde_json::to_string_pretty(&config).unwrap(),
        );
    }

    pub fn create_secrets(&self) {
        self.create_file(
            ".env",
            &format!(
                "CLOUDFLARE_ACCOUNT_ID={}\nCLOUDFLARE_API_TOKEN={}\n",
                ACCOUNT_ID, API_TOKEN
            ),
        );
    }

    /// The binary, run inside the fixture with no credentials or settings
    /// leaking in from the developer's shell.
    pub fn cfworker(&self) -> Command {
        let mut cfworker = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
        cfworker
            .current_dir(self.get_path())
            .env_remove("CLOUDFLARE_ACCOUNT_ID")
            .env_remove("CLOUDFLARE_API_TOKEN")
            .env_remove("CFWORKER_API_BASE_URL")
            .env_remove("CFWORKER_MAX_RETRIES")
            .env_remove("CFWORKER_CONNECT_TIMEOUT")
            .env_remove("CFWORKER_HTTP_TIMEOUT");
        cfworker
    }
}
