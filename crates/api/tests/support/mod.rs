#![forbid(unsafe_code)]
#![allow(dead_code)]

use serde_json::{Value, json};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

pub(crate) struct Server {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    storage_dir: PathBuf,
}

impl Server {
    pub(crate) fn start(test_name: &str) -> Self {
        let storage_dir = temp_dir(test_name);
        let mut child = Command::new(env!("CARGO_BIN_EXE_survey_api"))
            .arg("--storage-dir")
            .arg(&storage_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn survey_api");

        let stdin = child.stdin.take().expect("stdin");
        let stdout = BufReader::new(child.stdout.take().expect("stdout"));

        Self {
            child,
            stdin,
            stdout,
            storage_dir,
        }
    }

    pub(crate) fn request(&mut self, method: &str, action: &str, body: Value) -> Value {
        let line = json!({ "method": method, "action": action, "body": body });
        self.send_raw(&line.to_string())
    }

    pub(crate) fn send_raw(&mut self, line: &str) -> Value {
        writeln!(self.stdin, "{line}").expect("write request");
        self.stdin.flush().expect("flush request");

        let mut response = String::new();
        self.stdout.read_line(&mut response).expect("read response");
        serde_json::from_str(&response).expect("parse response")
    }

    pub(crate) fn submit(&mut self, category: &str, ratings: Value, feedback: Value) -> Value {
        self.request(
            "POST",
            "submit",
            json!({ "category": category, "ratings": ratings, "feedback": feedback }),
        )
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_dir_all(&self.storage_dir);
    }
}

pub(crate) fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("survey_api_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub(crate) fn assert_success(response: &Value) {
    assert_eq!(
        response.get("success").and_then(Value::as_bool),
        Some(true),
        "expected success response, got: {response}"
    );
}

pub(crate) fn assert_failure(response: &Value) -> String {
    assert_eq!(
        response.get("success").and_then(Value::as_bool),
        Some(false),
        "expected failure response, got: {response}"
    );
    response
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
