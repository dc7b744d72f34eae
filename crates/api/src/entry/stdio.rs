#![forbid(unsafe_code)]

use crate::SurveyServer;
use crate::support::fail;
use serde::Deserialize;
use serde_json::Value;
use std::io::{BufRead, Write};

#[derive(Debug, Deserialize)]
struct ApiRequest {
    method: String,
    action: String,
    #[serde(default)]
    body: Value,
}

/// Newline-delimited JSON over stdin/stdout: one request object per input
/// line, one response object per output line. EOF ends the loop.
pub(crate) fn run_stdio(server: &mut SurveyServer) -> std::io::Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<ApiRequest>(&line) {
            Ok(request) => server.handle(&request.method, &request.action, &request.body),
            Err(err) => {
                tracing::warn!(error = %err, "malformed request line");
                fail("Invalid request")
            }
        };

        serde_json::to_writer(&mut out, &response)?;
        out.write_all(b"\n")?;
        out.flush()?;
    }

    Ok(())
}
