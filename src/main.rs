mod backend;
mod calc;
mod enrich;
mod ipc;
mod store;

use std::io::{self, BufRead, Write};
use std::time::Duration;

use tracing_subscriber::EnvFilter;

fn main() {
    // stdout carries the protocol; all logging goes to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let latency = std::env::var("BISTROD_LATENCY_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or_default();
    let backend = match backend::BackendClient::from_env() {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring invalid backend configuration");
            None
        }
    };
    let mut state = ipc::AppState::new(store::Store::seeded(), backend, latency);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "bistrod ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply with a request id we never parsed.
                let _ = writeln!(
                    stdout,
                    "{{\"ok\":false,\"error\":{{\"code\":\"bad_json\",\"message\":\"{}\"}}}}",
                    e
                );
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
}
