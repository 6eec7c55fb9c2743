mod calc;
mod config;
mod ipc;
mod model;
mod roster;
mod seed;
mod session;

use config::{DaemonConfig, DEFAULT_LOG_FILTER};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

// stdout carries the protocol; logs must stay on stderr.
fn init_tracing(cfg: &DaemonConfig) {
    let filter = EnvFilter::try_new(&cfg.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if cfg.json_logs {
        builder.with_target(false).json().init();
    } else {
        builder.init();
    }
}

fn main() {
    let cfg = DaemonConfig::from_env();
    init_tracing(&cfg);

    let mut roster = roster::Roster::new();
    let summary = match seed::load(&cfg.seed, &mut roster) {
        Ok(s) => s,
        Err(e) => {
            let chain = format!("{e:#}");
            tracing::error!(error = %chain, "seeding failed");
            std::process::exit(1);
        }
    };
    tracing::info!(
        seed = ?cfg.seed,
        users = summary.users,
        grades = summary.grades,
        notifications = summary.notifications,
        "roster ready"
    );

    let mut state = ipc::AppState::new(roster);

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
                // Can't reply without id.
                tracing::warn!(error = %e, "unparseable request line");
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{}", resp);
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

    tracing::info!("stdin closed; exiting");
}
