#![windows_subsystem = "windows"]
use std::io::{self, BufRead, Write};

use l10n_core::utils::logger;
use l10n_core::{protocol, CoreConfig};

fn main() {
    let config = CoreConfig::from_env();
    logger::init_logger(&config);
    tracing::info!(target_language = %config.target_language, "l10n-core started");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read request line");
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let result = std::panic::catch_unwind(|| protocol::handle(&line, &config));

        let response = match result {
            Ok(resp) => resp,
            Err(_) => {
                tracing::error!("handler panicked");
                serde_json::json!({
                    "status": "error",
                    "message": "internal core error"
                })
                .to_string()
            }
        };

        if writeln!(stdout, "{response}").is_err() {
            break;
        }

        let _ = stdout.flush();
    }

    tracing::info!("stdin closed, shutting down");
}
