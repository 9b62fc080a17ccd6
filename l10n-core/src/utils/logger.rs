use std::io::IsTerminal;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{CoreConfig, LogFormat};

/// Logs go to stderr; stdout is reserved for protocol responses.
pub fn init_logger(config: &CoreConfig) {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new("l10n_core=info"));

    // The host reads stderr through a pipe; colour codes only for a terminal.
    let ansi = config.log_ansi.unwrap_or_else(|| std::io::stderr().is_terminal());

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.log_format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(ansi)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_target(false)
                    .json(),
            )
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("logger already initialised");
    }
}
