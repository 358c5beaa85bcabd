//! # Structured Logging Module
//!
//! Environment-aware structured logging that outputs to the console and to a
//! JSON log file, so cache bootstrap decisions and swallowed failures can be
//! traced after the fact.

use chrono::Utc;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_DIR: &str = "log";
const DEFAULT_ENVIRONMENT: &str = "development";

static LOGGER_GUARD: OnceLock<Option<WorkerGuard>> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
///
/// Safe to call more than once and alongside a subscriber installed elsewhere;
/// only the first call has any effect. `RUST_LOG`, when set, replaces the
/// environment's default level.
pub fn init_structured_logging() {
    LOGGER_GUARD.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);

        let log_dir = PathBuf::from(LOG_DIR);
        let file_ready = log_dir.exists() || fs::create_dir_all(&log_dir).is_ok();

        let pid = process::id();
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
        let log_filename = format!("{}.{}.{}.log", environment, pid, timestamp);

        let (file_layer, guard) = if file_ready {
            let file_appender = tracing_appender::rolling::never(&log_dir, &log_filename);
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(file_writer)
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .with_filter(env_filter(log_level));
            (Some(layer), Some(guard))
        } else {
            (None, None)
        };

        let subscriber = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_level(true)
                    .with_ansi(true)
                    .with_filter(env_filter(log_level)),
            )
            .with(file_layer);

        // A global subscriber may already be set by the host application
        if subscriber.try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }

        if file_ready {
            tracing::info!(
                pid = pid,
                environment = %environment,
                log_file = %log_dir.join(&log_filename).display(),
                "Structured logging initialized with file output"
            );
        } else {
            tracing::warn!(
                pid = pid,
                environment = %environment,
                log_dir = %log_dir.display(),
                "Log directory unavailable, logging to console only"
            );
        }

        guard
    });
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Get current environment from environment variables
fn get_environment() -> String {
    resolve_environment(|name| std::env::var(name).ok())
}

fn resolve_environment(lookup: impl Fn(&str) -> Option<String>) -> String {
    lookup("APP_ENV")
        .or_else(|| lookup("RUST_ENV"))
        .filter(|env| !env.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" | "staging" => "info",
        _ => "debug",
    }
}
