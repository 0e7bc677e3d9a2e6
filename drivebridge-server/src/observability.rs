//! Tracing and Sentry initialization.

use std::env;
use std::io::IsTerminal;

use secrecy::ExposeSecret;
use sentry::integrations::tracing as sentry_tracing;
use tracing::Level;
use tracing_subscriber::{EnvFilter, Layer, prelude::*};

use crate::config::{Config, LogFormat};

/// Initializes the Sentry SDK if a DSN is configured.
///
/// The returned guard must be kept alive for the duration of the process.
pub fn init_sentry(config: &Config) -> Option<sentry::ClientInitGuard> {
    config.sentry.is_enabled().then(|| {
        sentry::init(sentry::ClientOptions {
            dsn: config
                .sentry
                .dsn
                .as_ref()
                .and_then(|dsn| dsn.expose_secret().as_str().parse().ok()),
            environment: config.sentry.environment.clone(),
            enable_logs: true,
            sample_rate: config.sentry.sample_rate,
            traces_sample_rate: config.sentry.traces_sample_rate,
            ..Default::default()
        })
    })
}

/// Initializes the global tracing subscriber.
pub fn init_tracing(config: &Config) {
    // Same as the default filter, except it converts warnings into events
    // and also sends everything at or above INFO as logs instead of breadcrumbs.
    let sentry_layer = config.sentry.is_enabled().then(|| {
        sentry_tracing::layer().event_filter(|metadata| match *metadata.level() {
            Level::ERROR | Level::WARN => {
                sentry_tracing::EventFilter::Event | sentry_tracing::EventFilter::Log
            }
            Level::INFO => sentry_tracing::EventFilter::Log,
            Level::DEBUG | Level::TRACE => sentry_tracing::EventFilter::Ignore,
        })
    });

    let format = match config.logging.format {
        LogFormat::Auto if std::io::stderr().is_terminal() => LogFormat::Pretty,
        LogFormat::Auto => LogFormat::Simplified,
        other => other,
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);
    let fmt_layer = match format {
        LogFormat::Pretty => fmt_layer.pretty().boxed(),
        LogFormat::Json => fmt_layer.json().boxed(),
        LogFormat::Auto | LogFormat::Simplified => fmt_layer.compact().boxed(),
    };

    let env_filter = env_filter();

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(config.logging.level))
        .with(sentry_layer)
        .with(env_filter)
        .init();
}

/// Builds the environment filter from `RUST_LOG`, falling back to per-crate
/// defaults.
fn env_filter() -> EnvFilter {
    if let Ok(value) = env::var(EnvFilter::DEFAULT_ENV) {
        return EnvFilter::new(value);
    }

    EnvFilter::new(
        "INFO,\
        tower_http=DEBUG,\
        drivebridge_server=TRACE,\
        drivebridge_provider=TRACE,\
        ",
    )
}
