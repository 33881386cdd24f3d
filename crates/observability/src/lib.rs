//! Logging setup and request correlation for the copilot-dash binaries.
//!
//! `init_tracing` installs a registry with an `EnvFilter`, a console layer
//! (compact or JSON), and an optional daily-rolling JSON file layer.
//! `request_id_layers` stamps every HTTP request with a ULID `x-request-id`
//! that the `http_span` trace span picks up.

use std::path::{Path, PathBuf};

use http::{HeaderName, Request};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tracing::Span;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Used when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_FILTER: &str = "copilot_dash=info,tower_http=warn,sqlx=warn";

pub const LOG_FORMAT_ENV: &str = "COPILOT_DASH_LOG_FORMAT";
pub const LOG_DIR_ENV: &str = "COPILOT_DASH_LOG_DIR";

const LOG_FILE_PREFIX: &str = "copilot-dash.log";

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("failed to create log directory {path}: {source}")]
    LogDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("a global tracing subscriber is already installed: {0}")]
    AlreadyInstalled(#[from] tracing_subscriber::util::TryInitError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON; anything else is compact.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Explicit filter directives; `RUST_LOG` wins when set.
    pub filter: Option<String>,
    /// Directory for the rolling log file. No file output when `None`.
    pub log_dir: Option<PathBuf>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self {
            format: std::env::var(LOG_FORMAT_ENV)
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
            filter: None,
            log_dir: std::env::var_os(LOG_DIR_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }
}

/// Keeps the non-blocking file writer alive. Drop it last in `main`.
#[must_use = "dropping the guard stops file logging"]
pub struct TracingGuard {
    _file: Option<WorkerGuard>,
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    if let Ok(env_filter) = std::env::var("RUST_LOG") {
        if let Ok(filter) = EnvFilter::try_new(env_filter) {
            return filter;
        }
    }
    config
        .filter
        .as_deref()
        .and_then(|f| EnvFilter::try_new(f).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn ensure_dir(dir: &Path) -> Result<(), TracingError> {
    std::fs::create_dir_all(dir).map_err(|source| TracingError::LogDir {
        path: dir.to_owned(),
        source,
    })
}

/// Install the global subscriber.
pub fn init_tracing(config: &LogConfig) -> Result<TracingGuard, TracingError> {
    let filter = build_env_filter(config);

    let console = match config.format {
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
    };

    let (file_layer, file_guard) = match &config.log_dir {
        Some(dir) => {
            ensure_dir(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()?;

    Ok(TracingGuard { _file: file_guard })
}

/// Generates a fresh ULID for every request lacking an `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeUlidRequestId;

impl MakeRequestId for MakeUlidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = ulid::Ulid::new().to_string();
        http::HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// The set/propagate pair for `x-request-id`. Set must wrap the trace layer.
pub fn request_id_layers() -> (SetRequestIdLayer<MakeUlidRequestId>, PropagateRequestIdLayer) {
    (
        SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeUlidRequestId),
        PropagateRequestIdLayer::new(REQUEST_ID_HEADER),
    )
}

/// Span for one HTTP request, tagged with its request id.
pub fn http_span<B>(request: &Request<B>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "http",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Compact);
        assert_eq!(LogFormat::parse(""), LogFormat::Compact);
    }

    #[test]
    fn test_request_ids_are_unique_ulids() {
        let mut make = MakeUlidRequestId;
        let req = Request::new(());
        let a = make.make_request_id(&req).unwrap();
        let b = make.make_request_id(&req).unwrap();

        let a = a.header_value().to_str().unwrap().to_string();
        let b = b.header_value().to_str().unwrap().to_string();
        assert_ne!(a, b);
        assert_eq!(a.len(), 26);
        assert!(a.parse::<ulid::Ulid>().is_ok());
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
