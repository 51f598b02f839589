//! Global subscriber installation for binaries.
//!
//! Libraries only emit events; whoever owns the process picks the output.
//! The filter comes from `DTREE_LOG` using `EnvFilter` directive syntax
//! (e.g. `dtree_session=debug,dtree_core=trace`), defaulting to `info`.

use std::fmt;

use tracing_subscriber::EnvFilter;

const ENV_LOG: &str = "DTREE_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

/// Output format for installed logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Failure to install the global subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriberError {
    /// A global subscriber is already set.
    AlreadySet,
}

impl fmt::Display for SubscriberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySet => write!(f, "a global tracing subscriber is already installed"),
        }
    }
}

impl std::error::Error for SubscriberError {}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install a stderr subscriber for the whole process.
pub fn install_subscriber(format: LogFormat) -> Result<(), SubscriberError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(true);
    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|_| SubscriberError::AlreadySet)?;
    tracing::debug!(format = ?format, "subscriber installed");
    Ok(())
}

