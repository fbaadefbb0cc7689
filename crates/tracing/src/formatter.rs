use std::{
    fmt::{self, Display},
    str::FromStr,
};

use clap::ValueEnum;
use tracing_appender::non_blocking::NonBlocking;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::layers::BoxedLayer;

/// The format of emitted log lines.
#[derive(Debug, Copy, Clone, ValueEnum, Eq, PartialEq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,

    /// `key=value` pairs, see <https://brandur.org/logfmt>.
    LogFmt,

    /// Human readable, optionally colored.
    Terminal,
}

impl LogFormat {
    /// Builds a layer emitting this format, written to stdout unless `writer` is given.
    /// [`LogFormat::LogFmt`] always writes to stdout.
    pub(crate) fn apply(
        &self,
        filter: EnvFilter,
        color: Option<String>,
        writer: Option<NonBlocking>,
    ) -> BoxedLayer<Registry> {
        let ansi = color.as_deref().is_some_and(|color| color != "never");
        let target = std::env::var("RUST_LOG_TARGET").map(|val| val != "0").unwrap_or(true);

        match self {
            LogFormat::Json => {
                let layer =
                    tracing_subscriber::fmt::layer().json().with_ansi(ansi).with_target(target);
                match writer {
                    Some(writer) => layer.with_writer(writer).with_filter(filter).boxed(),
                    None => layer.with_filter(filter).boxed(),
                }
            }
            LogFormat::LogFmt => tracing_logfmt::layer().with_filter(filter).boxed(),
            LogFormat::Terminal => {
                let layer = tracing_subscriber::fmt::layer().with_ansi(ansi).with_target(target);
                match writer {
                    Some(writer) => layer.with_writer(writer).with_filter(filter).boxed(),
                    None => layer.with_filter(filter).boxed(),
                }
            }
        }
    }
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::LogFmt => write!(f, "log-fmt"),
            LogFormat::Terminal => write!(f, "terminal"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "logfmt" | "log-fmt" => Ok(LogFormat::LogFmt),
            "terminal" => Ok(LogFormat::Terminal),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_round_trips_through_display() {
        for format in [LogFormat::Json, LogFormat::LogFmt, LogFormat::Terminal] {
            assert_eq!(format.to_string().parse::<LogFormat>(), Ok(format));
        }
    }

    #[test]
    fn test_log_format_rejects_unknown() {
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!("LOGFMT".parse::<LogFormat>(), Ok(LogFormat::LogFmt));
    }
}
