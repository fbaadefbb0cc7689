//! Tracing setup for kiln binaries.
//!
//! [`KilnTracer`] assembles a [`tracing_subscriber`] registry from up to three layers: stdout in
//! one of the [`LogFormat`]s, journald, and a size-rotated log file written by a background
//! worker. Libraries only emit events through [`tracing`]; installing the subscriber is left to
//! the binary.
//!
//! ```no_run
//! use kiln_tracing::{KilnTracer, LayerInfo, LogFormat, Tracer};
//!
//! let stdout = LayerInfo::new(LogFormat::Terminal, "info".to_string(), String::new(), None);
//! let _guard = KilnTracer::new().with_stdout(stdout).init().expect("failed to init tracing");
//! ```

mod formatter;
mod layers;

pub use formatter::LogFormat;
pub use layers::{FileInfo, FileWorkerGuard};
pub use tracing_subscriber;

use layers::Layers;
use tracing_subscriber::{
    filter::Directive, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Configuration of a single output layer.
#[derive(Debug, Clone)]
pub struct LayerInfo {
    format: LogFormat,
    default_directive: String,
    filters: String,
    color: Option<String>,
}

impl LayerInfo {
    /// Creates a new [`LayerInfo`].
    ///
    /// `default_directive` applies when neither `filters` nor `RUST_LOG` mention a target.
    /// `filters` is a comma separated list of directives, such as `kiln_vm=trace`. `color` is
    /// one of `always`, `auto` or `never`; `None` disables colors.
    pub fn new(
        format: LogFormat,
        default_directive: String,
        filters: String,
        color: Option<String>,
    ) -> Self {
        Self { format, default_directive, filters, color }
    }
}

impl Default for LayerInfo {
    fn default() -> Self {
        Self {
            format: LogFormat::Terminal,
            default_directive: "info".to_string(),
            filters: String::new(),
            color: Some("always".to_string()),
        }
    }
}

/// A tracer that can be installed as the global default subscriber.
pub trait Tracer {
    /// Installs the tracer. The returned guard, if any, must be kept alive for as long as file
    /// logs should be flushed.
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>>;
}

/// The kiln tracer: stdout, plus optional journald and file layers.
#[derive(Debug, Clone)]
pub struct KilnTracer {
    stdout: LayerInfo,
    journald: Option<String>,
    file: Option<(LayerInfo, FileInfo)>,
}

impl KilnTracer {
    /// A tracer that logs to stdout at `info` in the terminal format.
    pub fn new() -> Self {
        Self { stdout: LayerInfo::default(), journald: None, file: None }
    }

    /// Replaces the stdout layer configuration.
    pub fn with_stdout(mut self, config: LayerInfo) -> Self {
        self.stdout = config;
        self
    }

    /// Also logs to journald, filtered by `filter`.
    pub fn with_journald(mut self, filter: String) -> Self {
        self.journald = Some(filter);
        self
    }

    /// Also logs to a rotating file.
    pub fn with_file(mut self, config: LayerInfo, file_info: FileInfo) -> Self {
        self.file = Some((config, file_info));
        self
    }
}

impl Default for KilnTracer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracer for KilnTracer {
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>> {
        let mut layers = Layers::new();

        layers.stdout(
            self.stdout.format,
            self.stdout.default_directive.parse()?,
            &self.stdout.filters,
            self.stdout.color,
        )?;

        if let Some(filter) = self.journald {
            layers.journald(&filter)?;
        }

        let file_guard = match self.file {
            Some((config, file_info)) => {
                Some(layers.file(config.format, &config.filters, file_info)?)
            }
            None => None,
        };

        tracing_subscriber::registry().with(layers.into_inner()).try_init()?;
        Ok(file_guard)
    }
}

/// Builds an [`EnvFilter`] from `RUST_LOG`, an optional default directive and a comma separated
/// list of extra directives.
pub(crate) fn build_env_filter(
    default_directive: Option<Directive>,
    directives: &str,
) -> eyre::Result<EnvFilter> {
    let env_filter = match default_directive {
        Some(directive) => EnvFilter::builder().with_default_directive(directive).from_env_lossy(),
        None => EnvFilter::builder().from_env_lossy(),
    };

    directives
        .split(',')
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .try_fold(env_filter, |env_filter, directive| {
            Ok(env_filter.add_directive(directive.parse()?))
        })
}
