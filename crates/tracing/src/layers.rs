use std::path::{Path, PathBuf};

use rolling_file::{RollingConditionBasic, RollingFileAppender};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::Directive, Layer, Registry};

use crate::{build_env_filter, formatter::LogFormat};

/// Guard flushing the background file writer when dropped.
pub type FileWorkerGuard = WorkerGuard;

/// A boxed layer over the subscriber `S`.
pub(crate) type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Maximum size of one log file before it is rotated.
const DEFAULT_MAX_SIZE_BYTES: u64 = 200 * 1024 * 1024;

/// Number of rotated log files kept.
const DEFAULT_MAX_FILES: usize = 5;

/// Where, and how large, file logs are written.
#[derive(Debug, Clone)]
pub struct FileInfo {
    dir: PathBuf,
    file_name: String,
    max_size_bytes: u64,
    max_files: usize,
}

impl FileInfo {
    /// Logs to `dir/file_name`, rotating at 200MB and keeping 5 files.
    pub fn new(dir: PathBuf, file_name: String) -> Self {
        Self { dir, file_name, max_size_bytes: DEFAULT_MAX_SIZE_BYTES, max_files: DEFAULT_MAX_FILES }
    }

    /// Sets the rotation size.
    pub fn with_max_size(mut self, max_size_bytes: u64) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    /// Sets how many rotated files are kept.
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    fn path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.file_name)
    }
}

/// The layers of a subscriber under construction.
pub(crate) struct Layers {
    inner: Vec<BoxedLayer<Registry>>,
}

impl Layers {
    pub(crate) fn new() -> Self {
        Self { inner: vec![] }
    }

    pub(crate) fn into_inner(self) -> Vec<BoxedLayer<Registry>> {
        self.inner
    }

    pub(crate) fn stdout(
        &mut self,
        format: LogFormat,
        default_directive: Directive,
        filters: &str,
        color: Option<String>,
    ) -> eyre::Result<()> {
        let filter = build_env_filter(Some(default_directive), filters)?;
        self.inner.push(format.apply(filter, color, None));
        Ok(())
    }

    pub(crate) fn journald(&mut self, filter: &str) -> eyre::Result<()> {
        let filter = build_env_filter(None, filter)?;
        let layer = tracing_journald::layer()?.with_filter(filter).boxed();
        self.inner.push(layer);
        Ok(())
    }

    pub(crate) fn file(
        &mut self,
        format: LogFormat,
        filter: &str,
        file_info: FileInfo,
    ) -> eyre::Result<FileWorkerGuard> {
        std::fs::create_dir_all(&file_info.dir)?;
        let appender = RollingFileAppender::new(
            file_info.path(),
            RollingConditionBasic::new().max_size(file_info.max_size_bytes),
            file_info.max_files,
        )?;
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let filter = build_env_filter(Some(LevelFilter::DEBUG.into()), filter)?;
        self.inner.push(format.apply(filter, None, Some(writer)));
        Ok(guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_info_path() {
        let info = FileInfo::new(PathBuf::from("/tmp/kiln"), "kiln.log".to_string())
            .with_max_files(2)
            .with_max_size(1024);

        assert_eq!(info.path(), PathBuf::from("/tmp/kiln/kiln.log"));
        assert_eq!(info.max_files, 2);
        assert_eq!(info.max_size_bytes, 1024);
    }
}
