use crate::qemu_trace;
use core::fmt;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// `log` backend on the QEMU debug console.
///
/// Meant to live in a `static` so that it can be installed without an
/// allocator:
///
/// ```rust,no_run
/// use kernel_qemu::QemuLogger;
/// use log::LevelFilter;
///
/// static LOGGER: QemuLogger = QemuLogger::new(LevelFilter::Debug);
/// LOGGER.init().expect("logger installed twice");
/// ```
pub struct QemuLogger {
    max_level: LevelFilter,
}

impl QemuLogger {
    #[must_use]
    pub const fn new(max_level: LevelFilter) -> Self {
        Self { max_level }
    }

    /// Installs this logger. Call once during early init.
    ///
    /// # Errors
    /// Fails if a logger has already been installed.
    pub fn init(&'static self) -> Result<(), SetLoggerError> {
        log::set_logger(self)?;
        log::set_max_level(self.max_level);
        Ok(())
    }
}

impl Log for QemuLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        qemu_trace!("{}\n", LogLine(record));
    }

    fn flush(&self) {
        // no-op for qemu debug port
    }
}

/// Formats a record as `[LEVEL] target: message` followed by a newline.
///
/// # Errors
/// Propagates errors from `out`.
pub fn format_record(out: &mut impl fmt::Write, record: &Record) -> fmt::Result {
    writeln!(out, "{}", LogLine(record))
}

struct LogLine<'r, 'a>(&'r Record<'a>);

impl fmt::Display for LogLine<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;
        write!(f, "[{}] {}: {}", record.level(), record.target(), record.args())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn records_are_one_line() {
        let mut out = String::new();
        format_record(
            &mut out,
            &Record::builder()
                .level(Level::Info)
                .target("kernel::entry")
                .args(format_args!("memory map has {} regions", 6))
                .build(),
        )
        .unwrap();
        assert_eq!(out, "[INFO] kernel::entry: memory map has 6 regions\n");
    }

    #[test]
    fn filters_by_level() {
        let logger = QemuLogger::new(LevelFilter::Info);
        let at = |level| Metadata::builder().level(level).target("t").build();
        assert!(logger.enabled(&at(Level::Error)));
        assert!(logger.enabled(&at(Level::Info)));
        assert!(!logger.enabled(&at(Level::Debug)));
    }
}
