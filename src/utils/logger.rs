use log::{Level, Log, Metadata, Record, SetLoggerError};

use std::io::Write;

/// Writes every record at or above `level` to stderr as
/// `LEVEL [thread] target: message`
pub struct ConsoleLogger {
  level: Level,
}

impl ConsoleLogger {
  pub fn new(level: Level) -> Self {
    ConsoleLogger { level }
  }

  /// Installs a console logger as the global logger
  pub fn init(level: Level) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(ConsoleLogger::new(level)))?;
    log::set_max_level(level.to_level_filter());
    Ok(())
  }
}

fn format_record(record: &Record<'_>) -> String {
  let current = std::thread::current();
  format!(
    "{:<5} [{}] {}: {}",
    record.level(),
    current.name().unwrap_or("unnamed"),
    record.target(),
    record.args()
  )
}

impl Log for ConsoleLogger {
  fn enabled(&self, metadata: &Metadata<'_>) -> bool {
    metadata.level() <= self.level
  }

  fn log(&self, record: &Record<'_>) {
    if self.enabled(record.metadata()) {
      let _ = writeln!(std::io::stderr(), "{}", format_record(record));
    }
  }

  fn flush(&self) {
    let _ = std::io::stderr().flush();
  }
}
