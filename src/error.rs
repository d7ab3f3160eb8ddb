use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

/// Failures raised while setting up the threads backing timers and workers.
///
/// Event channels themselves never fail, they only stop.
#[derive(Debug)]
pub enum Error {
  Spawn {
    name: String,
    source: std::io::Error,
  },
}

impl Error {
  pub(crate) fn spawn(name: &str, source: std::io::Error) -> Self {
    Error::Spawn {
      name: name.to_owned(),
      source,
    }
  }
}

impl Display for Error {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Error::Spawn { name, source } => {
        write!(f, "failed to spawn thread '{}': {}", name, source)
      }
    }
  }
}

impl StdError for Error {
  fn source(&self) -> Option<&(dyn StdError + 'static)> {
    match self {
      Error::Spawn { source, .. } => Some(source),
    }
  }
}
