
use std::{error, fmt};
use std::fmt::{Debug, Display, Formatter};

/// Generic error type shared by all compiler stages.
///
/// Each stage defines its own `ErrorKind` enum and aliases
/// `error::Error<ErrorKind>`. The optional source preserves the error that
/// caused this one when crossing a stage boundary.
#[derive(Debug)]
pub struct Error<K: Debug + Display> {
    pub kind: K,
    source: Option<Box<dyn error::Error + 'static>>,
}

impl<K: Debug + Display> Error<K> {
    pub fn new(kind: K) -> Error<K> {
        Error {
            kind,
            source: None,
        }
    }

    pub fn with_source<E: error::Error + 'static>(kind: K, source: E) -> Error<K> {
        Error {
            kind,
            source: Some(Box::new(source)),
        }
    }
}

impl<K: Debug + Display> Display for Error<K> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(source) = &self.source {
            write!(f, ": {}", source)?;
        }

        Ok(())
    }
}

impl<K: Debug + Display> error::Error for Error<K> {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source.as_deref()
    }
}

impl<K: Debug + Display> From<K> for Error<K> {
    fn from(kind: K) -> Self {
        Error::new(kind)
    }
}
