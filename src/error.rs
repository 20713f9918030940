//! Errors raised while building the trie or while reading and writing the lookup files.

use std::collections::TryReserveError;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Error type of this crate. Lookups themselves never fail.
#[derive(Debug)]
pub enum Error {
    /// The node table could not grow to hold a new node.
    Alloc(TryReserveError),
    /// A prefix is longer than the addresses of the trie.
    PrefixLength {
        /// Length of the rejected prefix.
        len: u8,
        /// Number of bits in an address.
        width: u8,
    },
    /// A file could not be opened, read or written.
    Io {
        /// File that caused the error.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A line of an input file could not be parsed.
    Parse {
        /// File that contains the line.
        path: PathBuf,
        /// Line number, starting at 1.
        line: usize,
        /// Content of the offending line.
        content: String,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Alloc(e) => write!(f, "cannot allocate memory for a trie node: {e}"),
            Error::PrefixLength { len, width } => {
                write!(f, "prefix length {len} exceeds the address width of {width} bits")
            }
            Error::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Error::Parse {
                path,
                line,
                content,
            } => write!(f, "{}:{line}: malformed line {content:?}", path.display()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Alloc(e) => Some(e),
            Error::Io { source, .. } => Some(source),
            Error::PrefixLength { .. } | Error::Parse { .. } => None,
        }
    }
}

impl From<TryReserveError> for Error {
    fn from(e: TryReserveError) -> Self {
        Error::Alloc(e)
    }
}
