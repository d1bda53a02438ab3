use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while building the token index from declaration files.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read declaration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
