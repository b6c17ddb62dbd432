use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Returned by every accept on a one-shot listener after the first.
    #[error("connection already accepted")]
    AlreadyAccepted,
}

impl Error {
    pub fn is_already_accepted(&self) -> bool {
        matches!(self, Self::AlreadyAccepted)
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            Error::AlreadyAccepted => io::Error::other(Error::AlreadyAccepted),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
