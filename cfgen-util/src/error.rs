use std::io;
use std::path::PathBuf;

use reqwest::{StatusCode, Url};
use thiserror::Error;

/// Failures of fetching a page or preparing the place to save it.
///
/// These are wrapped into `anyhow::Error` at component boundaries.
/// Use `downcast_ref::<FetchError>()` to tell them apart.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Could not send request to {url}")]
    Network {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("Received status {status} from {url}")]
    HttpStatus { status: StatusCode, url: Url },
    #[error("Could not read response body from {url}")]
    Parse {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("Could not create directory : {}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
