#![warn(clippy::all)]

pub mod abs_path;
pub mod console;
mod error;
mod macros;
pub mod model;
pub mod pool;
pub mod report;
pub mod service;

pub use error::FetchError;

pub type Error = anyhow::Error;
pub type Result<T> = anyhow::Result<T>;
