#![warn(clippy::all)]

mod actor;
mod page;
mod persist;

use cfgen_config as config;
use cfgen_util::{abs_path, console, model, pool, report, service, FetchError};

use crate::config::Config;
use crate::console::Console;

pub use actor::CodeforcesActor;
pub use page::{ContestPage, ContestPageBuilder, ProblemPage, ProblemPageBuilder};
pub use persist::Persister;

pub type Error = anyhow::Error;
pub type Result<T> = anyhow::Result<T>;
