use std::fmt;

use anyhow::Context as _;
use serde::Serialize;
use structopt::StructOpt;

use cfgen_codeforces::CodeforcesActor;

use crate::cmd::{Outcome, Run};
use crate::config::FailurePolicy;
use crate::model::{ContestId, ContestListing};
use crate::{Config, Console, Result};

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub struct FetchOpt {
    /// Id of the contest (e.g. 1850)
    #[structopt(long = "id", short = "c")]
    contest_id: ContestId,
    /// Author handle written into generated solution files
    #[structopt(long, short)]
    user: String,
    /// Number of problems fetched at the same time [default: from config, or 5]
    #[structopt(long, short)]
    workers: Option<usize>,
    /// Fails if any problem could not be fetched or saved
    #[structopt(long)]
    strict: bool,
}

impl FetchOpt {
    fn apply_to(&self, conf: &Config) -> Result<Config> {
        let mut fetch_conf = conf.fetch().clone();
        if let Some(workers) = self.workers {
            fetch_conf = fetch_conf.with_workers(workers);
        }
        if self.strict {
            fetch_conf = fetch_conf.with_failure_policy(FailurePolicy::Strict);
        }
        fetch_conf
            .validate()
            .context("Invalid command line options")?;

        let mut conf = conf.clone();
        conf.set_fetch(fetch_conf);
        Ok(conf)
    }
}

impl Run for FetchOpt {
    fn run(&self, conf: &Config, cnsl: &mut Console) -> Result<Box<dyn Outcome>> {
        let conf = self.apply_to(conf)?;
        let actor = CodeforcesActor::new(&conf)?;
        let contest = actor.fetch(self.contest_id, &self.user, cnsl)?;
        Ok(Box::new(FetchOutcome { contest }))
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchOutcome {
    contest: ContestListing,
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Fetched {} problems of {}",
            self.contest.problem_codes().len(),
            self.contest.name()
        )
    }
}

impl Outcome for FetchOutcome {
    fn is_error(&self) -> bool {
        false
    }
}
