//! Config for cfgen.
//!
//! Config is read from `cfgen.yaml` found in the current directory
//! or any of its parent directories. Every field is optional
//! and unknown fields are rejected.
//! When no config file is found, the defaults are used
//! and the current directory becomes the base directory.
//!
//! ## Fields
//!
//! - `base_url` : root of the contest site (default: `https://codeforces.com`).
//!   Pages are looked up below its path.
//! - `user_agent` : `User-Agent` header sent with every request
//! - `fetch` :
//!   - `workers` : number of problems fetched at the same time (default: `5`)
//!   - `max_problem_code_len` : problem codes longer than this are ignored (default: `2`)
//!   - `failure_policy` : `best-effort` or `strict` (default: `best-effort`)
//! - `output_dir` : directory where contest directories are created,
//!   relative to the base directory (default: the base directory).
//!   Tilde and environment variables are expanded.
//! - `template` : [Tera](https://tera.netlify.com/) template of `solution.cpp`
//!
//! ## Template variables
//!
//! - `author` (str): author handle given on the command line
//! - `created` (str): local time of generation (e.g.: `2024-01-02 03:04:05`)
//! - `contest` (int): id of contest (e.g.: `1850`)
//! - `problem` (str): code of problem (e.g.: `A`)
//!
//! Following filters are available in addition to built-in filters of Tera.
//! - `camel_case` : converts string to `camelCase`
//! - `pascal_case` : converts string to `PascalCase`
//! - `snake_case` : converts string to `snake_case`
//! - `kebab_case` : converts string to `kebab-case`

#![warn(clippy::all)]

#[macro_use]
extern crate strum;

use std::fmt;
use std::io::Write as _;

use anyhow::{anyhow, Context as _};
use getset::CopyGetters;
use serde::{Deserialize, Serialize};
use url::Url;

use cfgen_util::{abs_path, console, model, service};

mod template;

use crate::abs_path::AbsPathBuf;
use crate::console::Console;
use crate::model::{ContestId, ProblemCode};
pub use template::{Expand, SolutionContext, SolutionTempl};

pub type Error = anyhow::Error;
pub type Result<T> = anyhow::Result<T>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Config {
    pub base_dir: AbsPathBuf,
    body: ConfigBody,
}

impl Config {
    /// Loads config from the nearest `cfgen.yaml`, falling back to defaults.
    pub fn load(base_dir: Option<AbsPathBuf>, cnsl: &mut Console) -> Result<Self> {
        let base_dir = match base_dir {
            Some(base_dir) => Some(base_dir),
            None => ConfigBody::search(cnsl)?,
        };
        match base_dir {
            Some(base_dir) => {
                let body = ConfigBody::load(&base_dir, cnsl)?;
                Ok(Self { base_dir, body })
            }
            None => Ok(Self::default_in_dir(AbsPathBuf::cwd()?)),
        }
    }

    pub fn default_in_dir(base_dir: AbsPathBuf) -> Self {
        Self {
            base_dir,
            body: ConfigBody::default(),
        }
    }

    pub fn fetch(&self) -> &FetchConfig {
        &self.body.fetch
    }

    pub fn set_fetch(&mut self, fetch: FetchConfig) {
        self.body.fetch = fetch;
    }

    pub fn user_agent(&self) -> &str {
        &self.body.user_agent
    }

    /// Base url with a trailing slash, so that paths are joined below any path prefix.
    pub fn base_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.body.base_url)
            .with_context(|| format!("Could not parse base url : {}", self.body.base_url))?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn contest_url(&self, contest_id: ContestId) -> Result<Url> {
        self.join_url(&format!("contest/{}", contest_id))
    }

    pub fn problem_url(&self, contest_id: ContestId, problem_code: &ProblemCode) -> Result<Url> {
        self.join_url(&format!("contest/{}/problem/{}", contest_id, problem_code))
    }

    fn join_url(&self, path: &str) -> Result<Url> {
        self.base_url()?
            .join(path)
            .with_context(|| format!("Could not parse url path : {}", path))
    }

    /// Directory under which one directory per contest is created.
    pub fn output_abs_dir(&self) -> Result<AbsPathBuf> {
        match &self.body.output_dir {
            Some(output_dir) => self
                .base_dir
                .join_expand(output_dir)
                .with_context(|| format!("Could not expand output dir : {}", output_dir)),
            None => Ok(self.base_dir.clone()),
        }
    }

    pub fn expand_solution(
        &self,
        author: &str,
        created: &str,
        contest_id: ContestId,
        problem_code: &ProblemCode,
    ) -> Result<String> {
        self.body
            .template
            .expand(&SolutionContext::new(author, created, contest_id, problem_code))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigBody {
    base_url: String,
    user_agent: String,
    fetch: FetchConfig,
    output_dir: Option<String>,
    template: SolutionTempl,
}

impl ConfigBody {
    pub const FILE_NAME: &'static str = "cfgen.yaml";

    const DEFAULT_BASE_URL: &'static str = "https://codeforces.com";

    fn search(cnsl: &mut Console) -> Result<Option<AbsPathBuf>> {
        let cwd = AbsPathBuf::cwd()?;
        let base_dir = cwd.search_dir_contains(Self::FILE_NAME);
        if let Some(base_dir) = &base_dir {
            writeln!(cnsl, "Found config file in base_dir: {}", base_dir)?;
        }
        Ok(base_dir)
    }

    fn load(base_dir: &AbsPathBuf, cnsl: &mut Console) -> Result<Self> {
        let body: Self = base_dir.join(Self::FILE_NAME).load_pretty(
            |file| serde_yaml::from_reader(file).context("Could not read config file as yaml"),
            Some(base_dir),
            cnsl,
        )?;
        body.validate()?;
        Ok(body)
    }

    fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)
            .with_context(|| format!("Found invalid base_url in config file : {}", self.base_url))?;
        self.fetch.validate()
    }
}

impl Default for ConfigBody {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.into(),
            user_agent: service::USER_AGENT.into(),
            fetch: FetchConfig::default(),
            output_dir: None,
            template: SolutionTempl::default(),
        }
    }
}

/// Settings of one fetch run. Command line flags override these.
#[derive(Serialize, Deserialize, CopyGetters, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    #[get_copy = "pub"]
    workers: usize,
    #[get_copy = "pub"]
    max_problem_code_len: usize,
    #[get_copy = "pub"]
    failure_policy: FailurePolicy,
}

impl FetchConfig {
    pub const DEFAULT_WORKERS: usize = 5;

    const DEFAULT_MAX_PROBLEM_CODE_LEN: usize = 2;

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(anyhow!("Number of workers must be at least 1"));
        }
        if self.max_problem_code_len == 0 {
            return Err(anyhow!("max_problem_code_len must be at least 1"));
        }
        Ok(())
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            workers: Self::DEFAULT_WORKERS,
            max_problem_code_len: Self::DEFAULT_MAX_PROBLEM_CODE_LEN,
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// What a run reports when some problems could not be fetched or saved.
#[derive(
    Serialize,
    Deserialize,
    EnumString,
    EnumVariantNames,
    IntoStaticStr,
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FailurePolicy {
    /// Failures are only reported as warnings.
    BestEffort,
    /// The run fails after all problems were processed if any of them failed.
    Strict,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self::BestEffort
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.into())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn deserialize_partial_body() -> anyhow::Result<()> {
        let body: ConfigBody = serde_yaml::from_str(
            r#"---
fetch:
  workers: 3
  failure_policy: strict
output_dir: contests
"#,
        )?;
        assert_eq!(body.fetch.workers(), 3);
        assert_eq!(body.fetch.max_problem_code_len(), 2);
        assert_eq!(body.fetch.failure_policy(), FailurePolicy::Strict);
        assert_eq!(body.output_dir.as_deref(), Some("contests"));
        assert_eq!(body.base_url, "https://codeforces.com");
        assert_eq!(body.template, SolutionTempl::default());
        Ok(())
    }

    #[test]
    fn validate_rejects_invalid_values() -> anyhow::Result<()> {
        let tests = &[
            "fetch: {workers: 0}",
            "fetch: {max_problem_code_len: 0}",
            "base_url: not a url",
        ];
        for test in tests {
            let body: ConfigBody = serde_yaml::from_str(test)?;
            assert!(body.validate().is_err(), "{}", test);
        }
        assert!(ConfigBody::default().validate().is_ok());
        Ok(())
    }

    #[test]
    fn load_from_base_dir() -> anyhow::Result<()> {
        let test_dir = tempdir()?;
        let base_dir = AbsPathBuf::try_new(test_dir.path())?;
        fs::write(
            base_dir.join(ConfigBody::FILE_NAME).as_ref(),
            "fetch:\n  max_problem_code_len: 3\noutput_dir: out\n",
        )?;

        let mut cnsl = Console::buf();
        let conf = Config::load(Some(base_dir.clone()), &mut cnsl)?;

        assert_eq!(conf.fetch().max_problem_code_len(), 3);
        assert_eq!(conf.fetch().workers(), 5);
        assert_eq!(conf.output_abs_dir()?, base_dir.join("out"));
        assert!(cnsl.take_output()?.contains("Loading cfgen.yaml ... loaded"));
        Ok(())
    }

    #[test]
    fn load_invalid_file_fails() -> anyhow::Result<()> {
        let test_dir = tempdir()?;
        let base_dir = AbsPathBuf::try_new(test_dir.path())?;
        fs::write(
            base_dir.join(ConfigBody::FILE_NAME).as_ref(),
            "fetch:\n  workers: [1, 2]\n",
        )?;

        let result = Config::load(Some(base_dir), &mut Console::sink());
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn urls() -> anyhow::Result<()> {
        let conf = Config::default_in_dir(AbsPathBuf::try_new("/tmp")?);
        assert_eq!(
            conf.contest_url(ContestId::new(1850))?.as_str(),
            "https://codeforces.com/contest/1850"
        );
        assert_eq!(
            conf.problem_url(ContestId::new(1850), &"B".into())?.as_str(),
            "https://codeforces.com/contest/1850/problem/B"
        );
        Ok(())
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let tests = &[
            "worker: 3",
            "workers: 3",
            "fetch: {worker: 3}",
            "fetch: {workers: 3, strict: true}",
        ];
        for test in tests {
            let result = serde_yaml::from_str::<ConfigBody>(test);
            assert!(result.is_err(), "{}", test);
        }
    }

    #[test]
    fn urls_keep_base_path() -> anyhow::Result<()> {
        let tests = &["http://localhost:8080/cf", "http://localhost:8080/cf/"];
        for test in tests {
            let body: ConfigBody = serde_yaml::from_str(&format!("base_url: {}", test))?;
            let conf = Config {
                base_dir: AbsPathBuf::try_new("/tmp")?,
                body,
            };
            assert_eq!(
                conf.contest_url(ContestId::new(1850))?.as_str(),
                "http://localhost:8080/cf/contest/1850"
            );
            assert_eq!(
                conf.problem_url(ContestId::new(1850), &"C1".into())?.as_str(),
                "http://localhost:8080/cf/contest/1850/problem/C1"
            );
        }
        Ok(())
    }

    #[test]
    fn failure_policy_from_str() {
        assert_eq!("strict".parse(), Ok(FailurePolicy::Strict));
        assert_eq!("best-effort".parse(), Ok(FailurePolicy::BestEffort));
        assert_eq!(FailurePolicy::default().to_string(), "best-effort");
    }
}
