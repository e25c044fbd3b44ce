#![warn(clippy::all)]

#[macro_use]
extern crate strum;

use std::io::Write;

use anyhow::{anyhow, Context as _};
use serde::{Deserialize, Serialize};
use structopt::StructOpt;
use strum::VariantNames;

mod cmd;

use cfgen_config as config;
use cfgen_util::{console, model};

use crate::cmd::{Cmd, OutcomeSerialize as _, Run as _};
use crate::config::Config;
use crate::console::Console;

pub type Error = anyhow::Error;
pub type Result<T> = anyhow::Result<T>;

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
pub enum OutputFormat {
    Default,
    Debug,
    Json,
    Yaml,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Default
    }
}

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(about, rename_all = "kebab")]
pub struct Opt {
    #[structopt(flatten)]
    global_opt: GlobalOpt,
    #[structopt(subcommand)]
    cmd: Cmd,
}

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub struct GlobalOpt {
    /// Format of the outcome printed to stdout
    #[structopt(
        long,
        global = true,
        default_value = OutputFormat::Default.into(),
        possible_values = &OutputFormat::VARIANTS,
    )]
    output: OutputFormat,
    /// Prints the outcome in debug format (same as `--output debug`)
    #[structopt(long, global = true)]
    debug: bool,
    /// Hides progress messages (warnings are still shown)
    #[structopt(long, short, global = true)]
    quiet: bool,
}

impl GlobalOpt {
    fn output_format(&self) -> OutputFormat {
        if self.debug {
            OutputFormat::Debug
        } else {
            self.output
        }
    }
}

impl Opt {
    pub fn is_quiet(&self) -> bool {
        self.global_opt.quiet
    }

    pub fn run(&self, cnsl: &mut Console, stdout: &mut dyn Write) -> Result<()> {
        let conf = Config::load(None, cnsl).context("Could not load config")?;
        let outcome = self.cmd.run(&conf, cnsl)?;
        outcome.print(stdout, self.global_opt.output_format())?;
        if outcome.is_error() {
            Err(anyhow!("Command exited with error"))
        } else {
            Ok(())
        }
    }
}
