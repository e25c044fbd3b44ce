use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use getset::Getters;
use serde::{Deserialize, Serialize};

use crate::model::ProblemCode;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct ContestId(u32);

impl ContestId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl From<u32> for ContestId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl FromStr for ContestId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl fmt::Display for ContestId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Everything learned from a contest page before any problem is fetched.
#[derive(Serialize, Deserialize, Getters, Debug, Clone, PartialEq, Eq, Hash)]
#[get = "pub"]
pub struct ContestListing {
    id: ContestId,
    /// Display name, also used as the output directory name.
    name: String,
    problem_codes: Vec<ProblemCode>,
}

impl ContestListing {
    pub fn new(id: ContestId, name: impl Into<String>, problem_codes: Vec<ProblemCode>) -> Self {
        Self {
            id,
            name: name.into(),
            problem_codes,
        }
    }
}
