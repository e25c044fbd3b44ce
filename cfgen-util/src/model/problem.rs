use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use getset::Getters;
use serde::{Deserialize, Serialize};

/// Short identifier of a problem inside a contest (e.g. `A`, `B1`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct ProblemCode(String);

impl ProblemCode {
    /// Returns true if the code is non-empty, at most `max_len` characters long
    /// and made of ASCII letters and digits only.
    ///
    /// Codes are used as directory names, so anything else is rejected.
    pub fn is_valid(&self, max_len: usize) -> bool {
        let len = self.0.chars().count();
        len > 0 && len <= max_len && self.0.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

impl<T: Into<String>> From<T> for ProblemCode {
    fn from(code: T) -> Self {
        Self(code.into())
    }
}

impl FromStr for ProblemCode {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl AsRef<str> for ProblemCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProblemCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One scraped problem. Built once per successful scrape and never mutated.
#[derive(Serialize, Deserialize, Getters, Debug, Clone, PartialEq, Eq, Hash)]
#[get = "pub"]
pub struct ProblemRecord {
    code: ProblemCode,
    statement: String,
    input_spec: String,
    output_spec: String,
    sample_input: String,
    sample_output_lines: Vec<String>,
}

impl ProblemRecord {
    pub fn new(
        code: impl Into<ProblemCode>,
        statement: impl Into<String>,
        input_spec: impl Into<String>,
        output_spec: impl Into<String>,
        sample_input: impl Into<String>,
        sample_output_lines: Vec<String>,
    ) -> Self {
        Self {
            code: code.into(),
            statement: statement.into(),
            input_spec: input_spec.into(),
            output_spec: output_spec.into(),
            sample_input: sample_input.into(),
            sample_output_lines,
        }
    }

    pub fn expected_output(&self) -> String {
        self.sample_output_lines.join("\n")
    }
}

impl Default for ProblemRecord {
    fn default() -> Self {
        Self::new(
            "A",
            "Print the sum of two integers.",
            "The only line contains two integers a and b.",
            "Print a + b.",
            "2\n1 2\n3 4",
            vec!["3".into(), "7".into()],
        )
    }
}
