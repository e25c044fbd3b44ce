use std::io::Write as _;

use anyhow::Context as _;
use chrono::Local;

use crate::abs_path::AbsPathBuf;
use crate::model::{ContestId, ProblemRecord};
use crate::report::Report;
use crate::{Config, FetchError, Result};

static STATEMENT_FILE_NAME: &str = "problemStatement.txt";
static INPUT_FILE_NAME: &str = "inputf.in";
static EXPECTED_FILE_NAME: &str = "expectedf.out";
static OUTPUT_FILE_NAME: &str = "outputf.out";
static SOLUTION_FILE_NAME: &str = "solution.cpp";

/// Writes the files of scraped problems into per-problem directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persister<'a> {
    conf: &'a Config,
    contest_id: ContestId,
    author: &'a str,
    created: String,
}

impl<'a> Persister<'a> {
    pub fn new(conf: &'a Config, contest_id: ContestId, author: &'a str) -> Self {
        Self {
            conf,
            contest_id,
            author,
            created: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Saves all files of `record` under `<contest_dir>/<code>/`, overwriting existing ones.
    ///
    /// A failed write is reported and does not stop the remaining writes.
    /// Returns true if every file was written.
    pub fn save(
        &self,
        contest_dir: &AbsPathBuf,
        record: &ProblemRecord,
        reporter: &dyn Report,
    ) -> Result<bool> {
        let problem_dir = contest_dir.join(record.code().as_ref());
        problem_dir
            .create_dir_all()
            .map_err(|source| FetchError::Persist {
                path: problem_dir.as_ref().to_owned(),
                source,
            })?;

        let files = vec![
            (STATEMENT_FILE_NAME, Ok(format_statement(record))),
            (INPUT_FILE_NAME, Ok(record.sample_input().to_owned())),
            (EXPECTED_FILE_NAME, Ok(record.expected_output())),
            (OUTPUT_FILE_NAME, Ok(String::new())),
            (
                SOLUTION_FILE_NAME,
                self.conf
                    .expand_solution(self.author, &self.created, self.contest_id, record.code())
                    .context("Could not expand solution template"),
            ),
        ];

        let mut is_all_saved = true;
        for (file_name, content) in files {
            let result =
                content.and_then(|content| save_file(&problem_dir.join(file_name), &content));
            if let Err(err) = result {
                reporter.warn(record.code(), &err);
                is_all_saved = false;
            }
        }
        Ok(is_all_saved)
    }
}

fn save_file(abs_path: &AbsPathBuf, content: &str) -> Result<()> {
    abs_path
        .save(|mut file| {
            file.write_all(content.as_bytes())
                .with_context(|| format!("Could not write to file : {}", abs_path))
        })
        .map(|_| ())
}

fn format_statement(record: &ProblemRecord) -> String {
    format!(
        "Problem Statement :-\n\n{}\n\n\n\
         Input Specification :-\n\n{}\n\n\n\
         Output Specification :-\n\n{}\n\n\n\
         Input Example :-\n\n{}\n\n\n\
         Output Example :-\n\n{}",
        record.statement(),
        record.input_spec(),
        record.output_spec(),
        record.sample_input(),
        record.expected_output(),
    )
}
