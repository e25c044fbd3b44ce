use std::collections::HashSet;

use cfgen_util::select;
use reqwest::blocking::Client;
use reqwest::Url;
use scraper::{ElementRef, Html};

use crate::model::{ContestId, ProblemCode, ProblemRecord};
use crate::page::ExtractTexts as _;
use crate::service::scrape::{Fetch, Scrape};
use crate::{Config, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemPageBuilder<'a> {
    contest_id: ContestId,
    problem_code: &'a ProblemCode,
    conf: &'a Config,
}

impl<'a> ProblemPageBuilder<'a> {
    pub fn new(contest_id: ContestId, problem_code: &'a ProblemCode, conf: &'a Config) -> Self {
        Self {
            contest_id,
            problem_code,
            conf,
        }
    }

    pub fn build(self, client: &Client) -> Result<ProblemPage> {
        self.fetch(client)
            .map(|html| ProblemPage::new(self.problem_code.clone(), html))
    }
}

impl Fetch for ProblemPageBuilder<'_> {
    fn url(&self) -> Result<Url> {
        self.conf.problem_url(self.contest_id, self.problem_code)
    }
}

#[derive(Debug, Clone)]
pub struct ProblemPage {
    code: ProblemCode,
    content: Html,
}

impl ProblemPage {
    pub fn new(code: ProblemCode, content: Html) -> Self {
        Self { code, content }
    }

    /// Extracts every section of the statement.
    ///
    /// Missing sections are extracted as empty text.
    pub fn extract_problem(&self) -> ProblemRecord {
        ProblemRecord::new(
            self.code.clone(),
            self.extract_statement(),
            self.join_texts(select!(".input-specification p"), " "),
            self.join_texts(select!(".output-specification p"), " "),
            self.join_texts(select!(".sample-tests .input pre div"), "\n"),
            self.extract_sample_output_lines(),
        )
    }

    fn extract_statement(&self) -> String {
        // paragraphs of the nested sections also match the statement selector
        let nested = self
            .content
            .select(select!(
                ".input-specification p, .output-specification p, .sample-tests p, .note p"
            ))
            .map(|elem| elem.id())
            .collect::<HashSet<_>>();
        self.content
            .select(select!(".problem-statement > div > p"))
            .filter(|elem| !nested.contains(&elem.id()))
            .map(|elem| elem.inner_text())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_owned()
    }

    fn extract_sample_output_lines(&self) -> Vec<String> {
        self.join_texts(select!(".sample-tests .output pre"), "\n")
            .trim()
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl Scrape for ProblemPage {
    fn elem(&self) -> ElementRef {
        self.content.root_element()
    }
}
