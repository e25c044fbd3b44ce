use cfgen_util::select;
use itertools::Itertools as _;
use reqwest::blocking::Client;
use reqwest::Url;
use scraper::{ElementRef, Html};

use crate::model::{ContestId, ContestListing, ProblemCode};
use crate::service::scrape::{Fetch, Scrape};
use crate::{Config, Console, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestPageBuilder<'a> {
    contest_id: ContestId,
    conf: &'a Config,
}

impl<'a> ContestPageBuilder<'a> {
    pub fn new(contest_id: ContestId, conf: &'a Config) -> Self {
        Self { contest_id, conf }
    }

    pub fn build(self, client: &Client, cnsl: &mut Console) -> Result<ContestPage> {
        self.fetch_pretty(client, cnsl)
            .map(|html| ContestPage::new(self.contest_id, html))
    }
}

impl Fetch for ContestPageBuilder<'_> {
    fn url(&self) -> Result<Url> {
        self.conf.contest_url(self.contest_id)
    }
}

/// Dashboard page of a contest, listing its problems.
#[derive(Debug, Clone)]
pub struct ContestPage {
    contest_id: ContestId,
    content: Html,
}

impl ContestPage {
    pub fn new(contest_id: ContestId, content: Html) -> Self {
        Self {
            contest_id,
            content,
        }
    }

    pub fn extract_listing(&self, max_code_len: usize) -> ContestListing {
        let name = self
            .extract_contest_name()
            .unwrap_or_else(|| self.contest_id.to_string());
        let problem_codes = self
            .select_problem_codes()
            .filter(|code| code.is_valid(max_code_len))
            .unique()
            .collect();
        ContestListing::new(self.contest_id, name, problem_codes)
    }

    fn extract_contest_name(&self) -> Option<String> {
        self.find_first(select!(".rtable .left"))
            .map(|elem| to_dir_name(&elem.inner_text()))
            .filter(|name| !name.is_empty())
    }

    // option values of the problem selector on the submit form
    fn select_problem_codes(&self) -> impl Iterator<Item = ProblemCode> + '_ {
        self.content
            .select(select!(r#"select[name="submittedProblemIndex"] option"#))
            .filter_map(|elem| elem.value().attr("value"))
            .map(ProblemCode::from)
    }
}

impl Scrape for ContestPage {
    fn elem(&self) -> ElementRef {
        self.content.root_element()
    }
}

fn to_dir_name(title: &str) -> String {
    title
        .replace(':', "")
        .replace(|c: char| c == '/' || c == '\\', "-")
        .trim()
        .to_owned()
}
