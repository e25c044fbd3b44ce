use scraper::Selector;

use crate::service::scrape::Scrape;

mod contest;
mod problem;

pub use contest::{ContestPage, ContestPageBuilder};
pub use problem::{ProblemPage, ProblemPageBuilder};

pub trait ExtractTexts: Scrape {
    /// Joins the inner texts of all elements matching `selector`.
    ///
    /// Returns an empty string if nothing matches.
    fn join_texts(&self, selector: &Selector, sep: &str) -> String {
        self.elem()
            .select(selector)
            .map(|elem| elem.inner_text())
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl<T: Scrape> ExtractTexts for T {}
