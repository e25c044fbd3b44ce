use std::io::Write;

use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use scraper::{ElementRef, Html, Selector};

use crate::{FetchError, Result};

pub trait Fetch {
    fn url(&self) -> Result<Url>;

    /// Sends one GET request and parses the body of a 200 response.
    fn fetch(&self, client: &Client) -> Result<Html> {
        let url = self.url()?;
        let res = client
            .get(url.clone())
            .send()
            .map_err(|source| FetchError::Network {
                url: url.clone(),
                source,
            })?;
        let status = res.status();
        if status != StatusCode::OK {
            return Err(FetchError::HttpStatus { status, url }.into());
        }
        let text = res
            .text()
            .map_err(|source| FetchError::Parse { url, source })?;
        Ok(Html::parse_document(&text))
    }

    fn fetch_pretty(&self, client: &Client, cnsl: &mut dyn Write) -> Result<Html> {
        write!(cnsl, "{:7} {} ... ", "GET", self.url()?)?;
        let result = self.fetch(client);
        let msg = match &result {
            Ok(_) => StatusCode::OK.to_string(),
            Err(err) => match err.downcast_ref::<FetchError>().and_then(FetchError::status) {
                Some(status) => status.to_string(),
                None => String::from("failed"),
            },
        };
        writeln!(cnsl, "{}", msg)?;
        result
    }
}

pub trait Scrape {
    fn elem(&self) -> ElementRef;

    fn find_first(&self, selector: &Selector) -> Option<ElementRef> {
        self.elem().select(selector).next()
    }

    fn inner_text(&self) -> String {
        self.elem().text().fold(String::new(), |mut ret, s| {
            ret.push_str(s);
            ret
        })
    }
}

impl Scrape for ElementRef<'_> {
    fn elem(&self) -> ElementRef {
        *self
    }
}
