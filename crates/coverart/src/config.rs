//! How book entries are recognised on a page and where their covers are looked up.

use scraper::Selector;

use crate::{api::google_books::GOOGLE_BOOKS_ENDPOINT, Error, ErrorKind};

/// Default selector for elements marked as books.
pub const DEFAULT_BOOK_SELECTOR: &str = ".book";
/// Default attribute of a book element holding its ISBN.
pub const DEFAULT_ISBN_ATTRIBUTE: &str = "data-isbn";
/// Default selector for the image placeholder within a book element.
pub const DEFAULT_PLACEHOLDER_SELECTOR: &str = ".thumbnail";

/// Settings for a scan and the lookups that follow it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The catalog endpoint, queried as `{endpoint}?q=isbn:{isbn}`.
    pub endpoint: String,
    /// CSS selector matching elements marked as books.
    pub book_selector: String,
    /// Attribute of a book element that holds its identifier.
    pub isbn_attribute: String,
    /// CSS selector matching the image placeholder inside a book element.
    pub placeholder_selector: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: GOOGLE_BOOKS_ENDPOINT.to_owned(),
            book_selector: DEFAULT_BOOK_SELECTOR.to_owned(),
            isbn_attribute: DEFAULT_ISBN_ATTRIBUTE.to_owned(),
            placeholder_selector: DEFAULT_PLACEHOLDER_SELECTOR.to_owned(),
        }
    }
}

impl Config {
    /// Compiles the selectors of this config.
    ///
    /// # Errors
    ///
    /// An [`Err`] with [`ErrorKind::Config`] is returned when either selector is not valid CSS.
    pub fn selectors(&self) -> Result<Selectors, Error> {
        Ok(Selectors {
            book: parse_selector(&self.book_selector)?,
            isbn_attribute: self.isbn_attribute.clone(),
            placeholder: parse_selector(&self.placeholder_selector)?,
        })
    }
}

/// The compiled form of the scan part of a [`Config`].
#[derive(Debug)]
pub struct Selectors {
    pub(crate) book: Selector,
    pub(crate) isbn_attribute: String,
    pub(crate) placeholder: Selector,
}

fn parse_selector(selector: &str) -> Result<Selector, Error> {
    Selector::parse(selector).map_err(|e| {
        Error::new(
            ErrorKind::Config,
            format!("'{selector}' is not a valid selector: {e:?}"),
        )
    })
}
