#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # coverart
//!
//! coverart finds the books listed on an HTML page and fills in their cover art. Every element
//! marked as a book carries an ISBN and owns one image placeholder; each ISBN is looked up in the
//! Google Books catalog and the thumbnail found, or a short message explaining why there is none,
//! is written into that placeholder.
//!
//! ```no_run
//! # async fn run() -> Result<(), coverart::Error> {
//! use coverart::{Config, Page};
//!
//! let mut page = Page::parse(r#"<div class="book" data-isbn="0735619670"><img class="thumbnail"></div>"#);
//! coverart::enrich(&mut page, &Config::default()).await?;
//! println!("{}", page.html());
//! # Ok(())
//! # }
//! ```

mod api;
pub mod config;
pub mod cover;
mod dispatch;
mod error;
pub mod page;

pub use api::google_books::GOOGLE_BOOKS_ENDPOINT;
pub use config::Config;
pub use cover::Cover;
pub use error::{Error, ErrorKind};
pub use page::{Entry, Page, Placeholder};

use log::trace;

type Client = reqwest::Client;

/// Looks up the cover of every book on `page` and writes it into the book's placeholder.
///
/// Lookups run concurrently on the calling task and are applied as they complete. Books without
/// an ISBN are not looked up and their placeholder is left as it is. A failed lookup only affects
/// its own placeholder.
///
/// Returns the number of lookups issued.
///
/// # Errors
///
/// An [`Err`] is returned when the selectors of `config` are not valid CSS.
pub async fn enrich(page: &mut Page, config: &Config) -> Result<usize, Error> {
    let selectors = config.selectors()?;
    trace!("Enriching page using the catalog at '{}'", config.endpoint);
    dispatch::enrich(&Client::new(), &config.endpoint, &selectors, page).await
}

/// Looks up the cover of a single `isbn`.
///
/// Hyphens in the ISBN are ignored. Failures are reported as [`Cover::Failed`].
pub async fn lookup(isbn: &str, config: &Config) -> Cover {
    let isbn = isbn.replace('-', "");
    trace!("Search cover by ISBN of '{isbn}'");
    dispatch::lookup(&Client::new(), &config.endpoint, &isbn).await
}
