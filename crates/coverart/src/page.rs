//! The parsed page and the book entries found on it.

use std::collections::HashSet;

use ego_tree::NodeId;
use html5ever::{tendril::StrTendril, LocalName, Namespace, QualName};
use log::{trace, warn};
use scraper::{ElementRef, Html, Node};

use crate::{config::Selectors, Error, ErrorKind};

/// An HTML document holding book entries.
pub struct Page {
    html: Html,
}

/// A handle to the image element owned by one [`Entry`].
///
/// The handle is fixed when the page is scanned and stays valid for the lifetime of the [`Page`]
/// it was taken from, so a lookup can carry it around without borrowing the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Placeholder(NodeId);

/// A book found on the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    isbn: Option<String>,
    placeholder: Placeholder,
}

/// The current `src` and `alt` of a [`Placeholder`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaceholderState {
    /// The image URL.
    pub src: Option<String>,
    /// The descriptive text.
    pub alt: Option<String>,
}

impl Entry {
    /// The ISBN of this entry without hyphens, [`None`] when the identifier attribute is absent or
    /// empty.
    #[must_use]
    pub fn isbn(&self) -> Option<&str> {
        self.isbn.as_deref()
    }

    /// The image placeholder owned by this entry.
    #[must_use]
    pub const fn placeholder(&self) -> Placeholder {
        self.placeholder
    }

    #[allow(clippy::missing_const_for_fn)] // can't be const
    pub(crate) fn into_parts(self) -> (Option<String>, Placeholder) {
        (self.isbn, self.placeholder)
    }
}

impl Page {
    /// Parses a full HTML document.
    ///
    /// Parsing is lenient so any input produces a page, malformed markup is repaired the same way
    /// a browser would.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Finds every book element on the page, in document order.
    ///
    /// Each book claims the first element inside it matching the placeholder selector. A book
    /// without a placeholder, or whose placeholder was already claimed by an enclosing book, is
    /// skipped.
    #[must_use]
    pub fn scan(&self, selectors: &Selectors) -> Vec<Entry> {
        let mut claimed = HashSet::new();
        let mut entries = Vec::new();

        for book in self.html.select(&selectors.book) {
            let isbn = book
                .value()
                .attr(&selectors.isbn_attribute)
                .and_then(normalize_isbn);

            let Some(placeholder) = book.select(&selectors.placeholder).next() else {
                warn!(
                    "Book element with ISBN '{}' has no placeholder - skipping",
                    isbn.as_deref().unwrap_or_default()
                );
                continue;
            };

            let placeholder = Placeholder(placeholder.id());
            if !claimed.insert(placeholder) {
                warn!(
                    "Placeholder is already owned by another book - skipping ISBN '{}'",
                    isbn.as_deref().unwrap_or_default()
                );
                continue;
            }

            trace!("Found book entry with ISBN {isbn:?}");
            entries.push(Entry { isbn, placeholder });
        }

        entries
    }

    /// Reads the current state of a placeholder.
    ///
    /// [`None`] is returned when the handle does not refer to an element of this page.
    #[must_use]
    pub fn placeholder(&self, placeholder: Placeholder) -> Option<PlaceholderState> {
        let element = self.html.tree.get(placeholder.0).and_then(ElementRef::wrap)?;
        let attr = |name: &str| element.value().attr(name).map(str::to_owned);

        Some(PlaceholderState {
            src: attr("src"),
            alt: attr("alt"),
        })
    }

    pub(crate) fn set_attribute(
        &mut self,
        placeholder: Placeholder,
        name: &str,
        value: &str,
    ) -> Result<(), Error> {
        let mut node = self.html.tree.get_mut(placeholder.0).ok_or_else(|| {
            Error::new(ErrorKind::NoValue, "Placeholder is not part of this page")
        })?;

        match node.value() {
            Node::Element(element) => {
                element
                    .attrs
                    .insert(attribute_name(name), StrTendril::from_slice(value));
                Ok(())
            }
            _ => Err(Error::new(
                ErrorKind::NoValue,
                "Placeholder does not refer to an element",
            )),
        }
    }

    /// Serializes the page back to HTML.
    #[must_use]
    pub fn html(&self) -> String {
        self.html.html()
    }
}

fn attribute_name(name: &str) -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(name))
}

fn normalize_isbn(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    // remove hypen from ISBN-13 (if applicable)
    Some(raw.replace('-', ""))
}
