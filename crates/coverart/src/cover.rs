//! What a lookup found, and how that is written into a placeholder.

use std::borrow::Cow;

use crate::{
    page::{Page, Placeholder},
    Error,
};

/// Descriptive text of a placeholder whose lookup failed.
pub const ERROR_TEXT: &str = "Error loading cover art.";
/// Descriptive text of a placeholder whose lookup found no volumes.
pub const NO_RESULTS_TEXT: &str = "No results found.";
/// Descriptive text of a placeholder whose first volume has no thumbnail.
pub const NO_IMAGE_TEXT: &str = "No image available.";

/// The outcome of looking up one ISBN.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cover {
    /// The first volume found has a thumbnail.
    Found {
        /// The thumbnail URL.
        thumbnail: String,
        /// The title of the volume, if the catalog knows it.
        title: Option<String>,
    },
    /// The first volume found has no thumbnail.
    NoImage,
    /// No volume was found.
    NoResults,
    /// The request failed or the reply could not be read.
    Failed,
}

impl Cover {
    /// The image URL this outcome sets, only [`Cover::Found`] has one.
    #[must_use]
    pub fn src(&self) -> Option<&str> {
        match self {
            Self::Found { thumbnail, .. } => Some(thumbnail),
            _ => None,
        }
    }

    /// The descriptive text this outcome sets.
    #[must_use]
    pub fn alt(&self) -> Cow<'static, str> {
        match self {
            Self::Found { title, .. } => match title {
                Some(title) => Cow::Owned(format!("{title} Cover")),
                None => Cow::Borrowed("Cover"),
            },
            Self::NoImage => Cow::Borrowed(NO_IMAGE_TEXT),
            Self::NoResults => Cow::Borrowed(NO_RESULTS_TEXT),
            Self::Failed => Cow::Borrowed(ERROR_TEXT),
        }
    }

    /// Writes this outcome into `placeholder`.
    ///
    /// The `src` of the placeholder is only touched by [`Cover::Found`].
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when `placeholder` was not taken from `page`.
    pub fn apply(&self, page: &mut Page, placeholder: Placeholder) -> Result<(), Error> {
        if let Some(src) = self.src() {
            page.set_attribute(placeholder, "src", src)?;
        }
        page.set_attribute(placeholder, "alt", &self.alt())
    }
}
