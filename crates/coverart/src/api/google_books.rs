use log::{info, trace};
use serde::Deserialize;

use crate::{cover::Cover, Error};

use super::Client;

/// The Google Books volumes endpoint, queried as `{endpoint}?q=isbn:{isbn}`.
pub const GOOGLE_BOOKS_ENDPOINT: &str = "https://www.googleapis.com/books/v1/volumes";

pub(crate) fn volumes_url(endpoint: &str, isbn: &str) -> String {
    let mut url = endpoint.to_owned();
    url.push_str("?q=isbn:");
    url.push_str(isbn);
    url
}

pub(crate) async fn get_volumes<C: Client>(
    client: &C,
    endpoint: &str,
    isbn: &str,
) -> Result<CatalogResponse, Error> {
    info!("Searching for ISBN '{isbn}' using Google Books API");
    let url = volumes_url(endpoint, isbn);

    let response = client.get_json(&url).await?;

    trace!("Request for ISBN '{isbn}' was successful");
    Ok(response)
}

/// The reply of the volumes endpoint.
///
/// Only the first item is ever consulted. Every field is optional here as a reply missing any of
/// them still maps to a [`Cover`] rather than a deserialize error.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
pub(crate) struct CatalogResponse {
    #[serde(default)]
    items: Option<Vec<Item>>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct Item {
    #[serde(rename = "volumeInfo", default)]
    volume_info: Option<VolumeInfo>,
}

/// Volume information from the Google Book API
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct VolumeInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "imageLinks", default)]
    image_links: Option<ImageLinks>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct ImageLinks {
    #[serde(default)]
    thumbnail: Option<String>,
}

impl From<CatalogResponse> for Cover {
    fn from(response: CatalogResponse) -> Self {
        let Some(item) = response.items.and_then(|items| items.into_iter().next()) else {
            return Self::NoResults;
        };

        let Some(VolumeInfo { title, image_links }) = item.volume_info else {
            return Self::NoImage;
        };

        match image_links
            .and_then(|links| links.thumbnail)
            .filter(|thumbnail| !thumbnail.is_empty())
        {
            Some(thumbnail) => Self::Found { thumbnail, title },
            None => Self::NoImage,
        }
    }
}
