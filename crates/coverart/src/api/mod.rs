use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::{Error, ErrorKind};

pub(crate) mod google_books;

/// The transport used to reach the catalog service.
///
/// Lookups are polled on a single cooperative scheduler so the futures returned do not need to be
/// `Send`.
#[async_trait(?Send)]
pub trait Client {
    async fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned;
}

#[async_trait(?Send)]
impl Client for reqwest::Client {
    async fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let resp = self
            .get(url)
            .send()
            .await
            .map_err(|e| Error::wrap(ErrorKind::IO, e))?
            .error_for_status()
            .map_err(|e| Error::wrap(ErrorKind::Status, e))?;

        resp.json()
            .await
            .map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
    }
}

#[cfg(test)]
pub(crate) use test::MockClient;
