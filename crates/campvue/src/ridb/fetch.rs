use campvue_core::query::PageRequest;
use campvue_core::ridb::{validate_page, validate_record, Page};
use serde::de::DeserializeOwned;

use super::{Endpoint, RidbClient};
use crate::prelude::*;

impl RidbClient {
    /// One GET against `endpoint`, decoded as JSON.
    ///
    /// The whole exchange, body included, shares one deadline. There are no
    /// retries.
    pub async fn get_json(
        &self,
        endpoint: &Endpoint,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, Error> {
        let url = self.url(endpoint);

        let exchange = async {
            let response = self
                .http
                .get(&url)
                .query(&endpoint.query)
                .query(query)
                .send()
                .await
                .map_err(|e| Error::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(Error::Remote {
                    status: status.as_u16(),
                    status_text: status.canonical_reason().unwrap_or_default().to_string(),
                });
            }

            response
                .bytes()
                .await
                .map_err(|e| Error::Transport(e.to_string()))
        };

        let body = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;

        serde_json::from_slice(&body).map_err(|_| {
            Error::MalformedResponse(format!(
                "Invalid or incomplete JSON received from RIDB ({})",
                endpoint.label
            ))
        })
    }

    /// Fetch and validate one page of a list endpoint
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        request: PageRequest,
    ) -> Result<Page<T>, Error> {
        log::debug!(
            "GET {} limit={} offset={}",
            endpoint.path,
            request.limit,
            request.offset
        );

        let query = [
            ("limit", request.limit.to_string()),
            ("offset", request.offset.to_string()),
        ];
        let page = validate_page::<T>(self.get_json(endpoint, &query).await?)?;

        log::debug!(
            "{}: {} record(s) at offset {}, total {:?}",
            endpoint.label,
            page.returned_count(),
            request.offset,
            page.total_count
        );

        Ok(page)
    }

    /// Fetch and validate a single record
    pub async fn fetch_record<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, Error> {
        log::debug!("GET {}", endpoint.path);

        Ok(validate_record(self.get_json(endpoint, &[]).await?)?)
    }
}
