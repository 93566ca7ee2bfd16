use async_trait::async_trait;
use campvue_core::pagination::{Aggregated, Aggregation, AggregationPlan};
use campvue_core::query::PageRequest;
use campvue_core::ridb::Page;
use indicatif::ProgressBar;
use serde::de::DeserializeOwned;

use super::{Endpoint, RidbClient};
use crate::prelude::*;

/// Anything that can return one page of records for a limit/offset pair
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page<T>, Error>;
}

/// Pages of one RIDB list endpoint
pub struct RidbPages<'a> {
    client: &'a RidbClient,
    endpoint: Endpoint,
}

impl<'a> RidbPages<'a> {
    pub fn new(client: &'a RidbClient, endpoint: Endpoint) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl<'a, T> PageSource<T> for RidbPages<'a>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, request: PageRequest) -> Result<Page<T>, Error> {
        self.client.fetch_page(&self.endpoint, request).await
    }
}

/// Helper to set spinner message if spinner is present
fn set_spinner_msg(spinner: Option<&ProgressBar>, msg: impl Into<String>) {
    if let Some(s) = spinner {
        s.set_message(msg.into());
    }
}

/// Page through `source` until the plan's stop conditions say otherwise.
///
/// Pages are fetched one at a time. The first failure aborts the aggregation and
/// everything collected so far is dropped.
pub async fn aggregate<T, S>(
    source: &S,
    plan: AggregationPlan,
    spinner: Option<&ProgressBar>,
) -> Result<Aggregated<T>, Error>
where
    S: PageSource<T> + ?Sized,
    T: Send,
{
    let mut aggregation = Aggregation::new(plan);

    while let Some(request) = aggregation.next_request() {
        set_spinner_msg(
            spinner,
            format!(
                "Fetching page {} ({} record(s) so far)...",
                aggregation.pages_fetched() + 1,
                aggregation.collected_len()
            ),
        );

        match source.fetch_page(request).await {
            Ok(page) => {
                aggregation.accept(page);
                let phase = aggregation.evaluate();
                log::debug!(
                    "page {} at offset {} -> {:?}",
                    aggregation.pages_fetched(),
                    request.offset,
                    phase
                );
            }
            Err(err) => {
                log::debug!(
                    "aggregation aborted after {} page(s): {}",
                    aggregation.pages_fetched(),
                    err
                );
                aggregation.fail();
                return Err(err);
            }
        }
    }

    let aggregated = aggregation
        .finish()
        .map_err(|phase| Error::Generic(format!("aggregation stopped in phase {phase:?}")))?;

    if aggregated.is_truncated() {
        log::warn!(
            "stopped after {} page(s) with {} record(s); more may exist upstream (known total: {:?})",
            aggregated.pages_fetched,
            aggregated.items.len(),
            aggregated.known_total
        );
    }

    log::info!(
        "collected {} record(s) in {} page(s), stop: {:?}",
        aggregated.items.len(),
        aggregated.pages_fetched,
        aggregated.stop
    );

    Ok(aggregated)
}
