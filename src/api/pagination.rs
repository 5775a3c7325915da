//! Pagination helper for Rebrickable list endpoints
//!
//! Every list endpoint wraps its results in the same envelope and links the
//! following page through an opaque `next` cursor. The helper follows that
//! chain until the cursor is `null`, keeping records in page order.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use tracing::debug;

use super::error::{RebrickError, RebrickResult};
use super::mapper::RebrickableMapper;
use super::models::PageEnvelope;
use super::query::Cursor;

/// Maximum number of pages followed before giving up
pub const MAX_PAGES: usize = 10_000;

/// Pagination helper for list endpoints
pub struct Paginator;

impl Paginator {
    /// Fetch every page of a resource and map the results
    ///
    /// `fetch` receives `None` for the first page and the server-provided
    /// cursor afterwards. An error on any page aborts the whole aggregation.
    ///
    /// # Errors
    /// Returns the first fetch or mapping error, or `InvalidCursor` when the
    /// cursor chain exceeds [`MAX_PAGES`].
    pub async fn collect_all<Raw, T, F, Fut, M>(
        resource: &str,
        mut fetch: F,
        map: M,
    ) -> RebrickResult<Vec<T>>
    where
        Raw: DeserializeOwned,
        F: FnMut(Option<Cursor>) -> Fut,
        Fut: Future<Output = RebrickResult<Value>>,
        M: Fn(Raw) -> T,
    {
        let mut items = Vec::new();
        let mut cursor: Option<Cursor> = None;
        let mut page_number = 0;

        loop {
            // Safety check: a server that never ends the chain
            if page_number >= MAX_PAGES {
                return Err(RebrickError::InvalidCursor(format!(
                    "pagination of {} exceeded {} pages",
                    resource, MAX_PAGES
                )));
            }
            page_number += 1;

            let data = fetch(cursor.take()).await?;
            let page: PageEnvelope<Raw> = RebrickableMapper::parse(data)?;

            debug!(
                resource,
                page = page_number,
                results = page.results.len(),
                "Fetched page"
            );

            items.extend(page.results.into_iter().map(&map));

            // Check next page
            match page.next {
                Some(next) => cursor = Some(Cursor::Url(next)),
                None => break,
            }
        }

        Ok(items)
    }
}
