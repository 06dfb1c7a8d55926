// src/api/pagination.rs
//! Cursor-driven page walking with a caller item limit.
//!
//! The Graph API paginates with an opaque `after` cursor inside a `paging`
//! object; a `paging.next` URL signals that more results exist. The walker
//! never constructs cursors itself — it only replays what upstream handed
//! back, and treats a claimed continuation without a cursor as a contract
//! violation.

use crate::constants::GRAPH_API_PAGE_SIZE;
use crate::error::AppError;
use serde::Deserialize;

/// Cursor pair embedded in a page's `paging` object.
#[derive(Debug, Clone, Deserialize)]
pub struct Cursors {
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
}

/// Pagination block of a Graph response.
#[derive(Debug, Clone, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub cursors: Option<Cursors>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

/// One page of a paginated Graph response.
#[derive(Debug, Clone, Deserialize)]
pub struct PageResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

impl<T> PageResponse<T> {
    /// Whether upstream claims further results exist.
    pub fn has_more(&self) -> bool {
        self.paging
            .as_ref()
            .map(|p| p.next.is_some())
            .unwrap_or(false)
    }

    /// The continuation cursor, if the page claims more results.
    ///
    /// `Ok(None)` means the sequence is complete. A page that claims more
    /// results but omits the `after` cursor is a `Pagination` error — the
    /// alternative would be silent truncation.
    pub fn continuation_cursor(&self) -> Result<Option<String>, AppError> {
        if !self.has_more() {
            return Ok(None);
        }
        let after = self
            .paging
            .as_ref()
            .and_then(|p| p.cursors.as_ref())
            .and_then(|c| c.after.clone());
        match after {
            Some(cursor) => Ok(Some(cursor)),
            None => Err(AppError::Pagination(
                "page claims further results but carries no continuation cursor".to_string(),
            )),
        }
    }
}

/// Accumulated result of walking a paginated edge.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: u32,
}

/// Walks successive pages until upstream signals completion or the item
/// limit is reached, whichever comes first.
///
/// `fetch_fn` receives the page size to request and the continuation
/// cursor (None for the first page). Items are returned in upstream order;
/// a limit landing mid-page truncates that page and suppresses the next
/// fetch. The sequence is not restartable — replaying requires a fresh call.
pub async fn fetch_limited<T, F, Fut>(
    mut fetch_fn: F,
    limit: Option<usize>,
) -> Result<PaginationResult<T>, AppError>
where
    T: Send + 'static,
    F: FnMut(usize, Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PageResponse<T>, AppError>>,
{
    let mut items: Vec<T> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages_fetched = 0u32;

    loop {
        let remaining = match limit {
            Some(l) if items.len() >= l => break,
            Some(l) => Some(l - items.len()),
            None => None,
        };
        let page_size = remaining
            .map(|r| r.min(GRAPH_API_PAGE_SIZE))
            .unwrap_or(GRAPH_API_PAGE_SIZE);

        let page = fetch_fn(page_size, cursor.take()).await?;
        pages_fetched += 1;

        // Validate the pagination contract before consuming the page.
        let next_cursor = page.continuation_cursor()?;

        let mut data = page.data;
        if let Some(r) = remaining {
            if data.len() > r {
                data.truncate(r);
                items.extend(data);
                log::debug!("Item limit reached mid-page; truncating");
                break;
            }
        }
        items.extend(data);

        match next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    log::debug!(
        "Fetched {} items across {} page(s)",
        items.len(),
        pages_fetched
    );
    Ok(PaginationResult {
        items,
        pages_fetched,
    })
}
