//! Cursor pagination over directory listings.
//!
//! Listings answer with a page of `data` and a `nextCursor`. [`paginate`]
//! turns a page-fetch function into a lazy stream of items that keeps
//! following cursors until the directory reports `null`.

use std::future::Future;

use futures::{stream, Stream, TryStreamExt};
use serde::Deserialize;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Cursor,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub next_page: Option<String>,
}

/// Query for a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub per_page: u32,
    pub cursor: Option<String>,
}

enum Position {
    First,
    After(String),
    Exhausted,
}

/// Lazily streams every item of a paginated listing.
///
/// Pages are requested one at a time and only when the consumer asks for
/// more items. The first failing page ends the stream with its error.
pub fn paginate<T, E, F, Fut>(fetch: F, per_page: u32) -> impl Stream<Item = Result<T, E>>
where
    F: Fn(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    stream::try_unfold(Position::First, move |position| {
        let request = match position {
            Position::First => Some(PageRequest {
                per_page,
                cursor: None,
            }),
            Position::After(cursor) => Some(PageRequest {
                per_page,
                cursor: Some(cursor),
            }),
            Position::Exhausted => None,
        };
        let page = request.map(&fetch);

        async move {
            let Some(page) = page else {
                return Ok(None);
            };
            let page = page.await?;
            let next = match page.pagination.next_cursor {
                Some(cursor) => Position::After(cursor),
                None => Position::Exhausted,
            };
            Ok(Some((page.data, next)))
        }
    })
    .map_ok(|items| stream::iter(items.into_iter().map(Ok)))
    .try_flatten()
}

/// Collects the complete listing.
pub async fn drain<T, E, F, Fut>(fetch: F, per_page: u32) -> Result<Vec<T>, E>
where
    F: Fn(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    paginate(fetch, per_page).try_collect().await
}
