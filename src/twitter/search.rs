//! Pagination loops that accumulate search results into a [`TweetTable`].
//!
//! The recent search returns bodies and a cursor on every call. The premium
//! searches are used for identifiers only; their bodies are then re-fetched in
//! batches through the v2 lookup so every mode yields the same columns.

use log::{debug, info, warn};
use std::collections::HashSet;

use crate::error::Result;
use crate::extract::extract_page;
use crate::table::TweetTable;
use crate::window::SearchWindow;

use super::client::{Archive, ArchiveRequest, RecentRequest, SearchClient};

/// Smallest `max_results` the search endpoints accept.
pub const MIN_PAGE_SIZE: usize = 10;

/// Largest `max_results` the search endpoints accept, and the lookup batch size.
pub const MAX_PAGE_SIZE: usize = 100;

/// Number of items to request when `accumulated` of `target` are already held.
///
/// Always within `MIN_PAGE_SIZE..=MAX_PAGE_SIZE`.
pub fn page_size(target: usize, accumulated: usize) -> usize {
    target
        .saturating_sub(accumulated)
        .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

/// Runs the recent search until `target` tweets have been received or the
/// cursor runs out.
///
/// The count that ends the loop is the number of tweets the pages returned,
/// not the number of distinct rows, so pages repeating already-seen ids still
/// move the search forward. Each page is flattened with `tweet_fields` and
/// merged into the table. A page with no tweets ends the search. The returned
/// table is normalized. Running out of pages early is not an error; the table
/// simply holds fewer than `target` rows.
///
/// # Errors
///
/// Propagates client failures and [`crate::Error::MissingAuthor`] from extraction.
pub async fn paginate_recent<C: SearchClient + ?Sized>(
    client: &C,
    query: &str,
    window: SearchWindow,
    target: usize,
    tweet_fields: &[String],
) -> Result<TweetTable> {
    let mut table = TweetTable::new(tweet_fields);
    let mut next_token: Option<String> = None;
    let mut received = 0;
    let mut page_count = 0;

    while received < target {
        page_count += 1;
        let request = RecentRequest {
            query: query.to_string(),
            window,
            max_results: page_size(target, received),
            next_token: next_token.take(),
            tweet_fields: tweet_fields.to_vec(),
        };

        info!(
            "Fetching page {} of recent search results ({} requested, {}/{} received)",
            page_count, request.max_results, received, target
        );

        let page = client.fetch_recent(&request).await?;
        let records = extract_page(&page, tweet_fields)?;
        let count = records.len();
        received += count;
        let added = table.extend(records);
        debug!(
            "Page {}: {} tweets received, {} new",
            page_count, count, added
        );

        if count == 0 {
            warn!("Page {} returned no tweets, stopping", page_count);
            break;
        }
        if added == 0 {
            warn!("Page {} only repeated tweets already held", page_count);
        }

        match page.next_token {
            Some(token) => next_token = Some(token),
            None => {
                info!("No more pages to fetch");
                break;
            }
        }
    }

    info!(
        "Completed recent search for '{}' - {} tweets over {} pages",
        query,
        table.len(),
        page_count
    );

    table.normalize();
    Ok(table)
}

/// Phase one of a long-window search: collects up to `target` tweet ids.
///
/// Reads at most `ceil(target / 100)` pages and stops early once `target`
/// ids are held or the cursor runs out. Ids are kept in first-seen order
/// without duplicates.
pub async fn collect_archive_ids<C: SearchClient + ?Sized>(
    client: &C,
    archive: Archive,
    query: &str,
    window: SearchWindow,
    target: usize,
) -> Result<Vec<String>> {
    let max_pages = target.div_ceil(MAX_PAGE_SIZE);
    let mut ids = Vec::new();
    let mut seen = HashSet::new();
    let mut next: Option<String> = None;
    let mut page_count = 0;

    while page_count < max_pages && ids.len() < target {
        page_count += 1;
        let request = ArchiveRequest {
            archive,
            query: query.to_string(),
            window,
            max_results: page_size(target, ids.len()),
            next: next.take(),
        };

        info!(
            "Fetching page {}/{} of {} ids ({} requested)",
            page_count,
            max_pages,
            archive.name(),
            request.max_results
        );

        let page = client.fetch_ids_by_window(&request).await?;
        for id in page.ids {
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }

        match page.next {
            Some(cursor) => next = Some(cursor),
            None => {
                info!("No more {} pages to fetch", archive.name());
                break;
            }
        }
    }

    info!(
        "Collected {} tweet ids from {} search",
        ids.len(),
        archive.name()
    );
    Ok(ids)
}

/// Runs a long-window search: ids from the premium search, then bodies from
/// the v2 lookup in batches of up to 100.
///
/// Stops once every collected id has been looked up or `target` rows are held.
/// Ids the lookup does not return (deleted or protected tweets) are skipped.
/// The returned table is normalized.
pub async fn paginate_archive<C: SearchClient + ?Sized>(
    client: &C,
    archive: Archive,
    query: &str,
    window: SearchWindow,
    target: usize,
    tweet_fields: &[String],
) -> Result<TweetTable> {
    let ids = collect_archive_ids(client, archive, query, window, target).await?;

    let mut table = TweetTable::new(tweet_fields);
    let mut offset = 0;
    let mut batch_count = 0;

    while table.len() < target && offset < ids.len() {
        let end = (offset + MAX_PAGE_SIZE).min(ids.len());
        let batch = &ids[offset..end];
        offset = end;
        batch_count += 1;

        info!(
            "Looking up batch {} of {} tweet ids ({}/{} held)",
            batch_count,
            batch.len(),
            table.len(),
            target
        );

        let page = client.fetch_by_ids(batch, tweet_fields).await?;
        let records = extract_page(&page, tweet_fields)?;
        if records.len() < batch.len() {
            debug!(
                "Lookup returned {} of {} requested tweets",
                records.len(),
                batch.len()
            );
        }
        table.extend(records);
    }

    info!(
        "Completed {} search for '{}' - {} tweets over {} lookups",
        archive.name(),
        query,
        table.len(),
        batch_count
    );

    table.normalize();
    Ok(table)
}
