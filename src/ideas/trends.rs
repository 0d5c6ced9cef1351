//! Market signal fetching from the story-search index.
//!
//! Trend data is enrichment, not the deliverable: every failure in this
//! module degrades to an empty list and is reported only through logs.

use crate::ideas::coerce::{lenient_points, sanitize_string};
use crate::models::TrendItem;
use futures_util::future::join_all;
use serde_json::Value;
use std::time::Duration;

/// Per-industry fetch budget; the request is cancelled when it elapses.
const TREND_FETCH_TIMEOUT: Duration = Duration::from_secs(8);

/// Stories requested per industry.
const HITS_PER_INDUSTRY: &str = "5";

/// Cap on the combined trend list returned to the synthesizer.
pub const MAX_TRENDS: usize = 15;

/// Canonical item page used when a hit has an id but no URL.
const STORY_ITEM_URL: &str = "https://news.ycombinator.com/item?id=";

/// Fetch story hits for one industry and map them into trend records.
///
/// Any transport error, timeout, non-2xx status, or malformed body resolves
/// to an empty list rather than an error.
pub async fn fetch_trends_for_industry(
    client: &reqwest::Client,
    search_url: &str,
    industry: &str,
) -> Vec<TrendItem> {
    let response = match client
        .get(search_url)
        .query(&[
            ("query", industry),
            ("tags", "story"),
            ("hitsPerPage", HITS_PER_INDUSTRY),
        ])
        .timeout(TREND_FETCH_TIMEOUT)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            log::warn!("Trend fetch for '{}' failed: {}", industry, e);
            return Vec::new();
        }
    };

    if !response.status().is_success() {
        log::warn!(
            "Trend fetch for '{}' returned status {}",
            industry,
            response.status()
        );
        return Vec::new();
    }

    let data: Value = match response.json().await {
        Ok(data) => data,
        Err(e) => {
            log::warn!("Trend fetch for '{}' returned invalid JSON: {}", industry, e);
            return Vec::new();
        }
    };

    let hits = match data["hits"].as_array() {
        Some(hits) => hits,
        None => return Vec::new(),
    };

    hits.iter()
        .filter_map(|hit| map_story_hit(industry, hit))
        .collect()
}

/// Map one raw search hit into a `TrendItem`.
///
/// Title falls back from `title` to `story_title`; URL falls back from `url`
/// to `story_url`, then to a synthesized item-page link when only an
/// `objectID` is present. Hits with no usable title are dropped.
fn map_story_hit(industry: &str, hit: &Value) -> Option<TrendItem> {
    let mut title = sanitize_string(&hit["title"]);
    if title.is_empty() {
        title = sanitize_string(&hit["story_title"]);
    }
    if title.is_empty() {
        log::debug!("Dropping '{}' hit without a title", industry);
        return None;
    }

    let mut url = sanitize_string(&hit["url"]);
    if url.is_empty() {
        url = sanitize_string(&hit["story_url"]);
    }
    if url.is_empty() {
        let id = sanitize_string(&hit["objectID"]);
        if !id.is_empty() {
            url = format!("{}{}", STORY_ITEM_URL, id);
        }
    }

    Some(TrendItem {
        industry: industry.to_string(),
        title,
        url,
        points: lenient_points(&hit["points"]),
        created_at: sanitize_string(&hit["created_at"]),
    })
}

/// Fetch trends for every industry concurrently and aggregate the results.
///
/// The fetches run as independent tasks; a slow or failing industry never
/// blocks or aborts its siblings. Results keep the industry input order.
pub async fn gather_trends(
    client: &reqwest::Client,
    search_url: &str,
    industries: &[String],
) -> Vec<TrendItem> {
    let mut handles = Vec::with_capacity(industries.len());
    for industry in industries {
        let client = client.clone();
        let search_url = search_url.to_string();
        let industry = industry.clone();
        handles.push(tokio::spawn(async move {
            fetch_trends_for_industry(&client, &search_url, &industry).await
        }));
    }

    let results = join_all(handles).await;

    let mut per_industry = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(items) => per_industry.push(items),
            Err(e) => {
                log::warn!("Trend fetch task panicked: {}", e);
                per_industry.push(Vec::new());
            }
        }
    }

    aggregate_trends(per_industry)
}

/// Concatenate per-industry results in input order and cap the total.
pub fn aggregate_trends(per_industry: Vec<Vec<TrendItem>>) -> Vec<TrendItem> {
    let mut trends: Vec<TrendItem> = per_industry.into_iter().flatten().collect();
    trends.truncate(MAX_TRENDS);
    trends
}
