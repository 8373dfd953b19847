//! netkeiba race-result scraping.
//!
//! One invocation is one plain GET with no retry and no caching: a
//! failed fetch is terminal for that call, and the caller decides
//! whether to try again another day.

pub mod payouts;

use std::fmt;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::models::{PayoutRecord, NO_RANKING};

pub use payouts::extract_payouts;

const RESULT_URL_BASE: &str = "https://race.netkeiba.com/race/result.html";

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("argument {field:?} must be {expected} characters, got {actual}")]
    InvalidArgument {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("result page returned status {0}")]
    UpstreamUnavailable(StatusCode),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected page structure: {0}")]
    MalformedDocument(String),
}

// ---------------------------------------------------------------------------
// RaceId
// ---------------------------------------------------------------------------

/// Fixed-width race key: year (4) + racetrack code (2) + meeting
/// number (2) + day of meeting (2) + race number (2), concatenated in
/// that order. Opaque to us — it goes into the result page URL as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceId(String);

impl RaceId {
    pub fn new(
        year: &str,
        racetrack_code: &str,
        times: &str,
        date: &str,
        race_number: &str,
    ) -> Result<Self, ScrapeError> {
        check_width("year", year, 4)?;
        check_width("racetrack_code", racetrack_code, 2)?;
        check_width("times", times, 2)?;
        check_width("date", date, 2)?;
        check_width("race_number", race_number, 2)?;
        Ok(Self(format!(
            "{year}{racetrack_code}{times}{date}{race_number}"
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn check_width(field: &'static str, value: &str, expected: usize) -> Result<(), ScrapeError> {
    let actual = value.chars().count();
    if actual != expected {
        return Err(ScrapeError::InvalidArgument {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// scrape
// ---------------------------------------------------------------------------

/// Fetch the result page for one race and extract its payout record.
///
/// The page answers 200 even for races that have not been run yet;
/// those come back as [`ScrapeError::MalformedDocument`] from the
/// extractor rather than as a fetch failure.
pub async fn scrape(
    http: &Client,
    year: &str,
    racetrack_code: &str,
    times: &str,
    date: &str,
    race_number: &str,
) -> Result<PayoutRecord, ScrapeError> {
    let race_id = RaceId::new(year, racetrack_code, times, date, race_number)?;
    let url = format!("{RESULT_URL_BASE}?race_id={race_id}");
    tracing::debug!(%race_id, url = %url, "fetching race result page");

    let resp = http.get(&url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ScrapeError::UpstreamUnavailable(status));
    }

    let header_charset = charset_from_content_type(resp.headers());
    let body = resp.bytes().await?;
    let html = decode_body(&body, header_charset.as_deref());

    let record = extract_payouts(&html)?;
    validate_record(&record)?;
    Ok(record)
}

/// Extraction already fails closed, so anything negative here means a
/// parse landed on text it should not have. Refuse the record.
fn validate_record(record: &PayoutRecord) -> Result<(), ScrapeError> {
    let payouts = [
        ("win", record.win),
        ("quinella", record.quinella),
        ("exacta", record.exacta),
        ("trio", record.trio),
        ("trifecta", record.trifecta),
    ];
    for (name, amount) in payouts {
        if amount < 0 {
            return Err(ScrapeError::MalformedDocument(format!(
                "{name} payout is negative: {amount}"
            )));
        }
    }

    let rankings = [
        ("ranking1", record.ranking1),
        ("ranking2", record.ranking2),
        ("ranking3", record.ranking3),
    ];
    for (name, rank) in rankings {
        // NO_RANKING is a valid value; anything below it is not.
        if rank < NO_RANKING {
            return Err(ScrapeError::MalformedDocument(format!(
                "{name} is out of range: {rank}"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Charset handling
// ---------------------------------------------------------------------------

/// The result page declares EUC-JP in a meta tag rather than in the
/// Content-Type header. Decoding it as UTF-8 would mangle the 円
/// marker before the extractor ever sees it, so we honor whatever the
/// server declares: header first, meta tag second, UTF-8 as the last
/// resort.
fn decode_body(body: &[u8], header_charset: Option<&str>) -> String {
    let label = header_charset
        .map(str::to_owned)
        .or_else(|| sniff_meta_charset(body));
    let encoding = label
        .and_then(|l| encoding_rs::Encoding::for_label(l.as_bytes()))
        .unwrap_or(encoding_rs::UTF_8);
    let (text, _, _) = encoding.decode(body);
    text.into_owned()
}

fn charset_from_content_type(headers: &reqwest::header::HeaderMap) -> Option<String> {
    let value = headers
        .get(reqwest::header::CONTENT_TYPE)?
        .to_str()
        .ok()?;
    value.split(';').map(str::trim).find_map(|part| {
        part.strip_prefix("charset=")
            .map(|c| c.trim_matches('"').to_string())
    })
}

/// Look for a `charset=` declaration in the first couple of KB. Enough
/// for this one page; not a general HTML prescan.
fn sniff_meta_charset(body: &[u8]) -> Option<String> {
    let head = String::from_utf8_lossy(&body[..body.len().min(2048)]).to_lowercase();
    let idx = head.find("charset=")?;
    let rest = &head[idx + "charset=".len()..];
    let label: String = rest
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect();
    (!label.is_empty()).then_some(label)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
