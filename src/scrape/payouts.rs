//! Payout extraction from the result page DOM.
//!
//! The selectors mirror netkeiba's presentation-layer class names, so
//! this module fails closed: if the win row is missing, either the
//! page changed shape or the race has no results yet, and guessing
//! monetary values is worse than refusing.

use scraper::{ElementRef, Html, Selector};

use super::ScrapeError;
use crate::models::{PayoutRecord, NO_RANKING};

const WIN_PAYOUT: &str = "tr.Tansho > td.Payout > span";
const QUINELLA_PAYOUT: &str = "tr.Umaren > td.Payout > span";
const EXACTA_PAYOUT: &str = "tr.Umatan > td.Payout > span";
const TRIO_PAYOUT: &str = "tr.Fuku3 > td.Payout > span";
const TRIFECTA_PAYOUT: &str = "tr.Tan3 > td.Payout > span";

/// Finishers live in the place row, one div per horse.
const PLACE_RESULT: &str = "tr.Fukusho > td.Result > div";

/// Extract the five payout amounts and up to three finishers.
///
/// Fails with [`ScrapeError::MalformedDocument`] when the expected
/// structure is absent or a payout cell does not parse as an amount.
pub fn extract_payouts(html: &str) -> Result<PayoutRecord, ScrapeError> {
    let doc = Html::parse_document(html);

    // The win row doubles as the liveness probe for the whole table.
    if doc.select(&sel(WIN_PAYOUT)).next().is_none() {
        return Err(ScrapeError::MalformedDocument(
            "no win payout row; the page layout changed or the race has no results yet".into(),
        ));
    }

    let [ranking1, ranking2, ranking3] = rankings(&doc)?;

    Ok(PayoutRecord {
        win: payout_amount(&doc, WIN_PAYOUT)?,
        quinella: payout_amount(&doc, QUINELLA_PAYOUT)?,
        exacta: payout_amount(&doc, EXACTA_PAYOUT)?,
        trio: payout_amount(&doc, TRIO_PAYOUT)?,
        trifecta: payout_amount(&doc, TRIFECTA_PAYOUT)?,
        ranking1,
        ranking2,
        ranking3,
    })
}

fn payout_amount(doc: &Html, selector: &'static str) -> Result<i64, ScrapeError> {
    let span = doc.select(&sel(selector)).next().ok_or_else(|| {
        ScrapeError::MalformedDocument(format!("missing payout cell: {selector}"))
    })?;
    let text = element_text(span);
    parse_amount(&text).ok_or_else(|| {
        ScrapeError::MalformedDocument(format!(
            "unparseable payout {text:?} at {selector}"
        ))
    })
}

/// "163,770円" -> 163770
fn parse_amount(text: &str) -> Option<i64> {
    text.trim()
        .trim_end_matches('円')
        .replace(',', "")
        .parse()
        .ok()
}

/// Collect the finishers from the place row in document order. The
/// row holds a variable number of divs; empty spans are skipped, and
/// missing positions come back as [`NO_RANKING`].
fn rankings(doc: &Html) -> Result<[i32; 3], ScrapeError> {
    let span_sel = sel("span");
    let mut finishers = Vec::new();

    for div in doc.select(&sel(PLACE_RESULT)) {
        let Some(span) = div.select(&span_sel).next() else {
            continue;
        };
        let text = element_text(span);
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        let horse_number: i32 = text.parse().map_err(|_| {
            ScrapeError::MalformedDocument(format!(
                "unparseable horse number {text:?} in place row"
            ))
        })?;
        finishers.push(horse_number);
    }

    Ok([
        finishers.first().copied().unwrap_or(NO_RANKING),
        finishers.get(1).copied().unwrap_or(NO_RANKING),
        finishers.get(2).copied().unwrap_or(NO_RANKING),
    ])
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

// Selectors here are compile-time constants; a parse failure is a
// programmer error, not an input condition.
fn sel(selector: &'static str) -> Selector {
    Selector::parse(selector).expect("static selector")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn result_page(place_divs: &str) -> String {
        format!(
            r#"<html><body><table>
            <tr class="Tansho"><td class="Result"><span>7</span></td><td class="Payout"><span>320円</span></td></tr>
            <tr class="Fukusho"><td class="Result">{place_divs}</td><td class="Payout"><span>110円</span></td></tr>
            <tr class="Umaren"><td class="Result"></td><td class="Payout"><span>1,240円</span></td></tr>
            <tr class="Umatan"><td class="Result"></td><td class="Payout"><span>2,530円</span></td></tr>
            <tr class="Fuku3"><td class="Result"></td><td class="Payout"><span>4,080円</span></td></tr>
            <tr class="Tan3"><td class="Result"></td><td class="Payout"><span>163,770円</span></td></tr>
            </table></body></html>"#
        )
    }

    const THREE_FINISHERS: &str = concat!(
        r#"<div><span>7</span></div>"#,
        r#"<div><span>12</span></div>"#,
        r#"<div><span>3</span></div>"#,
    );

    #[test]
    fn test_extracts_all_payouts_and_rankings() {
        let record = extract_payouts(&result_page(THREE_FINISHERS)).unwrap();
        assert_eq!(
            record,
            PayoutRecord {
                win: 320,
                quinella: 1240,
                exacta: 2530,
                trio: 4080,
                trifecta: 163_770,
                ranking1: 7,
                ranking2: 12,
                ranking3: 3,
            }
        );
    }

    #[test]
    fn test_single_finisher_gets_sentinels() {
        let record =
            extract_payouts(&result_page(r#"<div><span>5</span></div>"#)).unwrap();
        assert_eq!(record.ranking1, 5);
        assert_eq!(record.ranking2, NO_RANKING);
        assert_eq!(record.ranking3, NO_RANKING);
    }

    #[test]
    fn test_empty_place_spans_are_skipped() {
        let divs = r#"<div><span></span></div><div><span>9</span></div><div><span> </span></div>"#;
        let record = extract_payouts(&result_page(divs)).unwrap();
        assert_eq!(record.ranking1, 9);
        assert_eq!(record.ranking2, NO_RANKING);
    }

    #[test]
    fn test_no_place_row_yields_all_sentinels() {
        let record = extract_payouts(&result_page("")).unwrap();
        assert_eq!(
            (record.ranking1, record.ranking2, record.ranking3),
            (NO_RANKING, NO_RANKING, NO_RANKING)
        );
    }

    #[test]
    fn test_missing_win_row_is_malformed() {
        let html = r#"<html><body><table>
            <tr class="Umaren"><td class="Payout"><span>1,240円</span></td></tr>
            </table></body></html>"#;
        assert!(matches!(
            extract_payouts(html),
            Err(ScrapeError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_empty_document_is_malformed() {
        assert!(matches!(
            extract_payouts(""),
            Err(ScrapeError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_missing_secondary_payout_row_is_malformed() {
        // win row present but the trifecta row is gone
        let html = r#"<html><body><table>
            <tr class="Tansho"><td class="Payout"><span>320円</span></td></tr>
            <tr class="Umaren"><td class="Payout"><span>1,240円</span></td></tr>
            <tr class="Umatan"><td class="Payout"><span>2,530円</span></td></tr>
            <tr class="Fuku3"><td class="Payout"><span>4,080円</span></td></tr>
            </table></body></html>"#;
        assert!(matches!(
            extract_payouts(html),
            Err(ScrapeError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_parse_amount_cleaning() {
        assert_eq!(parse_amount("163,770円"), Some(163_770));
        assert_eq!(parse_amount("320円"), Some(320));
        assert_eq!(parse_amount(" 320円 "), Some(320));
        assert_eq!(parse_amount("320"), Some(320));
        assert_eq!(parse_amount("---"), None);
        assert_eq!(parse_amount(""), None);
    }
}
