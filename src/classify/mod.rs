//! Prediction-token recognition.
//!
//! A prediction is five dot-separated numbers ("2021.09.02.06.21"),
//! usually typed from a phone in full-width characters and often with
//! stray spaces. Normalization folds those away before the shape check
//! so the group can keep typing however they like.

/// Segments in a prediction token: year, racetrack, meeting, day, race.
const SEGMENT_COUNT: usize = 5;

/// Map full-width ASCII variants (U+FF01..=U+FF5E) to their half-width
/// equivalents, then drop every whitespace character anywhere in the
/// string (U+3000 included).
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            _ => c,
        })
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// True when `normalized` has exactly five dot-separated segments,
/// each one a non-negative whole number.
///
/// Segments are float-parsed and then checked for integrality, so "3"
/// and "3.0" both pass the per-segment test while "3.5" does not.
/// Stray decimal points from flick input are common enough that the
/// leniency stays.
pub fn is_prediction(normalized: &str) -> bool {
    let segments: Vec<&str> = normalized.split('.').collect();
    if segments.len() != SEGMENT_COUNT {
        return false;
    }
    segments.into_iter().all(is_whole_number)
}

/// Normalize then shape-check in one call. Pure function of its input.
pub fn classify(raw: &str) -> bool {
    is_prediction(&normalize(raw))
}

fn is_whole_number(segment: &str) -> bool {
    match segment.parse::<f64>() {
        // fract() of an infinity is NaN, so "inf" fails here too.
        Ok(n) => n >= 0.0 && n.fract() == 0.0,
        Err(_) => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_token() {
        assert!(classify("2021.09.02.06.21"));
        assert!(classify("0.0.0.0.0"));
    }

    #[test]
    fn test_accepts_full_width_token() {
        assert!(classify("２０２１．０９．０２．０６．２１"));
        assert_eq!(normalize("２０２１．０９．０２．０６．２１"), "2021.09.02.06.21");
    }

    #[test]
    fn test_full_width_is_equivalent_to_half_width() {
        let pairs = [
            ("２０２１．０９．０２．０６．２１", "2021.09.02.06.21"),
            ("１．２．３．４", "1.2.3.4"),
            ("ａｂｃ", "abc"),
        ];
        for (full, half) in pairs {
            assert_eq!(classify(full), classify(half), "mismatch for {half:?}");
        }
    }

    #[test]
    fn test_embedded_whitespace_is_ignored() {
        assert!(classify(" 2021.09.02.06.21 "));
        assert!(classify("2021 . 09 . 02 . 06 . 21"));
        assert!(classify("2021.09.02.06.21\n"));
        // U+3000 ideographic space
        assert!(classify("2021　.　09.02.06.21"));
    }

    #[test]
    fn test_rejects_wrong_segment_count() {
        assert!(!classify("2021.09.02.06"));
        assert!(!classify("2021.09.02.06.21.01"));
        assert!(!classify("2021"));
    }

    #[test]
    fn test_rejects_empty_and_blank() {
        assert!(!classify(""));
        assert!(!classify("   "));
        // five dots, six empty segments
        assert!(!classify("....."));
        // correct count but one empty segment
        assert!(!classify("2021..02.06.21"));
    }

    #[test]
    fn test_rejects_non_numeric_segments() {
        assert!(!classify("2021.09.02.06.x"));
        assert!(!classify("来週.09.02.06.21"));
        assert!(!classify("本日は晴天なり"));
    }

    #[test]
    fn test_rejects_negative_segments() {
        assert!(!classify("2021.09.02.06.-21"));
    }

    #[test]
    fn test_whole_number_leniency() {
        assert!(is_whole_number("3"));
        assert!(is_whole_number("3.0"));
        assert!(is_whole_number("03"));
        assert!(!is_whole_number("3.5"));
        assert!(!is_whole_number(""));
        assert!(!is_whole_number("inf"));
        assert!(!is_whole_number("NaN"));
    }

    #[test]
    fn test_classify_is_idempotent() {
        for input in ["2021.09.02.06.21", "junk", ""] {
            assert_eq!(classify(input), classify(input));
        }
    }
}
