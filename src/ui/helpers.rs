//! Shared rendering utilities and text formatting.
//!
//! Output helpers write ANSI sequences to stdout. The formatting helpers are
//! pure and used while computing view models.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::ui::theme::Theme;

/// Shown for absent fields.
pub const MISSING: &str = "-";

const ADDRESS_HEAD: usize = 8;
const ADDRESS_TAIL: usize = 6;

/// Positions the cursor at a specific row and column (1-indexed).
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Renders text with highlighted character ranges for search matches.
///
/// Ranges use character indices, not byte indices. When `is_selected` is
/// set, highlighting is skipped so the selection colors stay intact.
pub fn render_highlighted_text(
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    is_selected: bool,
) {
    if ranges.is_empty() || is_selected {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }
        if start > current_pos {
            let normal_section: String = chars[current_pos..start].iter().collect();
            print!("{normal_section}");
        }

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted_section: String = chars[start..end].iter().collect();
        print!("{highlighted_section}");
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(&theme.colors.text_normal));

        current_pos = end;
    }

    if current_pos < chars.len() {
        let remaining: String = chars[current_pos..].iter().collect();
        print!("{remaining}");
    }
}

/// Shortens a wallet address or hash to `first8...last6`.
///
/// Values too short to benefit are returned unchanged.
#[must_use]
pub fn shorten_address(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= ADDRESS_HEAD + ADDRESS_TAIL + 3 {
        return value.to_string();
    }
    let head: String = chars[..ADDRESS_HEAD].iter().collect();
    let tail: String = chars[chars.len() - ADDRESS_TAIL..].iter().collect();
    format!("{head}...{tail}")
}

/// Truncates to `width` characters, marking the cut with `...`.
#[must_use]
pub fn truncate(value: &str, width: usize) -> String {
    let count = value.chars().count();
    if count <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }
    let kept: String = value.chars().take(width - 3).collect();
    format!("{kept}...")
}

/// Pads or truncates to exactly `width` characters.
#[must_use]
pub fn fit(value: &str, width: usize) -> String {
    let cut = truncate(value, width);
    let pad = width.saturating_sub(cut.chars().count());
    format!("{cut}{}", " ".repeat(pad))
}

/// Formats an API timestamp as `YYYY-MM-DD HH:MM` (UTC).
///
/// Accepts RFC 3339, naive ISO date-times, dates, and Unix epochs in seconds
/// or milliseconds. Anything else is returned as-is.
#[must_use]
pub fn format_timestamp(raw: &str) -> String {
    parse_instant(raw).map_or_else(
        || {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_or_else(|_| raw.to_string(), |d| d.format("%Y-%m-%d").to_string())
        },
        |dt| dt.format("%Y-%m-%d %H:%M").to_string(),
    )
}

/// Formats an API date (date of birth, record date) as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    parse_instant(trimmed).map_or_else(|| raw.to_string(), |dt| dt.format("%Y-%m-%d").to_string())
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    let epoch = raw.parse::<i64>().ok()?;
    // anything past year 5138 in seconds is taken as milliseconds
    if epoch.abs() >= 100_000_000_000 {
        DateTime::from_timestamp_millis(epoch)
    } else {
        DateTime::from_timestamp(epoch, 0)
    }
}

/// Trimmed field text, or [`MISSING`] when absent or blank.
#[must_use]
pub fn display_or_missing(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => MISSING.to_string(),
    }
}

/// Character ranges of `text` matched by `pattern`, coalesced into runs.
#[must_use]
pub fn highlight_ranges(matcher: &SkimMatcherV2, text: &str, pattern: &str) -> Vec<(usize, usize)> {
    if pattern.is_empty() {
        return Vec::new();
    }
    let Some((_score, indices)) = matcher.fuzzy_indices(text, pattern) else {
        return Vec::new();
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortens_long_addresses() {
        assert_eq!(
            shorten_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x123456...345678"
        );
        assert_eq!(shorten_address("0xabc"), "0xabc");
    }

    #[test]
    fn truncate_and_fit_count_characters() {
        assert_eq!(truncate("Zoë Ångström", 8), "Zoë Å...");
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 5).chars().count(), 5);
    }

    #[test]
    fn timestamps_in_several_shapes() {
        assert_eq!(format_timestamp("2024-03-05T14:07:00Z"), "2024-03-05 14:07");
        assert_eq!(format_timestamp("2024-03-05T14:07:00+02:00"), "2024-03-05 12:07");
        assert_eq!(format_timestamp("2024-03-05T14:07:00.123"), "2024-03-05 14:07");
        assert_eq!(format_timestamp("1709647620"), "2024-03-05 14:07");
        assert_eq!(format_timestamp("1709647620000"), "2024-03-05 14:07");
        assert_eq!(format_timestamp("2024-03-05"), "2024-03-05");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn dates_drop_time_component() {
        assert_eq!(format_date("1990-07-21"), "1990-07-21");
        assert_eq!(format_date("1990-07-21T00:00:00.000Z"), "1990-07-21");
        assert_eq!(format_date("n/a"), "n/a");
    }

    #[test]
    fn missing_values_render_as_dash() {
        assert_eq!(display_or_missing(None), "-");
        assert_eq!(display_or_missing(Some("  ")), "-");
        assert_eq!(display_or_missing(Some("x")), "x");
    }

    #[test]
    fn highlight_ranges_coalesce_runs() {
        let matcher = SkimMatcherV2::default();
        assert_eq!(highlight_ranges(&matcher, "john smith", "john"), vec![(0, 4)]);
        assert!(highlight_ranges(&matcher, "john", "").is_empty());
        assert!(highlight_ranges(&matcher, "ann", "xyz").is_empty());
    }
}
