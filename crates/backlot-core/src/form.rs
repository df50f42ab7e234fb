//! Form field parsing helpers
//!
//! Parsing and formatting for the human-entered fields on the media edit
//! form: colon-delimited durations, URL slugs, and comma-separated tag
//! lists.

use crate::error::AppError;

/// Maximum length of a generated or submitted slug.
pub const SLUG_MAX_LEN: usize = 50;

/// Parse a duration entered as "SS", "MM:SS", or "HH:MM:SS" into seconds.
///
/// The leading component is unbounded so "90:00" is ninety minutes; every
/// later component must stay below 60.
pub fn parse_duration(input: &str) -> Result<i32, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(
            "Duration must not be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() > 3 {
        return Err(AppError::InvalidInput(format!(
            "Invalid duration: {}",
            trimmed
        )));
    }

    let mut total: i64 = 0;
    for (i, part) in parts.iter().enumerate() {
        let value: i64 = part.trim().parse().map_err(|_| {
            AppError::InvalidInput(format!("Invalid duration: {}", trimmed))
        })?;
        if value < 0 || (i > 0 && value >= 60) {
            return Err(AppError::InvalidInput(format!(
                "Invalid duration: {}",
                trimmed
            )));
        }
        total = total
            .checked_mul(60)
            .and_then(|t| t.checked_add(value))
            .ok_or_else(|| {
                AppError::InvalidInput(format!("Duration is too long: {}", trimmed))
            })?;
    }

    i32::try_from(total)
        .map_err(|_| AppError::InvalidInput(format!("Duration is too long: {}", trimmed)))
}

/// Format a duration in seconds as "M:SS", or "H:MM:SS" from one hour up.
pub fn format_duration(seconds: i32) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Reduce arbitrary text to a URL slug: lowercase ASCII alphanumerics with
/// single hyphens between words, capped at [`SLUG_MAX_LEN`] characters.
///
/// Text with no sluggable characters falls back to the hex code points of
/// its leading characters, so distinct names keep distinct slugs; empty
/// input falls back to "media".
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len().min(SLUG_MAX_LEN));
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.truncate(SLUG_MAX_LEN);
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        return code_point_slug(text);
    }
    slug.to_string()
}

/// Slug built from raw code points, for names without a single ASCII
/// alphanumeric character.
fn code_point_slug(text: &str) -> String {
    let mut slug = String::new();
    for c in text.chars().filter(|c| !c.is_whitespace()).take(10) {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(&format!("u{:x}", c as u32));
    }
    if slug.is_empty() {
        return "media".to_string();
    }
    slug.truncate(SLUG_MAX_LEN);
    slug.trim_end_matches('-').to_string()
}

/// Collision candidate `n` for a taken slug: the base truncated so the
/// `-n` suffix still fits within [`SLUG_MAX_LEN`].
pub fn slug_candidate(base: &str, n: u32) -> String {
    let suffix = format!("-{}", n);
    let mut stem = base.to_string();
    stem.truncate(SLUG_MAX_LEN.saturating_sub(suffix.len()));
    format!("{}{}", stem.trim_end_matches('-'), suffix)
}

/// Split a comma-separated tag field into cleaned names.
///
/// Entries are trimmed, empty entries dropped, and duplicates removed
/// case-insensitively while keeping first-seen order.
pub fn parse_tag_list(input: &str) -> Vec<String> {
    let mut seen = Vec::new();
    let mut names = Vec::new();
    for raw in input.split(',') {
        let name: String = raw.trim().chars().take(SLUG_MAX_LEN).collect();
        if name.is_empty() {
            continue;
        }
        let key = name.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        names.push(name);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_plain_seconds() {
        assert_eq!(parse_duration("45").unwrap(), 45);
        assert_eq!(parse_duration("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_duration_minutes_and_seconds() {
        assert_eq!(parse_duration("5:07").unwrap(), 307);
        assert_eq!(parse_duration("90:00").unwrap(), 5400);
    }

    #[test]
    fn test_parse_duration_hours() {
        assert_eq!(parse_duration("1:02:03").unwrap(), 3723);
    }

    #[test]
    fn test_parse_duration_tolerates_whitespace() {
        assert_eq!(parse_duration(" 5:07 ").unwrap(), 307);
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("1:2:3:4").is_err());
        assert!(parse_duration("5:61").is_err());
        assert!(parse_duration("-5").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45), "0:45");
        assert_eq!(format_duration(307), "5:07");
        assert_eq!(format_duration(3723), "1:02:03");
        assert_eq!(format_duration(-10), "0:00");
    }

    #[test]
    fn test_duration_round_trip() {
        for seconds in [0, 59, 60, 307, 3600, 3723, 86399] {
            assert_eq!(parse_duration(&format_duration(seconds)).unwrap(), seconds);
        }
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("A New Hope"), "a-new-hope");
        assert_eq!(slugify("  Trim Me  "), "trim-me");
        assert_eq!(slugify("What's up?!"), "what-s-up");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("one -- two"), "one-two");
    }

    #[test]
    fn test_slugify_caps_length() {
        let long = "x".repeat(200);
        assert_eq!(slugify(&long).len(), SLUG_MAX_LEN);
    }

    #[test]
    fn test_slugify_falls_back_when_empty() {
        assert_eq!(slugify(""), "media");
        assert_eq!(slugify("   "), "media");
    }

    #[test]
    fn test_slugify_keeps_non_ascii_names_distinct() {
        let a = slugify("日本語");
        let b = slugify("Кино");
        assert_eq!(a, "u65e5-u672c-u8a9e");
        assert_ne!(a, b);
        assert_eq!(slugify("日本語"), a);
    }

    #[test]
    fn test_slug_candidate_appends_suffix() {
        assert_eq!(slug_candidate("winter-concert", 2), "winter-concert-2");
        assert_eq!(slug_candidate("winter-concert", 10), "winter-concert-10");
    }

    #[test]
    fn test_slug_candidate_truncates_full_length_base() {
        let base = "a".repeat(SLUG_MAX_LEN);
        assert_eq!(slug_candidate(&base, 2), format!("{}-2", "a".repeat(48)));
        assert_eq!(slug_candidate(&base, 99), format!("{}-99", "a".repeat(47)));
    }

    #[test]
    fn test_slug_candidate_trims_hyphen_left_by_the_cut() {
        let base = format!("{}-end", "b".repeat(47));
        let candidate = slug_candidate(&base, 2);
        assert_eq!(candidate, format!("{}-2", "b".repeat(47)));
        assert!(candidate.len() <= SLUG_MAX_LEN);
    }

    #[test]
    fn test_parse_tag_list_cleans_entries() {
        assert_eq!(
            parse_tag_list("sermon, music , , Easter"),
            vec!["sermon", "music", "Easter"]
        );
    }

    #[test]
    fn test_parse_tag_list_dedupes_case_insensitively() {
        assert_eq!(parse_tag_list("Music, music, MUSIC"), vec!["Music"]);
    }

    #[test]
    fn test_parse_tag_list_empty_input() {
        assert!(parse_tag_list("").is_empty());
        assert!(parse_tag_list(" , ,, ").is_empty());
    }
}
