//! Text canonicalisation and the 0–100 similarity score.

use std::collections::HashSet;

use crate::thresholds::ADDRESS_ECHOES_NAME;

/// Street-suffix abbreviations expanded to full words. Targets are never
/// themselves keys, which keeps [`normalize`] idempotent.
const STREET_ABBREVIATIONS: &[(&str, &str)] = &[
    ("st", "street"),
    ("ave", "avenue"),
    ("av", "avenue"),
    ("rd", "road"),
    ("blvd", "boulevard"),
    ("dr", "drive"),
    ("ln", "lane"),
    ("ct", "court"),
    ("pl", "place"),
    ("hwy", "highway"),
    ("pkwy", "parkway"),
    ("sq", "square"),
    ("ter", "terrace"),
    ("cir", "circle"),
    ("trl", "trail"),
    ("ste", "suite"),
];

/// Canonicalise free text for comparison.
///
/// Lower-cases, drops apostrophes (so possessives collapse: `joe's` →
/// `joes`), turns `&` into `and`, replaces every other non-alphanumeric
/// character with a space, expands street-suffix abbreviations, and
/// collapses whitespace. Empty input yields an empty string.
#[must_use]
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut cleaned = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        match ch {
            '\'' | '\u{2019}' | '`' => {}
            '&' => cleaned.push_str(" and "),
            c if c.is_alphanumeric() => cleaned.push(c),
            _ => cleaned.push(' '),
        }
    }

    cleaned
        .split_whitespace()
        .map(expand_abbreviation)
        .collect::<Vec<_>>()
        .join(" ")
}

fn expand_abbreviation(token: &str) -> &str {
    STREET_ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == token)
        .map_or(token, |(_, full)| full)
}

/// Similarity of `b` to `a` on a 0–100 scale.
///
/// - identical after normalisation: 100
/// - one contains the other: 95
/// - otherwise the fraction `f` of `b`'s tokens found verbatim among `a`'s
///   tokens gives `min(95, 40 + 80f)` (rounded), or 0 when nothing matches
///
/// The token step looks only from `b` into `a`, so the score is not
/// symmetric. A blank string scores 0 against any non-blank one.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn similarity(a: &str, b: &str) -> u8 {
    let na = normalize(a);
    let nb = normalize(b);

    if na == nb {
        return 100;
    }
    if na.is_empty() || nb.is_empty() {
        return 0;
    }
    if na.contains(&nb) || nb.contains(&na) {
        return 95;
    }

    let a_tokens: HashSet<&str> = na.split(' ').collect();
    let b_tokens: Vec<&str> = nb.split(' ').collect();
    let matched = b_tokens.iter().filter(|t| a_tokens.contains(*t)).count();
    if matched == 0 {
        return 0;
    }

    let fraction = matched as f64 / b_tokens.len() as f64;
    // Bounded to [40, 95].
    (40.0 + fraction * 80.0).min(95.0).round() as u8
}

/// Remove a leading repeat of `name` from a provider's formatted address.
///
/// Providers often format a venue as `"Joe's Pizza, 123 Main St, ..."`.
/// The first comma-separated segment is dropped when it echoes the name;
/// otherwise a literal case-insensitive prefix is stripped.
#[must_use]
pub fn strip_leading_name(name: &str, text: &str) -> String {
    let trimmed = text.trim();
    if name.trim().is_empty() {
        return trimmed.to_string();
    }

    if let Some((first, rest)) = trimmed.split_once(',') {
        if similarity(name, first) > ADDRESS_ECHOES_NAME {
            return rest.trim().to_string();
        }
    }

    let name_lower = name.trim().to_lowercase();
    let text_lower = trimmed.to_lowercase();
    // Byte offsets only line up when lower-casing kept the length.
    if text_lower.len() == trimmed.len() && text_lower.starts_with(&name_lower) {
        if let Some(rest) = trimmed.get(name_lower.len()..) {
            return rest
                .trim_start_matches(|c: char| c == ',' || c == '-' || c.is_whitespace())
                .to_string();
        }
    }

    trimmed.to_string()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
