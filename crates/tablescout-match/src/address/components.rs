//! Component extraction: street number/prefix/name/type/suffix, city,
//! state/region and postal code from a single-line address.

use std::sync::LazyLock;

use regex::Regex;

use super::country::Country;

const STREET_TYPES: &str = "street|st|avenue|ave|av|road|rd|boulevard|blvd|drive|dr|lane|ln|court|ct|place|pl|highway|hwy|parkway|pkwy|square|sq|terrace|ter|circle|cir|trail|trl|way|plaza|alley|row|crescent|close";
const DIRECTIONS: &str = "north|south|east|west|ne|nw|se|sw|n|s|e|w";

static NUMBER_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?P<number>\d+[a-z]?(?:-\d+[a-z]?)?)\s+(?:(?P<prefix>{DIRECTIONS})\.?\s+)?(?P<name>.+?)(?:\s+(?P<type>{STREET_TYPES})\.?)?(?:\s+(?P<suffix>{DIRECTIONS})\.?)?$"
    ))
    .expect("valid regex")
});
static NAME_THEN_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<name>\D+?)\s+(?P<number>\d+[a-z]?)$").expect("valid regex")
});
static NAME_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?P<name>.+?)(?:\s+(?P<type>{STREET_TYPES})\.?)?(?:\s+(?P<suffix>{DIRECTIONS})\.?)?$"
    ))
    .expect("valid regex")
});
static STREET_SIGNAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\d|\b(?:{STREET_TYPES}|via|viale|rue|calle|avenida|piazza|platz)\b|stra(?:ß|ss)e\b"
    ))
    .expect("valid regex")
});
static SINGLE_LINE_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?P<street>\d+\s+.*?\b(?:{STREET_TYPES})\b\.?(?:\s+(?:{DIRECTIONS})\b\.?)?)\s+(?P<rest>\S.*)$"
    ))
    .expect("valid regex")
});
static STATE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2,3}$").expect("valid regex"));
static TRAILING_STATE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<head>.+?)\s+(?P<code>[A-Z]{2,3})$").expect("valid regex"));

#[derive(Debug, thiserror::Error)]
pub(crate) enum AddressError {
    #[error("address has no recognisable content")]
    Unrecognisable,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct AddressComponents {
    pub number: Option<String>,
    pub prefix: Option<String>,
    pub street_name: Option<String>,
    pub street_type: Option<String>,
    pub suffix: Option<String>,
    /// House number written after the street name (`Via Roma 12`).
    pub number_trails: bool,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    /// Country named explicitly in the text.
    pub country: Option<Country>,
}

impl AddressComponents {
    /// Reassemble the street line, skipping empty components.
    pub fn street_line(&self) -> String {
        let ordered: [&Option<String>; 5] = if self.number_trails {
            [
                &self.prefix,
                &self.street_name,
                &self.street_type,
                &self.suffix,
                &self.number,
            ]
        } else {
            [
                &self.number,
                &self.prefix,
                &self.street_name,
                &self.street_type,
                &self.suffix,
            ]
        };
        ordered
            .iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Split `text` into structured components.
///
/// `country` selects the postal-code shape; an explicit trailing country
/// name overrides it.
pub(crate) fn extract_components(
    text: &str,
    country: Country,
) -> Result<AddressComponents, AddressError> {
    if !text.chars().any(char::is_alphanumeric) {
        return Err(AddressError::Unrecognisable);
    }

    let mut parts: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    let mut components = AddressComponents::default();

    if parts.len() > 1 {
        if let Some(explicit) = parts.last().and_then(|p| Country::from_name(p)) {
            components.country = Some(explicit);
            parts.pop();
        }
    }
    let postal_regex = components.country.unwrap_or(country).postal_regex();

    let mut iter = parts.into_iter();
    let Some(mut first) = iter.next() else {
        return Err(AddressError::Unrecognisable);
    };
    let mut locality: Vec<String> = iter.collect();

    if locality.is_empty() {
        if let Some(caps) = SINGLE_LINE_SPLIT.captures(&first) {
            locality.push(caps["rest"].to_string());
            first = caps["street"].to_string();
        }
    }

    if locality.is_empty() {
        // Single segment: only a trailing code counts as postal.
        if let Some(m) = postal_regex.find_iter(&first).last() {
            if first[m.end()..].trim().is_empty() {
                components.postal_code = Some(m.as_str().to_uppercase());
                first = first[..m.start()].trim().to_string();
            }
        }
    } else {
        for part in locality.iter_mut().rev() {
            if let Some(m) = postal_regex.find_iter(part).last() {
                components.postal_code = Some(m.as_str().to_uppercase());
                *part = collapse(&format!("{} {}", &part[..m.start()], &part[m.end()..]));
                break;
            }
        }
    }

    if STREET_SIGNAL.is_match(&first) {
        apply_street(&mut components, &first);
    } else if !first.is_empty() {
        locality.insert(0, first);
    }

    locality.retain(|p| !p.is_empty());
    resolve_locality(&mut components, locality);

    Ok(components)
}

fn apply_street(components: &mut AddressComponents, street: &str) {
    let capture = |caps: &regex::Captures<'_>, name: &str| {
        caps.name(name)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    };

    if let Some(caps) = NUMBER_FIRST.captures(street) {
        components.number = capture(&caps, "number");
        components.prefix = capture(&caps, "prefix");
        components.street_name = capture(&caps, "name");
        components.street_type = capture(&caps, "type");
        components.suffix = capture(&caps, "suffix");
    } else if let Some(caps) = NAME_THEN_NUMBER.captures(street) {
        components.street_name = capture(&caps, "name");
        components.number = capture(&caps, "number");
        components.number_trails = true;
    } else if let Some(caps) = NAME_ONLY.captures(street) {
        components.street_name = capture(&caps, "name");
        components.street_type = capture(&caps, "type");
        components.suffix = capture(&caps, "suffix");
    }
}

/// Assign city and state from the non-street segments.
///
/// A trailing upper-case code (`NY`, `QLD`) is the state; otherwise, with
/// two or more segments, the last one is. The segment before it is the city.
fn resolve_locality(components: &mut AddressComponents, mut locality: Vec<String>) {
    if let Some(last) = locality.last_mut() {
        if STATE_CODE.is_match(last) {
            components.state = locality.pop();
        } else if let Some(caps) = TRAILING_STATE_CODE.captures(last) {
            components.state = Some(caps["code"].to_string());
            let head = caps["head"].trim().to_string();
            *last = head;
        }
    }

    if components.state.is_none() && locality.len() >= 2 {
        components.state = locality.pop();
    }
    components.city = locality.pop().filter(|c| !c.is_empty());
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> AddressComponents {
        extract_components(text, Country::Usa).expect("extractable")
    }

    #[test]
    fn us_address_with_separate_city_and_state_zip() {
        let c = extract("350 5th Ave, New York, NY 10118");
        assert_eq!(c.number.as_deref(), Some("350"));
        assert_eq!(c.street_name.as_deref(), Some("5th"));
        assert_eq!(c.street_type.as_deref(), Some("Ave"));
        assert_eq!(c.city.as_deref(), Some("New York"));
        assert_eq!(c.state.as_deref(), Some("NY"));
        assert_eq!(c.postal_code.as_deref(), Some("10118"));
        assert_eq!(c.street_line(), "350 5th Ave");
    }

    #[test]
    fn city_and_state_in_one_segment() {
        let c = extract("123 Main St, Springfield IL 62701");
        assert_eq!(c.city.as_deref(), Some("Springfield"));
        assert_eq!(c.state.as_deref(), Some("IL"));
        assert_eq!(c.postal_code.as_deref(), Some("62701"));
    }

    #[test]
    fn directional_prefix_and_suffix() {
        let c = extract("1600 Pennsylvania Ave NW, Washington, DC 20500");
        assert_eq!(c.street_name.as_deref(), Some("Pennsylvania"));
        assert_eq!(c.suffix.as_deref(), Some("NW"));
        assert_eq!(c.street_line(), "1600 Pennsylvania Ave NW");
        assert_eq!(c.city.as_deref(), Some("Washington"));
        assert_eq!(c.state.as_deref(), Some("DC"));

        let c = extract("120 E 4th St, Austin, TX 78701");
        assert_eq!(c.prefix.as_deref(), Some("E"));
        assert_eq!(c.street_line(), "120 E 4th St");
    }

    #[test]
    fn single_line_splits_after_street_type() {
        let c = extract("123 Main St Springfield IL 62701");
        assert_eq!(c.street_line(), "123 Main St");
        assert_eq!(c.city.as_deref(), Some("Springfield"));
        assert_eq!(c.state.as_deref(), Some("IL"));
        assert_eq!(c.postal_code.as_deref(), Some("62701"));
    }

    #[test]
    fn european_number_after_name() {
        let c = extract_components("Via del Corso 12, 00186 Roma", Country::Italy).unwrap();
        assert!(c.number_trails);
        assert_eq!(c.street_line(), "Via del Corso 12");
        assert_eq!(c.postal_code.as_deref(), Some("00186"));
        assert_eq!(c.city.as_deref(), Some("Roma"));
    }

    #[test]
    fn uk_postcode_is_extracted_and_uppercased() {
        let c = extract_components("10 Downing St, London sw1a 2aa", Country::Uk).unwrap();
        assert_eq!(c.postal_code.as_deref(), Some("SW1A 2AA"));
        assert_eq!(c.city.as_deref(), Some("London"));
        assert_eq!(c.street_line(), "10 Downing St");
    }

    #[test]
    fn explicit_country_segment_is_recorded_and_removed() {
        let c = extract("1 Infinite Loop, Cupertino, CA 95014, USA");
        assert_eq!(c.country, Some(Country::Usa));
        assert_eq!(c.city.as_deref(), Some("Cupertino"));
        assert_eq!(c.state.as_deref(), Some("CA"));
    }

    #[test]
    fn locality_without_street_is_not_a_street() {
        let c = extract("Seattle, WA");
        assert_eq!(c.street_line(), "");
        assert_eq!(c.city.as_deref(), Some("Seattle"));
        assert_eq!(c.state.as_deref(), Some("WA"));

        let c = extract("Seattle WA 98101");
        assert_eq!(c.street_line(), "");
        assert_eq!(c.city.as_deref(), Some("Seattle"));
        assert_eq!(c.postal_code.as_deref(), Some("98101"));
    }

    #[test]
    fn punctuation_only_is_unrecognisable() {
        assert!(matches!(
            extract_components(", , ;", Country::Usa),
            Err(AddressError::Unrecognisable)
        ));
    }
}
