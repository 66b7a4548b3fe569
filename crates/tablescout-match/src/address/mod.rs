//! Free-text address parsing.
//!
//! [`parse_address`] never fails to its caller: every outcome, including
//! empty or unrecognisable input, is an [`AddressParseResult`] whose `data`
//! carries whatever could be recovered.

mod components;
mod country;

use serde::{Deserialize, Serialize};
use tablescout_core::AddressParts;

pub use country::{country_scores, detect_country, Country, HOME_COUNTRY};

use components::{extract_components, AddressComponents, AddressError};

/// Best-effort structured address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    /// The input with whitespace collapsed.
    pub full_address: String,
}

impl ParsedAddress {
    #[must_use]
    pub fn into_address_parts(self) -> AddressParts {
        let formatted = if self.full_address.trim().is_empty() {
            None
        } else {
            Some(self.full_address)
        };
        AddressParts {
            street: self.street,
            city: self.city,
            state: self.state,
            postal_code: self.zip_code,
            country: self.country,
            formatted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressParseResult {
    /// A street line plus at least one of city, state or postal code.
    pub success: bool,
    pub data: ParsedAddress,
    pub error: Option<String>,
}

/// Parse `raw`, detecting the country from the text.
#[must_use]
pub fn parse_address(raw: &str) -> AddressParseResult {
    parse_address_with_country(raw, None)
}

/// Parse `raw` using `country` for postal-code shapes, or the detected
/// country when `None`.
#[must_use]
pub fn parse_address_with_country(raw: &str, country: Option<Country>) -> AddressParseResult {
    if raw.trim().is_empty() {
        return AddressParseResult {
            success: false,
            data: ParsedAddress {
                full_address: raw.to_string(),
                ..ParsedAddress::default()
            },
            error: Some("address is empty".to_string()),
        };
    }

    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let assumed = country.unwrap_or_else(|| detect_country(&collapsed));

    match extract_components(&collapsed, assumed) {
        Ok(components) => build_result(components, assumed, collapsed),
        Err(AddressError::Unrecognisable) => {
            tracing::debug!(address = %collapsed, "address has no recognisable components");
            AddressParseResult {
                success: false,
                data: ParsedAddress {
                    country: Some(assumed.to_string()),
                    full_address: collapsed,
                    ..ParsedAddress::default()
                },
                error: Some(AddressError::Unrecognisable.to_string()),
            }
        }
    }
}

fn build_result(
    components: AddressComponents,
    assumed: Country,
    full_address: String,
) -> AddressParseResult {
    let street = Some(components.street_line()).filter(|s| !s.is_empty());
    let country = components.country.unwrap_or(assumed);
    let has_locality = components.city.is_some()
        || components.state.is_some()
        || components.postal_code.is_some();
    let success = street.is_some() && has_locality;

    let data = ParsedAddress {
        street,
        city: components.city,
        state: components.state,
        zip_code: components.postal_code,
        country: Some(country.to_string()),
        full_address,
    };

    AddressParseResult {
        success,
        data,
        error: (!success).then(|| {
            "address only partially parsed; need a street and a city, state or postal code"
                .to_string()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_us_address_parses() {
        let result = parse_address("350 5th Ave, New York, NY 10118");
        assert!(result.success, "{result:?}");
        assert_eq!(result.data.street.as_deref(), Some("350 5th Ave"));
        assert_eq!(result.data.city.as_deref(), Some("New York"));
        assert_eq!(result.data.state.as_deref(), Some("NY"));
        assert_eq!(result.data.zip_code.as_deref(), Some("10118"));
        assert_eq!(result.data.country.as_deref(), Some("USA"));
        assert!(result.error.is_none());
    }

    #[test]
    fn uk_address_detects_country_and_postcode() {
        let result = parse_address("10 Downing St, London SW1A 2AA");
        assert!(result.success, "{result:?}");
        assert_eq!(result.data.city.as_deref(), Some("London"));
        assert_eq!(result.data.zip_code.as_deref(), Some("SW1A 2AA"));
        assert_eq!(result.data.country.as_deref(), Some("UK"));
    }

    #[test]
    fn newlines_are_collapsed() {
        let result = parse_address("123 Main St\nSpringfield,\n  IL 62701");
        assert!(result.success, "{result:?}");
        assert_eq!(result.data.full_address, "123 Main St Springfield, IL 62701");
        assert_eq!(result.data.zip_code.as_deref(), Some("62701"));
    }

    #[test]
    fn empty_input_fails_with_raw_text_only() {
        let result = parse_address("   ");
        assert!(!result.success);
        assert_eq!(result.data.full_address, "   ");
        assert!(result.data.street.is_none());
        assert!(result.data.country.is_none());
        assert!(result.error.is_some());
    }

    #[test]
    fn locality_only_is_partial_but_keeps_data() {
        let result = parse_address("Seattle, WA");
        assert!(!result.success);
        assert_eq!(result.data.city.as_deref(), Some("Seattle"));
        assert_eq!(result.data.state.as_deref(), Some("WA"));
        assert_eq!(result.data.country.as_deref(), Some("USA"));
        assert!(result
            .error
            .as_deref()
            .is_some_and(|e| e.contains("partially parsed")));
    }

    #[test]
    fn street_only_is_partial() {
        let result = parse_address("742 Evergreen Terrace");
        assert!(!result.success);
        assert_eq!(result.data.street.as_deref(), Some("742 Evergreen Terrace"));
    }

    #[test]
    fn unrecognisable_input_is_a_failure_not_a_panic() {
        let result = parse_address("--- ,,, ###");
        assert!(!result.success);
        assert_eq!(result.data.full_address, "--- ,,, ###");
        assert_eq!(result.data.country.as_deref(), Some("USA"));
    }

    #[test]
    fn supplied_country_overrides_detection() {
        let result = parse_address_with_country("Via del Corso 12, 00186 Roma", Some(Country::Italy));
        assert!(result.success, "{result:?}");
        assert_eq!(result.data.street.as_deref(), Some("Via del Corso 12"));
        assert_eq!(result.data.country.as_deref(), Some("Italy"));
    }

    #[test]
    fn converts_into_address_parts() {
        let parts = parse_address("350 5th Ave, New York, NY 10118")
            .data
            .into_address_parts();
        assert_eq!(parts.postal_code.as_deref(), Some("10118"));
        assert_eq!(
            parts.formatted.as_deref(),
            Some("350 5th Ave, New York, NY 10118")
        );
    }
}
