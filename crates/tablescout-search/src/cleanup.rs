//! Address clean-up for provider hits.
//!
//! Providers frequently put the venue name where the first address line
//! belongs and prefix formatted addresses with it. Both confuse identity
//! resolution, so every provider hit goes through here before it is
//! compared with anything.

use tablescout_core::{AddressParts, PlaceCandidate};
use tablescout_match::thresholds::ADDRESS_ECHOES_NAME;
use tablescout_match::{parse_address, similarity, strip_leading_name, ParsedAddress};
use tablescout_provider::Place;

/// Convert a search hit, re-deriving its address when the first address
/// line merely repeats the name.
pub(crate) fn clean_place(place: Place) -> Option<PlaceCandidate> {
    let name = place.display_name()?.to_owned();
    let line1_echoes_name = place
        .address_line1
        .as_deref()
        .is_some_and(|line1| similarity(&name, line1) > ADDRESS_ECHOES_NAME);
    let secondary = place
        .address_line2
        .clone()
        .or_else(|| place.formatted.clone());
    let structured_street = place.structured_street();

    let mut candidate = place.into_candidate()?;
    strip_name_from_formatted(&mut candidate);

    if line1_echoes_name {
        // The street taken from line 1 is the name again.
        candidate.address.street = structured_street;
        if let Some(secondary) = secondary {
            let parsed = parse_address(&strip_leading_name(&name, &secondary)).data;
            overlay(&mut candidate.address, parsed);
        }
    }

    Some(candidate)
}

/// Convert a nearby hit, keeping the provider's fields as given apart from
/// the leading name in the formatted address.
pub(crate) fn place_to_candidate(place: Place) -> Option<PlaceCandidate> {
    let mut candidate = place.into_candidate()?;
    strip_name_from_formatted(&mut candidate);
    Some(candidate)
}

/// Run the address parser over a candidate's formatted (or comparable)
/// address. A successful parse replaces structured fields; a failed one
/// only fills gaps.
pub(crate) fn reparse_address(candidate: &mut PlaceCandidate) {
    let Some(text) = candidate.address.comparable() else {
        return;
    };
    let result = parse_address(&strip_leading_name(&candidate.name, &text));
    if result.success {
        overlay(&mut candidate.address, result.data);
    } else {
        fill_gaps(&mut candidate.address, result.data);
    }
}

fn strip_name_from_formatted(candidate: &mut PlaceCandidate) {
    if let Some(formatted) = candidate.address.formatted.take() {
        let stripped = strip_leading_name(&candidate.name, &formatted);
        candidate.address.formatted = Some(stripped).filter(|s| !s.is_empty());
    }
}

/// Parsed values win; the provider's fill whatever the parse missed.
fn overlay(address: &mut AddressParts, parsed: ParsedAddress) {
    address.street = parsed.street.or(address.street.take());
    address.city = parsed.city.or(address.city.take());
    address.state = parsed.state.or(address.state.take());
    address.postal_code = parsed.zip_code.or(address.postal_code.take());
    address.country = address.country.take().or(parsed.country);
}

fn fill_gaps(address: &mut AddressParts, parsed: ParsedAddress) {
    address.street = address.street.take().or(parsed.street);
    address.city = address.city.take().or(parsed.city);
    address.state = address.state.take().or(parsed.state);
    address.postal_code = address.postal_code.take().or(parsed.zip_code);
    address.country = address.country.take().or(parsed.country);
}
