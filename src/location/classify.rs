//! Location classifier: raw string → validated [`LocationRequest`].
//!
//! Any decimal digit (Unicode `Nd`) anywhere means "ZIP", otherwise
//! "City, State". Other number characters such as `½` or `Ⅻ` do not count.
//! The ZIP rule only checks length (5 characters), not that every character
//! is a digit, so `"1ABCD"` is accepted and left for the provider to reject.

use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

use super::types::{LocationRequest, ValidationError};

/// The 50 US state abbreviations accepted in "City, State" input.
pub const US_STATES: [&str; 50] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA", "KS",
    "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY",
    "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV",
    "WI", "WY",
];

const ZIP_LEN: usize = 5;

pub fn is_us_state(abbr: &str) -> bool {
    US_STATES.contains(&abbr)
}

fn is_decimal_digit(c: char) -> bool {
    c.general_category() == GeneralCategory::DecimalNumber
}

/// Classify and validate a raw location string.
pub fn classify(raw: &str) -> Result<LocationRequest, ValidationError> {
    if raw.chars().any(is_decimal_digit) {
        return classify_zip(raw);
    }
    classify_city_state(raw)
}

fn classify_zip(raw: &str) -> Result<LocationRequest, ValidationError> {
    if raw.chars().count() != ZIP_LEN {
        return Err(ValidationError::ZipLength);
    }
    Ok(LocationRequest::Zip(raw.to_string()))
}

fn classify_city_state(raw: &str) -> Result<LocationRequest, ValidationError> {
    if !raw.contains(',') {
        return Err(ValidationError::MissingComma);
    }

    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [city, state] = parts.as_slice() else {
        return Err(ValidationError::SegmentCount);
    };

    let city = title_case(city);
    let state = state.to_uppercase();
    if !is_us_state(&state) {
        return Err(ValidationError::UnknownState);
    }

    Ok(LocationRequest::CityState { city, state })
}

/// Upper-case the first letter of every run of letters, lower-case the rest.
///
/// "st. louis" → "St. Louis", "o'fallon" → "O'Fallon", "NEW YORK" → "New York".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
