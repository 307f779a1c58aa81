//! Core types for the location subsystem.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// A validated lookup request.
///
/// Only [`super::classify`] builds these, so a `LocationRequest` always came
/// from input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationRequest {
    /// A 5-character ZIP candidate, passed to the provider verbatim.
    Zip(String),
    /// A title-cased city and an upper-cased, known US state abbreviation.
    CityState { city: String, state: String },
}

impl fmt::Display for LocationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zip(code) => write!(f, "{}", code),
            Self::CityState { city, state } => write!(f, "{}, {}", city, state),
        }
    }
}

/// A single match record from the geocoding provider.
///
/// Every field is optional: ZIP responses carry no `state`, and an empty
/// match array produces a `Place` with nothing set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// The final per-location result.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Place),
    Error { message: String },
}

impl Outcome {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Input rejected before any network I/O.
///
/// The `Display` strings are user-facing and printed as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid zip format (must be 5 digits).")]
    ZipLength,
    #[error("Invalid City/State format. No comma found.")]
    MissingComma,
    #[error("Invalid City/State format. Expect 'City, State'.")]
    SegmentCount,
    #[error("Invalid State abbreviation.")]
    UnknownState,
}

/// Failures talking to the geocoding provider.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Timeout, refused connection, DNS failure and the like.
    #[error("{0}")]
    Transport(String),

    /// The provider answered with a non-2xx status.
    #[error("HTTP status {status}")]
    Status { status: u16 },

    /// A 2xx answer whose body could not be understood.
    #[error("Unexpected response from geocoding service: {0}")]
    InvalidResponse(String),

    /// Retry budget spent; carries the last underlying failure.
    #[error("HTTP request failed after {attempts} attempts: {source}")]
    Exhausted {
        location: String,
        attempts: u32,
        #[source]
        source: Box<LookupError>,
    },
}

impl From<LookupError> for Outcome {
    fn from(err: LookupError) -> Self {
        Outcome::error(err.to_string())
    }
}

impl From<ValidationError> for Outcome {
    fn from(err: ValidationError) -> Self {
        Outcome::error(err.to_string())
    }
}
