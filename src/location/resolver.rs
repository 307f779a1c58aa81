//! Location resolver: validated request → provider query → [`Outcome`].

use serde_json::Value;

use super::providers::{GeoQuery, GeocodingClient, Transport, UreqTransport};
use super::retry::{Sleeper, ThreadSleeper};
use super::types::{LocationRequest, LookupError, Outcome, Place};
use crate::config::GeolocConfig;

/// Turns validated requests into outcomes via the geocoding client.
pub struct LocationResolver<T = UreqTransport, S = ThreadSleeper> {
    client: GeocodingClient<T, S>,
    country_code: String,
}

impl LocationResolver {
    pub fn new(config: &GeolocConfig) -> Self {
        Self::with_client(config, GeocodingClient::new(config))
    }
}

impl<T: Transport, S: Sleeper> LocationResolver<T, S> {
    /// Create a resolver around a specific client (for testing).
    pub fn with_client(config: &GeolocConfig, client: GeocodingClient<T, S>) -> Self {
        Self {
            client,
            country_code: config.country_code.clone(),
        }
    }

    pub fn client(&self) -> &GeocodingClient<T, S> {
        &self.client
    }

    /// Resolve one request. Never fails; errors come back as [`Outcome::Error`].
    pub fn resolve(&self, request: &LocationRequest) -> Outcome {
        let query = GeoQuery::for_request(request, &self.country_code);
        match self.client.fetch(&query).and_then(place_from_body) {
            Ok(place) => Outcome::Success(place),
            Err(e) => e.into(),
        }
    }
}

/// Pick the canonical match out of a provider response body.
///
/// Arrays yield their first element; an empty array yields an empty
/// [`Place`] (rendered with placeholders, not as an error). Objects are used
/// directly.
pub fn place_from_body(body: Value) -> Result<Place, LookupError> {
    let record = match body {
        Value::Array(items) => match items.into_iter().next() {
            Some(first) => first,
            None => return Ok(Place::default()),
        },
        obj @ Value::Object(_) => obj,
        other => {
            return Err(LookupError::InvalidResponse(format!(
                "expected an object or array, got {}",
                other
            )))
        }
    };

    if !record.is_object() {
        return Err(LookupError::InvalidResponse(format!(
            "expected a match object, got {}",
            record
        )));
    }

    serde_json::from_value(record).map_err(|e| LookupError::InvalidResponse(e.to_string()))
}
