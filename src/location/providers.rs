//! OpenWeather geocoding provider: query shapes, HTTP transport, and the
//! retrying lookup client.

use std::time::Duration;

use serde_json::Value;

use super::retry::{retry_with_fixed_delay, RetryPolicy, Sleeper, ThreadSleeper};
use super::types::{LocationRequest, LookupError};
use crate::config::GeolocConfig;

const USER_AGENT: &str = concat!("geoloc_util/", env!("CARGO_PKG_VERSION"));
const REDACTED: &str = "<redacted>";

// ─── Queries ────────────────────────────────────────────────────

/// A provider-specific geocoding query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoQuery {
    /// `GET /zip?zip={code},{country}`
    Zip { code: String, country: String },
    /// `GET /direct?q={city},{state},{country}`
    Direct {
        city: String,
        state: String,
        country: String,
    },
}

impl GeoQuery {
    pub fn for_request(request: &LocationRequest, country: &str) -> Self {
        match request {
            LocationRequest::Zip(code) => Self::Zip {
                code: code.clone(),
                country: country.to_string(),
            },
            LocationRequest::CityState { city, state } => Self::Direct {
                city: city.clone(),
                state: state.clone(),
                country: country.to_string(),
            },
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Zip { .. } => "zip",
            Self::Direct { .. } => "direct",
        }
    }

    /// Query parameters, excluding the API key.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Zip { code, country } => vec![("zip", format!("{},{}", code, country))],
            Self::Direct { city, state, country } => {
                vec![("q", format!("{},{},{}", city, state, country))]
            }
        }
    }

    /// Human-readable location, used in terminal errors.
    pub fn location(&self) -> String {
        match self {
            Self::Zip { code, .. } => code.clone(),
            Self::Direct { city, state, .. } => format!("{}, {}", city, state),
        }
    }
}

// ─── Transport ──────────────────────────────────────────────────

/// One HTTP GET returning a decoded JSON body.
///
/// Implementations map a non-2xx answer to [`LookupError::Status`], network
/// trouble to [`LookupError::Transport`], and an undecodable 2xx body to
/// [`LookupError::InvalidResponse`].
pub trait Transport {
    fn get_json(
        &self,
        url: &str,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<Value, LookupError>;
}

/// Blocking transport over a shared `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().user_agent(USER_AGENT).build(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn get_json(
        &self,
        url: &str,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<Value, LookupError> {
        let mut request = self.agent.get(url).timeout(timeout);
        for (key, value) in params {
            request = request.query(key, value);
        }

        let response = request.call().map_err(|e| match e {
            ureq::Error::Status(status, _) => LookupError::Status { status },
            ureq::Error::Transport(t) => LookupError::Transport(t.to_string()),
        })?;

        response
            .into_json::<Value>()
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))
    }
}

// ─── Client ─────────────────────────────────────────────────────

/// Geocoding client with bounded, fixed-delay retry.
pub struct GeocodingClient<T = UreqTransport, S = ThreadSleeper> {
    transport: T,
    sleeper: S,
    base_url: String,
    api_key: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl GeocodingClient {
    /// Client backed by a real HTTP agent and real sleeps.
    pub fn new(config: &GeolocConfig) -> Self {
        Self::with_parts(config, UreqTransport::new(), ThreadSleeper)
    }
}

impl<T: Transport, S: Sleeper> GeocodingClient<T, S> {
    /// Client with an injected transport and sleeper (for testing).
    pub fn with_parts(config: &GeolocConfig, transport: T, sleeper: S) -> Self {
        Self {
            transport,
            sleeper,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout: config.request_timeout,
            retry: RetryPolicy {
                max_attempts: config.max_attempts,
                delay: config.retry_delay,
            },
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Fetch the raw JSON body for `query`, retrying transient failures.
    pub fn fetch(&self, query: &GeoQuery) -> Result<Value, LookupError> {
        let url = format!("{}/{}", self.base_url, query.endpoint());
        let owned = query.params();
        let mut params: Vec<(&str, &str)> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();
        params.push(("appid", self.api_key.as_str()));

        let location = query.location();
        tracing::debug!(endpoint = query.endpoint(), location = %location, "geocoding request");

        retry_with_fixed_delay(&self.retry, &self.sleeper, &location, || {
            self.transport
                .get_json(&url, &params, self.timeout)
                .map_err(|e| self.redact(e))
        })
    }

    /// Strip the API key from anything that might echo the request URL.
    fn redact(&self, err: LookupError) -> LookupError {
        if self.api_key.is_empty() {
            return err;
        }
        match err {
            LookupError::Transport(msg) => {
                LookupError::Transport(msg.replace(&self.api_key, REDACTED))
            }
            LookupError::InvalidResponse(msg) => {
                LookupError::InvalidResponse(msg.replace(&self.api_key, REDACTED))
            }
            other => other,
        }
    }
}
