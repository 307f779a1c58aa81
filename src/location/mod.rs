//! Location subsystem: input classification, geocoding lookups with retry,
//! and resolution of validated requests into outcomes.

pub mod classify;
pub mod providers;
pub mod resolver;
pub mod retry;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::{classify, US_STATES};
pub use providers::{GeoQuery, GeocodingClient, Transport, UreqTransport};
pub use resolver::LocationResolver;
pub use retry::{RetryPolicy, Sleeper, ThreadSleeper};
pub use types::{LocationRequest, LookupError, Outcome, Place, ValidationError};
