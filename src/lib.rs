//! Resolve US ZIP codes and "City, State" pairs to coordinates using the
//! OpenWeather geocoding API.

pub mod batch;
pub mod config;
pub mod location;
pub mod output;
