//! Test doubles for the lookup client: a scripted transport and a sleeper
//! that records instead of blocking.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use serde_json::Value;

use super::providers::{GeocodingClient, Transport};
use super::resolver::LocationResolver;
use super::retry::Sleeper;
use super::types::LookupError;
use crate::config::GeolocConfig;

type Reply = Result<Value, LookupError>;

#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub url: String,
    pub params: Vec<(String, String)>,
    pub timeout: Duration,
}

/// Replays queued replies in order, then falls back to `always` if set.
pub struct MockTransport {
    replies: RefCell<VecDeque<Reply>>,
    always: Option<Box<dyn Fn() -> Reply>>,
    calls: RefCell<Vec<MockCall>>,
}

impl MockTransport {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            always: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn always(reply: impl Fn() -> Reply + 'static) -> Self {
        Self {
            replies: RefCell::new(VecDeque::new()),
            always: Some(Box::new(reply)),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.borrow().clone()
    }
}

impl Transport for MockTransport {
    fn get_json(
        &self,
        url: &str,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<Value, LookupError> {
        self.calls.borrow_mut().push(MockCall {
            url: url.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            timeout,
        });

        if let Some(reply) = self.replies.borrow_mut().pop_front() {
            return reply;
        }
        match &self.always {
            Some(reply) => reply(),
            None => panic!("MockTransport: unexpected request to {}", url),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}

pub fn test_config() -> GeolocConfig {
    GeolocConfig {
        base_url: "http://geo.test/geo/1.0".into(),
        ..GeolocConfig::new("test-key")
    }
}

pub fn resolver_with(
    transport: MockTransport,
) -> LocationResolver<MockTransport, RecordingSleeper> {
    let config = test_config();
    let client = GeocodingClient::with_parts(&config, transport, RecordingSleeper::default());
    LocationResolver::with_client(&config, client)
}
