//! Batch orchestration: classify and resolve each raw input in order.

use crate::location::{classify, LocationResolver, Outcome, Sleeper, Transport};

/// Ordered map from the literal input string to its outcome.
///
/// Iteration follows first-insertion order. Inserting an existing key
/// replaces its outcome in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultMap {
    entries: Vec<(String, Outcome)>,
}

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, input: impl Into<String>, outcome: Outcome) {
        let input = input.into();
        match self.entries.iter_mut().find(|(key, _)| *key == input) {
            Some((_, existing)) => *existing = outcome,
            None => self.entries.push((input, outcome)),
        }
    }

    pub fn get(&self, input: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|(key, _)| key == input)
            .map(|(_, outcome)| outcome)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.entries.iter().map(|(key, outcome)| (key.as_str(), outcome))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve every input, one at a time, never stopping on a failure.
pub fn process<T, S, I>(resolver: &LocationResolver<T, S>, inputs: I) -> ResultMap
where
    T: Transport,
    S: Sleeper,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut results = ResultMap::new();

    for raw in inputs {
        let raw = raw.as_ref();
        let outcome = match classify(raw) {
            Ok(request) => resolver.resolve(&request),
            Err(e) => {
                tracing::debug!(input = raw, error = %e, "rejected location");
                e.into()
            }
        };
        results.insert(raw, outcome);
    }

    let ok = results.iter().filter(|(_, o)| o.is_success()).count();
    tracing::debug!(total = results.len(), ok, failed = results.len() - ok, "batch complete");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::testing::{resolver_with, MockTransport};
    use crate::location::{LookupError, Place};
    use serde_json::json;

    fn madison_body() -> serde_json::Value {
        json!([{
            "name": "Madison",
            "lat": 43.074761,
            "lon": -89.3837613,
            "country": "US",
            "state": "Wisconsin"
        }])
    }

    fn nampa_body() -> serde_json::Value {
        json!({"zip": "83686", "name": "Nampa", "lat": 43.5432, "lon": -116.5946, "country": "US"})
    }

    #[test]
    fn test_result_map_insert_and_replace() {
        let mut map = ResultMap::new();
        map.insert("a", Outcome::error("first"));
        map.insert("b", Outcome::Success(Place::default()));
        map.insert("a", Outcome::error("second"));

        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&Outcome::error("second")));
        assert_eq!(map.len(), 2);
        assert!(map.get("c").is_none());
    }

    #[test]
    fn test_validation_failures_skip_network() {
        let resolver = resolver_with(MockTransport::new(vec![]));
        let inputs = [
            "Nopeville, XX",
            "Madison WI",
            "1234",
            "",
            "ABCDE",
            "123456",
            "Madison, XY",
        ];
        let results = process(&resolver, inputs);

        assert_eq!(results.len(), inputs.len());
        assert!(resolver.client().transport().calls().is_empty());
        assert_eq!(
            results.get("Nopeville, XX"),
            Some(&Outcome::error("Invalid State abbreviation."))
        );
        assert_eq!(
            results.get("Madison WI"),
            Some(&Outcome::error("Invalid City/State format. No comma found."))
        );
        assert_eq!(
            results.get("1234"),
            Some(&Outcome::error("Invalid zip format (must be 5 digits)."))
        );
        assert_eq!(
            results.get(""),
            Some(&Outcome::error("Invalid City/State format. No comma found."))
        );
        assert_eq!(
            results.get("123456"),
            Some(&Outcome::error("Invalid zip format (must be 5 digits)."))
        );
        assert!(!results.get("ABCDE").unwrap().is_success());
        assert!(!results.get("Madison, XY").unwrap().is_success());
    }

    #[test]
    fn test_mixed_batch_preserves_order_and_keys() {
        let resolver =
            resolver_with(MockTransport::new(vec![Ok(madison_body()), Ok(nampa_body())]));
        let inputs = vec![
            "madison , wi".to_string(),
            "Nope, XX".to_string(),
            "83686".to_string(),
        ];
        let results = process(&resolver, &inputs);

        let keys: Vec<&str> = results.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["madison , wi", "Nope, XX", "83686"]);
        assert!(results.get("madison , wi").unwrap().is_success());
        assert!(!results.get("Nope, XX").unwrap().is_success());
        match results.get("83686") {
            Some(Outcome::Success(place)) => assert_eq!(place.name.as_deref(), Some("Nampa")),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_does_not_affect_neighbours() {
        let resolver = resolver_with(MockTransport::new(vec![
            Err(LookupError::Status { status: 500 }),
            Err(LookupError::Status { status: 500 }),
            Err(LookupError::Status { status: 500 }),
            Ok(madison_body()),
        ]));
        let results = process(&resolver, ["83686", "Madison, WI"]);

        assert_eq!(
            results.get("83686"),
            Some(&Outcome::error("HTTP request failed after 3 attempts: HTTP status 500"))
        );
        match results.get("Madison, WI") {
            Some(Outcome::Success(place)) => assert_eq!(place.state.as_deref(), Some("Wisconsin")),
            other => panic!("expected success, got {:?}", other),
        }
        assert_eq!(resolver.client().transport().calls().len(), 4);
    }

    #[test]
    fn test_order_follows_input_permutation() {
        let inputs = ["1234", "Madison WI", "Nope, XX"];
        let reversed: Vec<&str> = inputs.iter().rev().copied().collect();

        let resolver = resolver_with(MockTransport::new(vec![]));
        let keys = |results: ResultMap| -> Vec<String> {
            results.iter().map(|(k, _)| k.to_string()).collect()
        };
        let forward = keys(process(&resolver, inputs));
        let backward = keys(process(&resolver, &reversed));

        assert_eq!(forward, inputs);
        assert_eq!(backward, reversed);
    }

    #[test]
    fn test_duplicate_input_keeps_first_position() {
        let resolver = resolver_with(MockTransport::new(vec![]));
        let results = process(&resolver, ["1234", "Madison WI", "1234"]);
        let keys: Vec<&str> = results.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["1234", "Madison WI"]);
    }

    #[test]
    fn test_empty_batch() {
        let resolver = resolver_with(MockTransport::new(vec![]));
        let results = process(&resolver, Vec::<String>::new());
        assert!(results.is_empty());
    }
}
