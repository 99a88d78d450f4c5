use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{GeocodeError, Geocoder, PlaceCandidate, PlaceSearch, PlaceStatus};

#[derive(Debug, Clone)]
enum MockReply {
    Search(PlaceSearch),
    TransportFailure(String),
    MissingApiKey,
}

/// Geocoder double that answers by substring match on the query.
///
/// Unmatched queries get [`PlaceStatus::ZeroResults`] unless a default is set.
#[derive(Debug)]
pub struct MockGeocoder {
    rules: Mutex<Vec<(String, MockReply)>>,
    default_reply: Mutex<MockReply>,
    queries: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl Default for MockGeocoder {
    fn default() -> Self {
        Self {
            rules: Mutex::new(Vec::new()),
            default_reply: Mutex::new(MockReply::Search(PlaceSearch::with_status(
                PlaceStatus::ZeroResults,
            ))),
            queries: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queries containing `needle` resolve to one place at the given coordinates.
    pub fn with_place(self, needle: &str, latitude: f64, longitude: f64, address: &str) -> Self {
        self.with_search(
            needle,
            PlaceSearch::ok(vec![PlaceCandidate::at(latitude, longitude, address)]),
        )
    }

    /// Queries containing `needle` return `search`.
    pub fn with_search(self, needle: &str, search: PlaceSearch) -> Self {
        self.rules
            .lock()
            .push((needle.to_string(), MockReply::Search(search)));
        self
    }

    /// Queries containing `needle` return the given service status with no results.
    pub fn with_status(self, needle: &str, status: PlaceStatus) -> Self {
        self.with_search(needle, PlaceSearch::with_status(status))
    }

    /// Queries containing `needle` fail at the transport level.
    pub fn with_transport_failure(self, needle: &str) -> Self {
        self.rules.lock().push((
            needle.to_string(),
            MockReply::TransportFailure("connection reset".to_string()),
        ));
        self
    }

    /// Every unmatched query fails as if no API key were configured.
    pub fn without_api_key(self) -> Self {
        *self.default_reply.lock() = MockReply::MissingApiKey;
        self
    }

    /// Every unmatched query resolves to one place at the given coordinates.
    pub fn with_default_place(self, latitude: f64, longitude: f64, address: &str) -> Self {
        *self.default_reply.lock() = MockReply::Search(PlaceSearch::ok(vec![PlaceCandidate::at(
            latitude, longitude, address,
        )]));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn text_search(&self, query: &str, _region: &str) -> Result<PlaceSearch, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().push(query.to_string());

        let reply = self
            .rules
            .lock()
            .iter()
            .find(|(needle, _)| query.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default_reply.lock().clone());

        match reply {
            MockReply::Search(search) => Ok(search),
            MockReply::TransportFailure(message) => Err(GeocodeError::Transport { message }),
            MockReply::MissingApiKey => Err(GeocodeError::MissingApiKey),
        }
    }
}
