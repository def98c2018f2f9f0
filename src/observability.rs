use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("galen.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("galen.client.request_errors");
pub(crate) static CLIENT_REQUEST_RETRIES: Counter = Counter::new("galen.client.retries");
pub(crate) static CLIENT_RETRY_BACKOFF: Moments =
    Moments::new("galen.client.retry_backoff_seconds");

pub(crate) static HISTORY_REQUESTS: Counter = Counter::new("galen.history.requests");
pub(crate) static HISTORY_DELETES: Counter = Counter::new("galen.history.deletes");

pub(crate) static SESSION_ADOPTIONS: Counter = Counter::new("galen.session.adoptions");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_REQUEST_RETRIES);
    collector.register_moments(&CLIENT_RETRY_BACKOFF);

    collector.register_counter(&HISTORY_REQUESTS);
    collector.register_counter(&HISTORY_DELETES);

    collector.register_counter(&SESSION_ADOPTIONS);
}
