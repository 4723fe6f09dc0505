use chrono::{DateTime, Utc};

#[inline]
pub fn log_fetch(scope: &str, started_at: DateTime<Utc>, details: &str) {
    let elapsed_ms = (Utc::now() - started_at).num_milliseconds();
    if details.trim().is_empty() {
        tracing::debug!("[fetch] {scope} took {elapsed_ms}ms");
    } else {
        tracing::debug!("[fetch] {scope} took {elapsed_ms}ms | {details}");
    }
}
