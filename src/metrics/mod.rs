//! Driver metrics
//!
//! Recorded through the `metrics` facade; a recorder must be installed by the
//! host process for them to go anywhere.

/// Metric names
pub mod names {
    /// Connections opened successfully
    pub const CONNECTIONS_OPENED: &str = "mysql_sqldriver_connections_opened_total";
    /// Connection open attempts that failed
    pub const CONNECTION_OPEN_FAILURES: &str = "mysql_sqldriver_connection_open_failures_total";
    /// Protocol client errors passed through the translator
    pub const ERRORS_TRANSLATED: &str = "mysql_sqldriver_errors_translated_total";
    /// Rows handed out by cursors
    pub const ROWS_FETCHED: &str = "mysql_sqldriver_rows_fetched_total";
    /// TLS profiles registered
    pub const TLS_PROFILES_REGISTERED: &str = "mysql_sqldriver_tls_profiles_registered_total";
}

/// Counter helpers
pub mod counters {
    use super::names;
    use crate::error::ErrorKind;

    /// Record a successful open
    pub fn connection_opened(tls: &'static str) {
        metrics::counter!(names::CONNECTIONS_OPENED, "tls" => tls).increment(1);
    }

    /// Record a failed open
    pub fn connection_open_failed() {
        metrics::counter!(names::CONNECTION_OPEN_FAILURES).increment(1);
    }

    /// Record a translated error
    pub fn error_translated(kind: ErrorKind) {
        metrics::counter!(names::ERRORS_TRANSLATED, "kind" => kind.to_string()).increment(1);
    }

    /// Record a row read from a cursor
    pub fn row_fetched() {
        metrics::counter!(names::ROWS_FETCHED).increment(1);
    }

    /// Record a TLS profile registration
    pub fn tls_profile_registered() {
        metrics::counter!(names::TLS_PROFILES_REGISTERED).increment(1);
    }
}
