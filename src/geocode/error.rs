use thiserror::Error;

/// Failure of a single reverse-geocoding attempt.
///
/// Never surfaced to the UI: the resolver retries once and then degrades
/// to the coordinate fallback string.
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("reverse geocoding request failed")]
    Http(#[from] reqwest::Error),

    #[error("reverse geocoding service returned HTTP {0}")]
    Status(u16),

    #[error("reverse geocoding request timed out")]
    Timeout,
}
