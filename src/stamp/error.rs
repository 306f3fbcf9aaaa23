use thiserror::Error;

/// A stamping failure rejects the whole operation — no partially-stamped
/// image is ever returned. The caller keeps the raw frame for a retake.
#[derive(Error, Debug)]
pub enum StampError {
    #[error("failed to decode captured frame")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode stamped image")]
    Encode(#[source] image::ImageError),

    #[error("stamping worker failed: {0}")]
    Worker(String),
}
