//! Tiered GPS acquisition: a cached-fast attempt, a fresh high-accuracy
//! attempt, then coarse network positioning, strictly in that order.
mod engine;
mod error;
mod source;
mod structs;

pub use engine::LocationEngine;
pub use error::{LocationError, LocationErrorKind};
pub use source::{PositionError, PositionOptions, PositionSource, RawPosition};
pub use structs::{LocationFix, LocationState, TierProfile, default_tiers};
