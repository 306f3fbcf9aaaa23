//! Best-effort reverse geocoding.
//!
//! Converts a fix into a human-readable address with street-level detail.
//! This is pure enrichment: it may never block photo capture or
//! submission, so the resolver cannot fail — after one retry it falls
//! back to a deterministic coordinate string that callers treat as a
//! valid address.
mod backend;
mod error;

pub use backend::{
    AddressFields, DEFAULT_ENDPOINT, GeocodeBackend, NameDetails, Nominatim, ReverseGeocodeReply,
};
pub use error::GeocodeError;

use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::warn;

pub(crate) const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(8);
const RETRY_DELAY: Duration = Duration::from_secs(1);
const ATTEMPTS: u32 = 2;

/// The deterministic fallback used whenever no address can be resolved:
/// both coordinates formatted to 6 decimal places.
pub fn coordinate_text(latitude: f64, longitude: f64) -> String {
    format!("{latitude:.6}, {longitude:.6}")
}

/// Resolves a human-readable address for the given coordinates.
///
/// Each attempt is bounded to 8 seconds; on timeout or a non-success
/// response the resolver retries once after a fixed 1 second pause. If
/// the retry also fails, or the service returns no usable fields, the
/// result is [`coordinate_text`].
pub async fn resolve_address(backend: &dyn GeocodeBackend, latitude: f64, longitude: f64) -> String {
    for attempt in 1..=ATTEMPTS {
        match timeout(ATTEMPT_TIMEOUT, backend.reverse(latitude, longitude)).await {
            Ok(Ok(reply)) => {
                return compose_address(&reply)
                    .unwrap_or_else(|| coordinate_text(latitude, longitude));
            }
            Ok(Err(err)) => warn!(attempt, %err, "reverse geocoding attempt failed"),
            Err(_) => warn!(attempt, "reverse geocoding attempt timed out"),
        }
        if attempt < ATTEMPTS {
            sleep(RETRY_DELAY).await;
        }
    }
    coordinate_text(latitude, longitude)
}

/// Composes an address from the richest available fields, most specific
/// first, each included only when present, duplicates removed, joined by
/// `", "`. Returns `None` when nothing usable came back.
pub fn compose_address(reply: &ReverseGeocodeReply) -> Option<String> {
    let addr = &reply.address;
    let mut parts: Vec<String> = Vec::new();

    // 1. POI / place name
    let poi = reply
        .namedetails
        .name
        .clone()
        .or_else(|| addr.amenity.clone())
        .or_else(|| addr.shop.clone())
        .or_else(|| addr.tourism.clone())
        .or_else(|| addr.office.clone())
        .or_else(|| addr.building.clone());
    push_unique(&mut parts, poi);

    // 2. House number + road
    let road = addr
        .road
        .clone()
        .or_else(|| addr.pedestrian.clone())
        .or_else(|| addr.path.clone())
        .or_else(|| addr.footway.clone());
    let house_road = [addr.house_number.clone(), road]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    if !house_road.is_empty() {
        push_unique(&mut parts, Some(house_road));
    }

    // 3. Neighbourhood / suburb / locality
    let locality = addr
        .neighbourhood
        .clone()
        .or_else(|| addr.suburb.clone())
        .or_else(|| addr.residential.clone())
        .or_else(|| addr.quarter.clone());
    push_unique(&mut parts, locality);

    // 4. City / town / village
    let city = addr
        .city
        .clone()
        .or_else(|| addr.town.clone())
        .or_else(|| addr.village.clone())
        .or_else(|| addr.municipality.clone());
    push_unique(&mut parts, city.clone());

    // 5. District, when it is not just the city again
    let district = addr.city_district.clone().or_else(|| addr.district.clone());
    if district != city {
        push_unique(&mut parts, district);
    }

    // 6. State
    push_unique(&mut parts, addr.state.clone());

    // 7. Postcode
    push_unique(&mut parts, addr.postcode.clone());

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn push_unique(parts: &mut Vec<String>, value: Option<String>) {
    if let Some(value) = value {
        if !value.is_empty() && !parts.iter().any(|existing| existing == &value) {
            parts.push(value);
        }
    }
}
