use crate::geocode::ATTEMPT_TIMEOUT;
use crate::geocode::error::GeocodeError;
use async_trait::async_trait;
use reqwest::header::ACCEPT_LANGUAGE;
use serde::Deserialize;

/// Public Nominatim instance used when no endpoint override is given.
pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org";

/// Zoom 18 is the Nominatim level that resolves down to individual
/// buildings and POIs (street-level detail).
const REVERSE_ZOOM: &str = "18";

/// Subset of a Nominatim `/reverse` response the address composer reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReverseGeocodeReply {
    #[serde(default)]
    pub address: AddressFields,
    #[serde(default)]
    pub namedetails: NameDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NameDetails {
    pub name: Option<String>,
}

/// The address fields Nominatim may return, all optional. Field names
/// match the wire format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressFields {
    pub amenity: Option<String>,
    pub shop: Option<String>,
    pub tourism: Option<String>,
    pub office: Option<String>,
    pub building: Option<String>,
    pub house_number: Option<String>,
    pub road: Option<String>,
    pub pedestrian: Option<String>,
    pub path: Option<String>,
    pub footway: Option<String>,
    pub neighbourhood: Option<String>,
    pub suburb: Option<String>,
    pub residential: Option<String>,
    pub quarter: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub municipality: Option<String>,
    pub city_district: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
}

/// A reverse-geocoding service.
#[async_trait]
pub trait GeocodeBackend: Send + Sync {
    async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ReverseGeocodeReply, GeocodeError>;
}

/// Production backend: the Nominatim `/reverse` endpoint.
///
/// Nominatim's usage policy requires an identifying `User-Agent`; the
/// client also pins `Accept-Language: en` so composed addresses are
/// stable across devices.
pub struct Nominatim {
    http: reqwest::Client,
    endpoint: String,
}

impl Nominatim {
    pub fn new() -> Result<Self, GeocodeError> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Points the client at a different Nominatim-compatible endpoint,
    /// e.g. a self-hosted instance.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .timeout(ATTEMPT_TIMEOUT)
            .user_agent(concat!("geosnap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl GeocodeBackend for Nominatim {
    async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ReverseGeocodeReply, GeocodeError> {
        let url = format!("{}/reverse", self.endpoint);
        let response = self
            .http
            .get(&url)
            .header(ACCEPT_LANGUAGE, "en")
            .query(&[
                ("format", "json".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("zoom", REVERSE_ZOOM.to_string()),
                ("addressdetails", "1".to_string()),
                ("namedetails", "1".to_string()),
                ("extratags", "1".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}
