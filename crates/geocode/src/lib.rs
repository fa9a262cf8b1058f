use common::{regions, RegionCode, TrendsError, TrendsResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

const SUPPORTED_COUNTRY: &str = "United States";

/// A latitude/longitude pair. Both parts are required; requests carrying a
/// partial pair are rejected before any lookup happens.
#[derive(Debug, Clone, Copy)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> TrendsResult<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) => Ok(Self { lat, lon }),
            _ => Err(TrendsError::InvalidInput(
                "Latitude and longitude are required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReverseGeocodeResponse {
    pub address: Option<Address>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Address {
    pub country: Option<String>,
    pub state: Option<String>,
}

/// Reverse-geocoding client backed by a Nominatim-compatible endpoint.
#[derive(Clone)]
pub struct GeocodeClient {
    client: Client,
    base_url: String,
}

impl GeocodeClient {
    pub fn new(base_url: &str) -> Self {
        // Nominatim rejects requests without an identifying user agent.
        let client = Client::builder()
            .user_agent("trends-map/0.1")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a coordinate to a region code. Unsupported countries and
    /// unmatched subdivision names resolve to the country sentinel; only the
    /// lookup call itself failing is an error.
    pub async fn resolve(&self, coord: Coordinate) -> TrendsResult<RegionCode> {
        let url = format!(
            "{}/reverse?format=json&lat={}&lon={}",
            self.base_url, coord.lat, coord.lon
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TrendsError::UpstreamUnavailable(format!("reverse geocode request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TrendsError::UpstreamUnavailable(format!(
                "reverse geocode returned status {status}"
            )));
        }

        let body: ReverseGeocodeResponse = resp
            .json()
            .await
            .map_err(|e| TrendsError::UpstreamUnavailable(format!("reverse geocode response unreadable: {e}")))?;

        let region = match body.address {
            Some(ref address) => region_for_address(address),
            None => RegionCode::country(),
        };

        info!("Resolved ({}, {}) to {}", coord.lat, coord.lon, region);
        Ok(region)
    }
}

/// Best-effort mapping from a reverse-geocode address to a region code.
/// Anything outside the supported country, and any state name missing from
/// the code table, maps to the country sentinel rather than an error.
pub fn region_for_address(address: &Address) -> RegionCode {
    if address.country.as_deref() != Some(SUPPORTED_COUNTRY) {
        return RegionCode::country();
    }

    address
        .state
        .as_deref()
        .and_then(regions::code_for_state_name)
        .unwrap_or_else(RegionCode::country)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(country: Option<&str>, state: Option<&str>) -> Address {
        Address {
            country: country.map(str::to_string),
            state: state.map(str::to_string),
        }
    }

    #[test]
    fn missing_coordinate_part_is_invalid_input() {
        assert!(matches!(
            Coordinate::from_parts(Some(38.9), None),
            Err(TrendsError::InvalidInput(_))
        ));
        assert!(matches!(
            Coordinate::from_parts(None, Some(-77.0)),
            Err(TrendsError::InvalidInput(_))
        ));
        assert!(Coordinate::from_parts(Some(38.9), Some(-77.0)).is_ok());
    }

    #[test]
    fn supported_country_with_known_state_resolves_to_subdivision() {
        let region = region_for_address(&address(Some("United States"), Some("Virginia")));
        assert_eq!(region.as_str(), "US-VA");
    }

    #[test]
    fn state_match_ignores_case() {
        let region = region_for_address(&address(Some("United States"), Some("nOrTh CaRoLiNa")));
        assert_eq!(region.as_str(), "US-NC");
    }

    #[test]
    fn other_countries_resolve_to_country_sentinel() {
        let region = region_for_address(&address(Some("Canada"), Some("Ontario")));
        assert!(region.is_country());
    }

    #[test]
    fn unknown_state_falls_back_to_country_sentinel() {
        let region = region_for_address(&address(Some("United States"), Some("Guam")));
        assert!(region.is_country());
    }

    #[test]
    fn missing_state_falls_back_to_country_sentinel() {
        let region = region_for_address(&address(Some("United States"), None));
        assert!(region.is_country());
    }
}
