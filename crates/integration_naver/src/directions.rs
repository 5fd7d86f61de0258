//! Driving directions client

use async_trait::async_trait;
use domain::{Coordinate, RouteSummary};
use reqwest::Client;
use secrecy::ExposeSecret;
use tracing::{debug, instrument, warn};

use crate::config::NaverConfig;
use crate::error::NaverError;
use crate::http::{self, APIGW_KEY_HEADER, APIGW_KEY_ID_HEADER};
use crate::models::{DirectionsResponse, RouteEntry};

const DRIVING_PATH: &str = "/map-direction/v1/driving";

/// Trait for directions clients
#[async_trait]
pub trait DirectionsClient: Send + Sync {
    /// Driving route from `start` to `goal`
    async fn driving_route(
        &self,
        start: &Coordinate,
        goal: &Coordinate,
    ) -> Result<RouteSummary, NaverError>;
}

/// Naver driving directions client
#[derive(Debug)]
pub struct NaverDirectionsClient {
    client: Client,
    config: NaverConfig,
}

impl NaverDirectionsClient {
    /// Create a new directions client
    ///
    /// # Errors
    ///
    /// Returns an error if the directions credentials are missing or the
    /// HTTP client cannot be initialized.
    pub fn new(config: &NaverConfig) -> Result<Self, NaverError> {
        if !config.directions.is_complete() {
            return Err(NaverError::ConfigurationError(
                "directions key id and key are required".to_string(),
            ));
        }

        Ok(Self {
            client: http::build_client(config.timeout_secs)?,
            config: config.clone(),
        })
    }

    /// Convert the provider's first route alternative
    fn to_summary(&self, entry: RouteEntry) -> Result<RouteSummary, NaverError> {
        let path = entry
            .path
            .iter()
            .map(|&[lng, lat]| {
                Coordinate::new(lat, lng).map_err(|e| NaverError::ParseError(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let raw = entry.summary;
        let mut summary = RouteSummary::new(
            raw.distance,
            self.config.duration_unit.to_seconds(raw.duration),
            path,
        );
        summary.toll_fare = raw.toll_fare;
        summary.taxi_fare = raw.taxi_fare;
        summary.fuel_price = raw.fuel_price;
        Ok(summary)
    }
}

#[async_trait]
impl DirectionsClient for NaverDirectionsClient {
    #[instrument(skip(self), fields(start = %start, goal = %goal))]
    async fn driving_route(
        &self,
        start: &Coordinate,
        goal: &Coordinate,
    ) -> Result<RouteSummary, NaverError> {
        let url = format!("{}{DRIVING_PATH}", self.config.directions_base_url);
        let start_param = start.as_lng_lat_param();
        let goal_param = goal.as_lng_lat_param();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("start", start_param.as_str()),
                ("goal", goal_param.as_str()),
                ("option", self.config.route_option.as_str()),
            ])
            .header(APIGW_KEY_ID_HEADER, &self.config.directions.id)
            .header(APIGW_KEY_HEADER, self.config.directions.secret.expose_secret())
            .send()
            .await
            .map_err(|e| http::send_error(&e, self.config.timeout_secs))?;

        let mut body: DirectionsResponse =
            http::read_json(response, self.config.timeout_secs).await?;

        if body.code != 0 {
            warn!(code = body.code, message = %body.message, "No route");
            return Err(NaverError::NoRoute {
                code: body.code,
                message: body.message,
            });
        }

        let entry = body
            .route
            .remove(&self.config.route_option)
            .and_then(|alternatives| alternatives.into_iter().next())
            .ok_or_else(|| NaverError::NoRoute {
                code: body.code,
                message: format!("response has no '{}' route", self.config.route_option),
            })?;

        let summary = self.to_summary(entry)?;
        debug!(
            distance_m = summary.distance_meters,
            duration_s = summary.duration_seconds,
            points = summary.path.len(),
            "Route found"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DurationUnit;
    use crate::models::RouteSummaryRaw;

    fn entry() -> RouteEntry {
        RouteEntry {
            summary: RouteSummaryRaw {
                distance: 5000,
                duration: 600_000,
                toll_fare: Some(0),
                taxi_fare: Some(7600),
                fuel_price: Some(820),
            },
            path: vec![[126.978, 37.5665], [127.023_456_7, 37.523_456_7]],
        }
    }

    #[test]
    fn summary_swaps_path_order() {
        let client = NaverDirectionsClient::new(&NaverConfig::for_testing()).unwrap();
        let summary = client.to_summary(entry()).unwrap();
        assert_eq!(summary.path[0], Coordinate::new(37.5665, 126.978).unwrap());
        assert_eq!(summary.taxi_fare, Some(7600));
    }

    #[test]
    fn summary_respects_duration_unit() {
        let config = NaverConfig {
            duration_unit: DurationUnit::Milliseconds,
            ..NaverConfig::for_testing()
        };
        let client = NaverDirectionsClient::new(&config).unwrap();
        assert_eq!(client.to_summary(entry()).unwrap().duration_seconds, 600);
    }

    #[test]
    fn out_of_range_point_is_parse_error() {
        let client = NaverDirectionsClient::new(&NaverConfig::for_testing()).unwrap();
        let mut bad = entry();
        // lat/lng already swapped by the provider: lat 126.978 is invalid
        bad.path = vec![[37.5665, 126.978]];
        assert!(matches!(
            client.to_summary(bad),
            Err(NaverError::ParseError(_))
        ));
    }
}
