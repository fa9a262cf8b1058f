use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::warn;

use common::RegionCode;
use geocode::{Coordinate, GeocodeClient};
use trends_feed::TrendRecord;

use crate::pipeline::{Selector, TrendsPipeline};

pub struct AppState {
    pub resolver: GeocodeClient,
    pub pipeline: TrendsPipeline,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsParams {
    pub location: Option<String>,
    pub location_name: Option<String>,
}

/// The trends endpoint's body: either trends plus summary, or an error —
/// never both, never empty.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PipelineResponse {
    Success {
        trends: Vec<TrendRecord>,
        summary: String,
    },
    Failure {
        error: String,
    },
}

/// The single error shape every pipeline failure is rendered as.
fn pipeline_failure(e: &common::TrendsError) -> PipelineResponse {
    PipelineResponse::Failure {
        error: format!("Failed to fetch trends or generate summary: {e}"),
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/geocode", get(geocode_handler))
        .route("/api/trends", get(trends_handler))
        .with_state(state)
}

async fn geocode_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeocodeParams>,
) -> Response {
    let coord = match Coordinate::from_parts(params.lat, params.lon) {
        Ok(coord) => coord,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    };

    match state.resolver.resolve(coord).await {
        Ok(location) => {
            (StatusCode::OK, Json(serde_json::json!({ "location": location }))).into_response()
        }
        Err(e) => {
            warn!("Error geocoding: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to geocode location" })),
            )
                .into_response()
        }
    }
}

async fn trends_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendsParams>,
) -> Response {
    // Both bare and prefixed codes are accepted here; RegionCode normalizes.
    let region = params
        .location
        .as_deref()
        .map(RegionCode::new)
        .unwrap_or_else(RegionCode::country);
    let location_name = params
        .location_name
        .unwrap_or_else(|| "United States".to_string());

    match state.pipeline.run(Selector::Region(region), &location_name).await {
        Ok(payload) => (
            StatusCode::OK,
            Json(PipelineResponse::Success {
                trends: payload.trends,
                summary: payload.summary,
            }),
        )
            .into_response(),
        Err(e) => {
            warn!("Error in /api/trends: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(pipeline_failure(&e))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::SummaryConfig;
    use summarizer::SummaryClient;
    use trends_feed::FeedFetcher;

    /// One-shot HTTP listener answering every request with the given status
    /// line and an empty body.
    async fn serve_status(status_line: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub listener addr");

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response =
                    format!("{status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn failed_fetch_renders_the_single_error_body() {
        let feed_url = serve_status("HTTP/1.1 404 Not Found").await;

        // The summarizer endpoint is unroutable; the pipeline must fail
        // before ever reaching it.
        let pipeline = TrendsPipeline::new(
            GeocodeClient::new("http://127.0.0.1:9"),
            FeedFetcher::new(&feed_url),
            SummaryClient::with_base_url("test-key", "http://127.0.0.1:9", SummaryConfig::default()),
        );

        let err = pipeline
            .run(Selector::Region(RegionCode::new("CA")), "California")
            .await
            .expect_err("fetch against a 404 feed should fail");

        let json = serde_json::to_value(pipeline_failure(&err)).expect("serialize");
        let error = json["error"].as_str().expect("error string");
        assert!(error.starts_with("Failed to fetch trends or generate summary: "));
        assert!(error.contains("404"));
        assert!(json.get("trends").is_none());
        assert!(json.get("summary").is_none());
    }

    #[test]
    fn success_body_has_trends_and_summary_only() {
        let body = PipelineResponse::Success {
            trends: vec![],
            summary: "calm week".to_string(),
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert!(json.get("trends").is_some());
        assert!(json.get("summary").is_some());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn failure_body_has_error_only() {
        let body = PipelineResponse::Failure {
            error: "Failed to fetch trends or generate summary: Upstream unavailable: trends feed returned status 404".to_string(),
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert!(json.get("error").is_some());
        assert!(json.get("trends").is_none());
        assert!(json.get("summary").is_none());
    }

    #[test]
    fn trend_records_serialize_with_camel_case_image_source() {
        let record = TrendRecord {
            title: "Eclipse".to_string(),
            traffic: "200K+".to_string(),
            image: String::new(),
            image_source: "Example Wire".to_string(),
            related: vec![],
        };
        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["imageSource"], "Example Wire");
    }
}
