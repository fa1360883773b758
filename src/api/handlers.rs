use crate::api::errors::ApiError;
use crate::app::App;
use crate::core::Artifact;
use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Request payload of `POST /generate`
#[derive(Deserialize)]
pub struct GenerateRequest {
    pub request: String,
}

/// Response payload of a successful generation
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub run_id: Uuid,
    pub artifact: Artifact,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub crew: String,
}

/// Runs the crew for one request and returns the bid request
#[axum::debug_handler]
pub async fn generate(
    Extension(app): Extension<Arc<App>>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    info!("API generation requested");
    match app.generate(&payload.request).await {
        Ok((run_id, artifact)) => Ok(Json(GenerateResponse { run_id, artifact })),
        Err(e) => {
            error!("API generation failed: {}", e);
            Err(e.into())
        }
    }
}

pub async fn health(Extension(app): Extension<Arc<App>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        crew: app.crew().name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::ScriptedExecutor;
    use crate::app::testing::{app_with, happy_executor};

    fn request(text: &str) -> Json<GenerateRequest> {
        Json(GenerateRequest {
            request: text.to_string(),
        })
    }

    #[tokio::test]
    async fn generate_returns_artifact_and_run_id() {
        let app = Arc::new(app_with(happy_executor()));

        let Json(response) = generate(Extension(app), request("banner on a news site"))
            .await
            .unwrap();

        assert_eq!(response.artifact.value()["id"], "req-1");
        assert!(!response.run_id.is_nil());
    }

    #[tokio::test]
    async fn failed_run_maps_to_bad_gateway() {
        let executor = ScriptedExecutor::new()
            .answer("Request Intake Agent", "reqs")
            .fail("Dependency Map Agent", "model overloaded");
        let app = Arc::new(app_with(executor));

        let err = generate(Extension(app), request("video ad")).await.unwrap_err();

        assert_eq!(err.code, 502);
        assert!(err.message.contains("dependency_map"));
    }

    #[tokio::test]
    async fn empty_request_is_a_bad_request() {
        let app = Arc::new(app_with(happy_executor()));

        let err = generate(Extension(app), request("")).await.unwrap_err();

        assert_eq!(err.code, 400);
    }

    #[tokio::test]
    async fn health_reports_the_crew() {
        let app = Arc::new(app_with(happy_executor()));

        let Json(health) = health(Extension(app)).await;

        assert_eq!(health.status, "ok");
        assert_eq!(health.crew, "OpenRTB Project Crew");
    }
}
