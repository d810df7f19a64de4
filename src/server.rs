use crate::error::ScraperError;
use crate::storage::CityRepository;
use crate::types::CityListing;
use axum::{
    extract::{Path, Query},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Extension, Router,
};
use hyper::Server;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

type Repository = Arc<dyn CityRepository>;

/// Query string of the department search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Maximum monthly rent in euros
    pub loyer_max: i64,
    /// Dwelling surface in m²
    pub surface: u32,
}

/// Store failures surface as a 500 with a JSON message.
pub struct ApiError(ScraperError);

impl From<ScraperError> for ApiError {
    fn from(err: ScraperError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "villes_scraper",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Cities of a department within budget, best rated first.
async fn search_cities(
    Extension(repo): Extension<Repository>,
    Path(code): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<CityListing>, ApiError> {
    let cities = repo.search(&code, params.loyer_max, f64::from(params.surface))?;
    Ok(Json(CityListing::from(cities)))
}

/// Create the HTTP router with all routes
pub fn create_server(repo: Repository) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/departements/:code/villes", get(search_cities))
        .layer(Extension(repo))
        .layer(ServiceBuilder::new().layer(cors))
}

/// Serve until Ctrl-C
pub async fn start_server(repo: Repository, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_server(repo);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    info!("HTTP server running on http://{}", addr);
    info!("Search: http://{}/departements/{{code}}/villes?loyer_max=..&surface=..", addr);

    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down HTTP server");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteCityRepository;
    use crate::types::EnrichedCity;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn city(code: &str, name: &str, rent: f64, rating: Option<f64>) -> EnrichedCity {
        EnrichedCity {
            name: name.to_string(),
            average_rent_per_sqm: rent,
            rating,
            population: 500,
            postal_code: "01100".to_string(),
            departement: "1".to_string(),
            code_insee: code.to_string(),
        }
    }

    fn app() -> Router {
        let repo = SqliteCityRepository::open_in_memory().unwrap();
        repo.insert_all(&[
            city("01001", "A", 10.0, Some(3.5)),
            city("01002", "B", 8.0, Some(4.0)),
            city("01003", "C", 7.0, None),
        ])
        .unwrap();
        create_server(Arc::new(repo))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Option<Value>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).ok())
    }

    #[tokio::test]
    async fn searches_department() {
        let (status, body) =
            get_json(app(), "/departements/1/villes?loyer_max=100&surface=10").await;

        assert_eq!(status, StatusCode::OK);
        let body = body.unwrap();
        assert_eq!(body["nombre"], 3);
        let names: Vec<&str> = body["villes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["nom"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert_eq!(body["villes"][2]["note"], Value::Null);
        assert_eq!(body["villes"][0]["code_insee"], "01002");
        assert_eq!(body["villes"][0]["loyer_moyen"], 8.0);
    }

    #[tokio::test]
    async fn tight_budget_narrows_results() {
        let (_, body) = get_json(app(), "/departements/1/villes?loyer_max=75&surface=10").await;
        let body = body.unwrap();
        assert_eq!(body["nombre"], 1);
        assert_eq!(body["villes"][0]["nom"], "C");
    }

    #[tokio::test]
    async fn missing_parameters_are_rejected() {
        let (status, _) = get_json(app(), "/departements/1/villes?loyer_max=100").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            get_json(app(), "/departements/1/villes?loyer_max=beaucoup&surface=10").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_reports_version() {
        let (status, body) = get_json(app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.unwrap()["status"], "healthy");
    }
}
