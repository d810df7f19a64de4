use crate::config::Config;
use crate::constants::{GEO_FIELDS, GEO_SERVICE};
use crate::error::{Result, ScraperError};
use crate::infra::http_client::{build_http_client, ensure_success, join_url};
use crate::types::{GeoInfo, GeoLookup};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

#[derive(Debug, Deserialize)]
struct CommuneResponse {
    nom: String,
    #[serde(rename = "codesPostaux")]
    codes_postaux: Vec<String>,
    population: i64,
}

/// Client for the `/communes/{code}` endpoint of the geo service.
pub struct GeoApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeoApiClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(build_http_client(config)?, config.geo_api_url.clone()))
    }
}

#[async_trait::async_trait]
impl GeoLookup for GeoApiClient {
    #[instrument(skip(self))]
    async fn fetch(&self, code_insee: &str) -> Result<GeoInfo> {
        let url = join_url(&self.base_url, &format!("communes/{code_insee}"));
        let response = self
            .client
            .get(&url)
            .query(&[("fields", GEO_FIELDS)])
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!("Unable to connect to the geo service: {}", e);
                ScraperError::connectivity(GEO_SERVICE, e)
            })?;

        if let Err(e) = ensure_success(GEO_SERVICE, code_insee, response.status()) {
            warn!("Cannot find information for city: {}", e);
            return Err(e);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScraperError::connectivity(GEO_SERVICE, e))?;
        let info = parse_commune(code_insee, &body).map_err(|e| {
            warn!(body = %body, "Unable to decode geo response: {}", e);
            e
        })?;

        debug!(name = %info.name, "Resolved city");
        Ok(info)
    }
}

fn parse_commune(code_insee: &str, body: &str) -> Result<GeoInfo> {
    let commune: CommuneResponse =
        serde_json::from_str(body).map_err(|e| ScraperError::decode(code_insee, e))?;

    let postal_code = commune
        .codes_postaux
        .into_iter()
        .next()
        .ok_or_else(|| ScraperError::decode(code_insee, "codesPostaux is empty"))?;

    Ok(GeoInfo {
        name: commune.nom,
        postal_code,
        population: commune.population,
    })
}
