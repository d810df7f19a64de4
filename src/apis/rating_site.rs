use crate::config::Config;
use crate::constants::{RATING_SELECTOR, RATING_SERVICE};
use crate::error::{Result, ScraperError};
use crate::infra::http_client::{build_http_client, ensure_success, join_url};
use crate::pipeline::processing::normalize::city_name::slugify_city_name;
use crate::types::RatingLookup;
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};

/// Scrapes the overall rating of a city from the rating site.
pub struct RatingSiteClient {
    client: reqwest::Client,
    base_url: String,
}

impl RatingSiteClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            build_http_client(config)?,
            config.rating_site_url.clone(),
        ))
    }
}

#[async_trait::async_trait]
impl RatingLookup for RatingSiteClient {
    #[instrument(skip(self))]
    async fn fetch(&self, city_name: &str, code_insee: &str) -> Result<f64> {
        let page = format!("{}-{}", slugify_city_name(city_name), code_insee);
        let url = join_url(&self.base_url, &format!("{page}/"));

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Unable to connect to the rating site for {}: {}", page, e);
            ScraperError::connectivity(RATING_SERVICE, e)
        })?;

        if let Err(e) = ensure_success(RATING_SERVICE, &page, response.status()) {
            warn!("Unable to get the rating page of {}: {}", page, e);
            return Err(e);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScraperError::connectivity(RATING_SERVICE, e))?;

        let rating = extract_rating(&page, &body)?;
        debug!(rating, "Scraped rating");
        Ok(rating)
    }
}

/// Reads the rating out of the last `div.total` of a page ("3.8 / 5" gives 3.8).
pub fn extract_rating(page: &str, html: &str) -> Result<f64> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(RATING_SELECTOR)
        .map_err(|e| ScraperError::RatingUnavailable(format!("{page}: bad selector {e:?}")))?;

    let raw_total = document
        .select(&selector)
        .last()
        .map(|element| element.text().collect::<String>())
        .ok_or_else(|| ScraperError::RatingUnavailable(page.to_string()))?;

    let score = raw_total.split('/').next().unwrap_or_default().trim();
    score.parse::<f64>().map_err(|_| ScraperError::InvalidRating {
        slug: page.to_string(),
        raw: raw_total.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="note"><div class="total">4.1 / 5</div></div>
          <section>
            <div class="total">
              3.8 / 5
            </div>
          </section>
        </body></html>
    "#;

    #[test]
    fn takes_last_total() {
        assert_eq!(extract_rating("melun-77288", PAGE).unwrap(), 3.8);
    }

    #[test]
    fn missing_markup_is_unavailable() {
        let err = extract_rating("melun-77288", "<html><body><p>rien</p></body></html>").unwrap_err();
        assert!(matches!(err, ScraperError::RatingUnavailable(_)));
    }

    #[test]
    fn non_numeric_rating_is_invalid() {
        let err = extract_rating("melun-77288", r#"<div class="total">N/A</div>"#).unwrap_err();
        match err {
            ScraperError::InvalidRating { slug, raw } => {
                assert_eq!(slug, "melun-77288");
                assert_eq!(raw, "N/A");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetches_slugged_page() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/voulte-sur-rhone-07349/");
            then.status(200).body(PAGE);
        });

        let client = RatingSiteClient::new(reqwest::Client::new(), format!("{}/", server.base_url()));
        let rating = client.fetch("La Voulte-sur-Rhône", "07349").await.unwrap();

        mock.assert();
        assert_eq!(rating, 3.8);
    }

    #[tokio::test]
    async fn missing_page_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/melun-77288/");
            then.status(404);
        });

        let client = RatingSiteClient::new(reqwest::Client::new(), server.base_url());
        let err = client.fetch("Melun", "77288").await.unwrap_err();
        assert!(matches!(err, ScraperError::NotFound(_)), "{err:?}");
    }

    #[tokio::test]
    async fn server_error_is_connectivity() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/melun-77288/");
            then.status(503);
        });

        let client = RatingSiteClient::new(reqwest::Client::new(), server.base_url());
        let err = client.fetch("Melun", "77288").await.unwrap_err();
        assert!(matches!(err, ScraperError::Connectivity { .. }), "{err:?}");
    }
}
