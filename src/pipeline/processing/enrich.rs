use crate::metrics::{record_geo_lookup, record_rating_lookup};
use crate::types::{EnrichedCity, GeoLookup, RatingLookup, RentRecord};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// A rent record left out of the dataset because its geo lookup failed.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCity {
    pub code_insee: String,
    pub reason: String,
}

/// Outcome of one enrichment batch.
#[derive(Debug)]
pub struct EnrichmentReport {
    /// Enriched cities, in input order.
    pub cities: Vec<EnrichedCity>,
    pub skipped: Vec<SkippedCity>,
    /// Cities kept without a rating.
    pub ratings_missing: usize,
    pub elapsed: Duration,
}

enum Outcome {
    Enriched(EnrichedCity),
    Skipped(SkippedCity),
}

/// Drives the geo then rating lookups for each rent record.
///
/// Records are independent of each other: at most `concurrency` of them are
/// in flight, and a failure only ever affects its own record.
pub struct Enricher {
    geo: Arc<dyn GeoLookup>,
    rating: Arc<dyn RatingLookup>,
    concurrency: usize,
}

impl Enricher {
    pub fn new(geo: Arc<dyn GeoLookup>, rating: Arc<dyn RatingLookup>, concurrency: usize) -> Self {
        Self {
            geo,
            rating,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn enrich(&self, records: Vec<RentRecord>) -> EnrichmentReport {
        let started = Instant::now();
        let total = records.len();
        info!(total, concurrency = self.concurrency, "Starting enrichment");

        let outcomes: Vec<Outcome> = stream::iter(records)
            .map(|record| self.enrich_one(record))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut cities = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                Outcome::Enriched(city) => cities.push(city),
                Outcome::Skipped(skip) => skipped.push(skip),
            }
        }

        // A city is only usable once its name is known
        cities.retain(|city| !city.name.trim().is_empty());
        let ratings_missing = cities.iter().filter(|c| c.rating.is_none()).count();

        let elapsed = started.elapsed();
        info!(
            total,
            enriched = cities.len(),
            skipped = skipped.len(),
            ratings_missing,
            elapsed_ms = elapsed.as_millis() as u64,
            "Enrichment finished in {:?}",
            elapsed
        );

        EnrichmentReport {
            cities,
            skipped,
            ratings_missing,
            elapsed,
        }
    }

    #[instrument(skip(self, record), fields(code_insee = %record.code_insee))]
    async fn enrich_one(&self, record: RentRecord) -> Outcome {
        let geo = match self.geo.fetch(&record.code_insee).await {
            Ok(geo) => {
                record_geo_lookup("ok");
                geo
            }
            Err(e) => {
                record_geo_lookup(e.kind());
                warn!(kind = e.kind(), "Skipping city: {}", e);
                return Outcome::Skipped(SkippedCity {
                    code_insee: record.code_insee,
                    reason: e.to_string(),
                });
            }
        };

        let rating = match self.rating.fetch(&geo.name, &record.code_insee).await {
            Ok(rating) => {
                record_rating_lookup("ok");
                Some(rating)
            }
            Err(e) => {
                record_rating_lookup(e.kind());
                debug!(kind = e.kind(), "No rating for {}: {}", geo.name, e);
                None
            }
        };

        Outcome::Enriched(EnrichedCity::new(record, geo, rating))
    }
}
