use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::apis::geo_api::GeoApiClient;
use crate::apis::rating_site::RatingSiteClient;
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::ingestion::rent_index::load_rent_index;
use crate::pipeline::processing::enrich::{EnrichmentReport, Enricher};
use crate::pipeline::storage::dataset::save_dataset;

/// Use case for turning the rent index into the enriched dataset file
pub struct BuildDatasetUseCase {
    enricher: Enricher,
    rent_index_path: PathBuf,
    dataset_path: PathBuf,
}

impl BuildDatasetUseCase {
    pub fn new(enricher: Enricher, rent_index_path: PathBuf, dataset_path: PathBuf) -> Self {
        Self {
            enricher,
            rent_index_path,
            dataset_path,
        }
    }

    /// Wire the real geo and rating clients from the configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let enricher = Enricher::new(
            Arc::new(GeoApiClient::from_config(config)?),
            Arc::new(RatingSiteClient::from_config(config)?),
            config.enrich_concurrency,
        );
        Ok(Self::new(
            enricher,
            config.rent_index_path.clone(),
            config.dataset_path(),
        ))
    }

    pub fn with_dataset_path(self, dataset_path: PathBuf) -> Self {
        Self {
            dataset_path,
            ..self
        }
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    /// Load, enrich and save. A missing or malformed rent index aborts the run;
    /// lookup failures only affect their own city.
    pub async fn execute(&self) -> Result<EnrichmentReport> {
        let records = load_rent_index(&self.rent_index_path)?;
        let report = self.enricher.enrich(records).await;
        save_dataset(&self.dataset_path, &report.cities)?;
        Ok(report)
    }
}
