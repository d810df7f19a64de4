use std::path::Path;

use tracing::{info, warn};

use crate::error::{Result, ScraperError};
use crate::pipeline::storage::dataset::load_dataset;
use crate::storage::CityRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Inserted(usize),
    /// The store already held these cities; its content was kept as is.
    AlreadyLoaded,
}

/// Loads the dataset file into the store at startup.
///
/// A uniqueness violation means a previous start already loaded the data and
/// is not an error. A missing dataset or any other store error is.
pub fn seed_store(repo: &dyn CityRepository, dataset_path: &Path) -> Result<SeedOutcome> {
    let cities = load_dataset(dataset_path)?;

    match repo.insert_all(&cities) {
        Ok(inserted) => {
            info!("Stored {} cities", inserted);
            Ok(SeedOutcome::Inserted(inserted))
        }
        Err(ScraperError::DuplicateCity(code_insee)) => {
            warn!(
                code_insee = %code_insee,
                "Store already contains the dataset, keeping existing data"
            );
            Ok(SeedOutcome::AlreadyLoaded)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::storage::dataset::save_dataset;
    use crate::storage::SqliteCityRepository;
    use crate::types::EnrichedCity;
    use tempfile::tempdir;

    fn melun() -> EnrichedCity {
        EnrichedCity {
            name: "Melun".to_string(),
            average_rent_per_sqm: 14.2,
            rating: Some(3.1),
            population: 40844,
            postal_code: "77000".to_string(),
            departement: "77".to_string(),
            code_insee: "77288".to_string(),
        }
    }

    #[test]
    fn seeding_twice_keeps_existing_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        save_dataset(&path, &[melun()]).unwrap();
        let repo = SqliteCityRepository::open_in_memory().unwrap();

        assert_eq!(seed_store(&repo, &path).unwrap(), SeedOutcome::Inserted(1));
        assert_eq!(seed_store(&repo, &path).unwrap(), SeedOutcome::AlreadyLoaded);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn missing_dataset_is_fatal() {
        let dir = tempdir().unwrap();
        let repo = SqliteCityRepository::open_in_memory().unwrap();
        let err = seed_store(&repo, &dir.path().join("results.json")).unwrap_err();
        assert!(matches!(err, ScraperError::NotFound(_)));
    }
}
