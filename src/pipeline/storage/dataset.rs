use crate::error::{Result, ScraperError};
use crate::types::EnrichedCity;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Writes the enriched cities as a pretty-printed JSON array, creating parent folders.
pub fn save_dataset<P: AsRef<Path>>(path: P, cities: &[EnrichedCity]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, cities)?;
    writer.flush()?;

    info!("Saved {} cities to {}", cities.len(), path.display());
    Ok(())
}

pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<EnrichedCity>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ScraperError::NotFound(format!(
            "dataset file {} does not exist",
            path.display()
        )));
    }

    let reader = BufReader::new(File::open(path)?);
    let cities: Vec<EnrichedCity> = serde_json::from_reader(reader)?;
    info!("Loaded {} cities from {}", cities.len(), path.display());
    Ok(cities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn saves_into_missing_folder_and_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ressources").join("results.json");
        let cities = vec![EnrichedCity {
            name: "Melun".to_string(),
            average_rent_per_sqm: 14.2,
            rating: Some(3.1),
            population: 40844,
            postal_code: "77000".to_string(),
            departement: "77".to_string(),
            code_insee: "77288".to_string(),
        }];

        save_dataset(&path, &cities).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"loyer_moyen\": 14.2"));

        assert_eq!(load_dataset(&path).unwrap(), cities);
    }

    #[test]
    fn missing_dataset_is_not_found() {
        let dir = tempdir().unwrap();
        let err = load_dataset(dir.path().join("results.json")).unwrap_err();
        assert!(matches!(err, ScraperError::NotFound(_)));
    }

    #[test]
    fn malformed_dataset_is_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        fs::write(&path, "[{\"nom\": \"Melun\"}]").unwrap();
        assert!(matches!(load_dataset(&path).unwrap_err(), ScraperError::Json(_)));
    }
}
