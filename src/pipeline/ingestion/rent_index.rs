use crate::constants::MUNICIPALITY_PREDICTION;
use crate::error::{Result, ScraperError};
use crate::types::RentRecord;
use csv::ReaderBuilder;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, instrument};

/// Columns of the rent index we rely on; the others are ignored.
#[derive(Debug, Deserialize)]
struct RentIndexRow {
    #[serde(rename = "TYPPRED")]
    prediction_type: String,
    #[serde(rename = "loypredm2")]
    rent_per_sqm: String,
    #[serde(rename = "INSEE")]
    code_insee: String,
    #[serde(rename = "DEP")]
    departement: String,
}

/// Loads the municipality rows of a `;`-delimited rent index, in file order.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_rent_index<P: AsRef<Path>>(path: P) -> Result<Vec<RentRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ScraperError::NotFound(format!(
            "rent index file {} does not exist",
            path.display()
        )));
    }

    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new().delimiter(b';').from_reader(file);

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for result in reader.deserialize() {
        let row: RentIndexRow = result?;
        if row.prediction_type != MUNICIPALITY_PREDICTION {
            skipped += 1;
            continue;
        }
        records.push(row_to_record(row)?);
    }

    debug!(skipped, "Ignored non-municipality rows");
    info!("Loaded {} municipalities from rent index", records.len());
    Ok(records)
}

fn row_to_record(row: RentIndexRow) -> Result<RentRecord> {
    let code_insee = normalize_code_insee(&row.code_insee);
    let average_rent_per_sqm = parse_rent(&row.rent_per_sqm).ok_or_else(|| {
        ScraperError::InvalidRent {
            code_insee: code_insee.clone(),
            raw: row.rent_per_sqm.clone(),
        }
    })?;

    Ok(RentRecord {
        code_insee,
        departement: row.departement,
        average_rent_per_sqm,
    })
}

/// Restores the leading zero that spreadsheets strip from codes of departments 01-09.
pub fn normalize_code_insee(raw: &str) -> String {
    if raw.len() == 4 {
        format!("0{raw}")
    } else {
        raw.to_string()
    }
}

/// Parses a comma-decimal amount ("10,07") rounded half-to-even at two places.
pub fn parse_rent(raw: &str) -> Option<f64> {
    let decimal = Decimal::from_str(raw.trim().replace(',', ".").as_str()).ok()?;
    decimal.round_dp(2).to_f64()
}
