use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One municipality row of the rent index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentRecord {
    pub code_insee: String,
    pub departement: String,
    pub average_rent_per_sqm: f64,
}

/// Answer of the geo service for a single code_insee.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoInfo {
    pub name: String,
    pub postal_code: String,
    pub population: i64,
}

/// A municipality with its rent, geographic metadata and rating.
///
/// This is the unit written to the dataset file, stored, and returned by the
/// query endpoint, always under its French field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedCity {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "loyer_moyen")]
    pub average_rent_per_sqm: f64,
    /// `None` when the rating site had nothing usable for this city.
    #[serde(rename = "note")]
    pub rating: Option<f64>,
    pub population: i64,
    #[serde(rename = "code_postal")]
    pub postal_code: String,
    pub departement: String,
    pub code_insee: String,
}

impl EnrichedCity {
    pub fn new(record: RentRecord, geo: GeoInfo, rating: Option<f64>) -> Self {
        Self {
            name: geo.name,
            average_rent_per_sqm: record.average_rent_per_sqm,
            rating,
            population: geo.population,
            postal_code: geo.postal_code,
            departement: record.departement,
            code_insee: record.code_insee,
        }
    }
}

/// Response body of the department search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityListing {
    #[serde(rename = "nombre")]
    pub count: usize,
    pub villes: Vec<EnrichedCity>,
}

impl From<Vec<EnrichedCity>> for CityListing {
    fn from(villes: Vec<EnrichedCity>) -> Self {
        Self {
            count: villes.len(),
            villes,
        }
    }
}

/// Geographic lookup for a municipality.
#[async_trait::async_trait]
pub trait GeoLookup: Send + Sync {
    async fn fetch(&self, code_insee: &str) -> Result<GeoInfo>;
}

/// Popularity rating lookup for a municipality.
#[async_trait::async_trait]
pub trait RatingLookup: Send + Sync {
    async fn fetch(&self, city_name: &str, code_insee: &str) -> Result<f64>;
}
