/// Default locations and endpoints, overridable through `Config`.
pub const DEFAULT_RENT_INDEX_PATH: &str = "./ressources/indicateurs-loyers-appartements.csv";
pub const DEFAULT_GEO_API_URL: &str = "https://geo.api.gouv.fr";
pub const DEFAULT_RATING_SITE_URL: &str = "https://www.bien-dans-ma-ville.fr/";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://cities.db";
pub const DEFAULT_RESOURCES_FOLDER: &str = "./ressources";
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Name of the intermediate dataset inside the resources folder.
pub const DATASET_FILE_NAME: &str = "results.json";

// Environment variable names
pub const ENV_RENT_INDEX_PATH: &str = "INDICATEUR_LOYERS";
pub const ENV_GEO_API_URL: &str = "API_GEO_URL";
pub const ENV_RATING_SITE_URL: &str = "NOTE_WEBSITE_URL";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_RESOURCES_FOLDER: &str = "RESSOURCES_FOLDER";
pub const ENV_ENRICH_CONCURRENCY: &str = "ENRICH_CONCURRENCY";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
pub const ENV_PORT: &str = "PORT";
pub const ENV_METRICS_ADDR: &str = "METRICS_ADDR";

/// `TYPPRED` value of municipality-level rows in the rent index.
pub const MUNICIPALITY_PREDICTION: &str = "commune";

/// Fields requested from the geo service.
pub const GEO_FIELDS: &str = "nom,codesPostaux,population";

/// Elements holding the overall rating on the rating site.
pub const RATING_SELECTOR: &str = "div.total";

pub const GEO_SERVICE: &str = "geo_api";
pub const RATING_SERVICE: &str = "rating_site";
