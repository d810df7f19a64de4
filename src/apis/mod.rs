// Clients for the two external sources used to enrich the rent index

pub mod geo_api;
pub mod rating_site;
