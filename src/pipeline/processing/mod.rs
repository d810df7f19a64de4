// Pipeline processing: name normalization and enrichment

pub mod enrich;
pub mod normalize;
