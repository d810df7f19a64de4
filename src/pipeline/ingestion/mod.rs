// Pipeline ingestion: reading the rent index

pub mod rent_index;
