// Pipeline storage: the intermediate dataset file

pub mod dataset;
