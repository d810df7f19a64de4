pub mod build_dataset_use_case;
pub mod seed_store_use_case;
