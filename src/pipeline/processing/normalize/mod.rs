// Normalization of values coming out of the rent index and geo service

pub mod city_name;
