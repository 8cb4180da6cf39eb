pub mod collections;
pub mod payload;
pub mod repository;
pub mod validation;
pub mod views;
