pub mod repository;
pub mod validation;
pub mod views;
