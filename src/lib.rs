// Library exports for Foodgram
// This allows integration tests and external code to use Foodgram modules

pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod media;
pub mod pagination;
pub mod recipes;
pub mod routes;
pub mod state;
pub mod users;
