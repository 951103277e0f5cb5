pub mod config;
pub mod filters;
pub mod models;
pub mod routes;
pub mod startup;
pub mod telemetry;
