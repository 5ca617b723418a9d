pub mod classifier;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod export;
pub mod middleware;
pub mod models;
pub mod query;
pub mod response;
pub mod routes;
pub mod services;
pub mod skin;
pub mod state;
