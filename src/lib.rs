pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod forms;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
