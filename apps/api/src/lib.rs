pub mod config;
pub mod controller;
pub mod errors;
pub mod interview;
pub mod llm_client;
pub mod resume;
pub mod routes;
pub mod state;
