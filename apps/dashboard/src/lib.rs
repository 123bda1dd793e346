pub mod a11y;
pub mod api_client;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod models;
pub mod routes;
pub mod state;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;
