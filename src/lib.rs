pub mod config;
pub mod db;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;
