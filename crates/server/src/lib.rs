pub mod auth;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;
