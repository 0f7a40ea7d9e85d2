// Library for tests to access modules

pub mod api;
pub mod config;
pub mod models;
pub mod routes;
pub mod state;
pub mod sync;
pub mod version;
