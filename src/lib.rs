pub mod config;
pub mod external;
pub mod handlers;
pub mod layout;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;
