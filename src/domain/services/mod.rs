pub mod auth_service;
pub mod stats;
pub mod ticketing;
