pub mod errors;
pub mod manifest;
pub mod models;
pub mod providers;
