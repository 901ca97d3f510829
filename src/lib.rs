pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod i18n;
pub mod jalali;
pub mod media;
pub mod models;
pub mod templates_structs;
