//! Domunity - residential building management backend
//!
//! Authenticates residents, assembles their profile from apartment, building
//! and account records, serves building data and records contact requests.

pub mod account;
pub mod api;
pub mod auth;
pub mod building;
pub mod config;
pub mod contact;
pub mod context;
pub mod db;
pub mod error;
pub mod profile;
pub mod server;
