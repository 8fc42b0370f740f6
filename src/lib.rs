pub mod cards;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod health;
pub mod settings;
