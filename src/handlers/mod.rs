// src/handlers/mod.rs

pub mod admin;
pub mod auth;
pub mod goals;
pub mod health;
pub mod journal;
pub mod profile;
pub mod quiz;
pub mod taxonomy;
