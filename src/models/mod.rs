// src/models/mod.rs

pub mod attempt;
pub mod dashboard;
pub mod goal;
pub mod journal;
pub mod quiz;
pub mod taxonomy;
pub mod user;
