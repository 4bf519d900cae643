// src/handlers/mod.rs

pub mod assignment;
pub mod review;
pub mod submission;
