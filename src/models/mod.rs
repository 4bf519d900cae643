// src/models/mod.rs

pub mod answer;
pub mod assignment;
pub mod assignment_result;
pub mod question;
