// src/store/mod.rs

pub mod questionnaire;
pub mod session;
