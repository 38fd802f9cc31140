// src/models/mod.rs

pub mod access;
pub mod ad;
pub mod pricing;
pub mod questionnaire;
pub mod recommendation;
pub mod session;
