//! Routed pages

pub mod holder;
pub mod login;
