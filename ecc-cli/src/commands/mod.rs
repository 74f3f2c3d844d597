//! Command handlers

pub mod identity;
pub mod invoke;
