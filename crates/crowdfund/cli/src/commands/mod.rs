//! Command implementations

pub mod campaign;
pub mod chain;
pub mod deploy;
pub mod status;
