//! Outbound relay path: request ids and the upstream fetch.

pub mod correlation;
pub mod upstream;
