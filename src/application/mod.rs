//! Application layer - Pipeline orchestration and outbound ports

pub mod ports;
pub mod services;
