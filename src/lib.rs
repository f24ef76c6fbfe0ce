//! Polls a Heizöl24 MEX heating-oil tank sensor and exposes each reading as
//! a named sensor with unit, class and display metadata.

pub mod api;
pub mod config;
pub mod config_flow;
pub mod coordinator;
pub mod error;
pub mod integration;
pub mod mex;
pub mod response_store;
pub mod sensors;
pub mod snapshot;
