//! WorldPulse sentiment service
//!
//! Fans a topic out across a fixed catalog of countries to a hosted
//! generative model, normalizes the replies into a stable schema, and can
//! render an illustration per country through an external generator.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fanout;
pub mod image;
pub mod model;
pub mod normalize;
pub mod server;

#[cfg(test)]
mod error_tests;
