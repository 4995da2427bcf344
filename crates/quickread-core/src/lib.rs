//! quickread-core — Playback scheduler, quiz engine, and scoring.
//!
//! This crate holds the reading-session model, the timed word scheduler,
//! quiz generation and scoring, and the [`controller::SessionController`]
//! that ties them together behind a snapshot stream.

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod quiz;
pub mod scheduler;
pub mod scoring;
pub mod statistics;
pub mod tokenizer;
pub mod traits;

#[cfg(test)]
mod test_support;
