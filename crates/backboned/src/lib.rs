//! Backboned - live terminal front end for the Global Backbone Monitor
//!
//! Scheduler, stdin command handling, terminal rendering and export writing
//! around the `backbone_common` engine.

pub mod commands;
pub mod render;
pub mod scheduler;
pub mod writer;
