//! Natural-language editing of REAPER projects.
//!
//! An instruction and the project's `.RPP` text are folded into a few-shot
//! prompt, the model's answer is run as a reapy script against the live
//! project, and the project is then rendered to an audio file.

pub mod artifacts;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod extract;
pub mod library;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod reaper;
pub mod render;
pub mod template;
pub mod ux;

pub use pipeline::{nl_reaper_command, CommandOptions};
