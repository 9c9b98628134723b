//! Terminal client for the bank portal.
//!
//! This crate wires the session core to the bank API and a line-oriented
//! shell:
//! - `config`: portal configuration from file and environment
//! - `command`: shell command parsing
//! - `navigator`: views and the terminal navigator
//! - `shell`: the command loop and the view watcher

pub mod command;
pub mod config;
pub mod navigator;
pub mod shell;
