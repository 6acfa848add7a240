//! CLI Commands

pub mod access;
pub mod config;
