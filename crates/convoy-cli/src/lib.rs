pub mod cli;
pub mod commands;
pub mod config;
pub mod report;
pub mod simulation;
