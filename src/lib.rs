pub mod catalog;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod organizer;
pub mod prompt;
pub mod sanitize;
pub mod scanner;
