pub mod cli;
pub mod config;
pub mod error;
pub mod import;
pub mod report;
pub mod selection;
pub mod store;
pub mod wizard;
