pub mod browser;
pub mod compare;
pub mod config;
pub mod deadlines;
pub mod options;
pub mod output;
pub mod ranking;
pub mod scoring;
pub mod simulator;
pub mod store;
pub mod summary;
