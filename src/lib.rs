pub mod error;
pub mod config;
pub mod preprocessing;
pub mod label;
pub mod model;
pub mod classifier;
pub mod history;
pub mod scanner;
pub mod output;
pub mod session;
pub mod junk_drawer;
