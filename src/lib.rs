pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod host;
pub mod manifest;
pub mod outputs;
pub mod release;
pub mod ui;

pub use error::{AutoTagError, Result};
