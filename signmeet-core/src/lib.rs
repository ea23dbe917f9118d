pub mod classifier;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod service;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
