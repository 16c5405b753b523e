pub mod config;
pub mod error;
pub mod logger;
pub mod text_utils;
pub mod content;
pub mod routing;
pub mod paginator;
pub mod translation;
pub mod taxonomy;
pub mod render;
pub mod output;
pub mod static_files;
pub mod site_builder;
#[cfg(test)]
mod test_data;

pub use error::{Error, Result};
