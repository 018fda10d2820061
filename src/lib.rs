//! Design-to-code conversion
//!
//! Turns a UI design, either a design-tool export or a raster screenshot,
//! into component code by delegating to a chat completions service and
//! extracting the fenced code block from its reply.

pub mod ai;
pub mod convert;
pub mod error;
pub mod export;
pub mod extract;
pub mod input;
pub mod models;
pub mod prompts;

pub use convert::Converter;
pub use error::{Error, Result};
