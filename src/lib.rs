pub mod codec;
pub mod config;
pub mod delete_zone;
pub mod element;
pub mod entry;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod logging;
pub mod render;
pub mod scene;
pub mod session;

pub use error::{EngineError, EngineResult};
