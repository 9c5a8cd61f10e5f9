pub mod diagram;
pub mod error;
pub mod export;
pub mod fonts;
pub mod svg;
pub mod theme;

pub use error::{Error, Result};
