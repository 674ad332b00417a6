//! Utility types shared by every layer.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - [`Dimensions`] / [`WholeExtent`] - Grid shapes

mod error;
mod extent;

pub use error::*;
pub use extent::*;
