//! Error types for the faview protocol layer.

mod catalog;
mod init;
mod page;

pub use catalog::*;
pub use init::*;
pub use page::*;
