pub mod config;
pub mod error;
pub mod git;
pub mod mdq;
pub mod metadata;
pub mod queue;
pub mod release;
pub mod sync;
pub mod ui;
pub mod workdir;

pub use error::{MdqpError, Result};
