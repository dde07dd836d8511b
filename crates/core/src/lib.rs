pub mod config;
pub mod error;
pub mod logging;

pub mod completion;
pub mod index;
pub mod model;
pub mod overload;
pub mod profile;
pub mod runtime;
pub mod solver;

pub use error::Result;
