pub mod config;
pub mod marker;
pub mod pipeline;
pub mod report;
pub mod summary;

pub use config::*;
pub use marker::*;
pub use pipeline::*;
pub use report::*;
pub use summary::*;
