pub mod drift;
pub mod error;
pub mod filedate;
pub mod ids;
pub mod loader;
pub mod normalize;
pub mod recency;
pub mod table;

pub use drift::*;
pub use error::*;
pub use filedate::*;
pub use ids::*;
pub use loader::*;
pub use normalize::*;
pub use recency::*;
pub use table::*;
