pub mod email;
pub mod jurisdiction;
pub mod phone;
pub mod rule;
pub mod types;

pub use email::*;
pub use jurisdiction::*;
pub use phone::*;
pub use rule::*;
pub use types::*;
