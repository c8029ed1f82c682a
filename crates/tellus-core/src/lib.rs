pub mod error;
pub mod id;
pub mod tolerance;
pub mod traits;

pub use error::{Result, TellusError};
pub use id::EntityId;
pub use tolerance::Tolerance;
pub use traits::Validate;
