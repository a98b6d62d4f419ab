pub mod models;
pub mod pair;
pub mod properties;
pub mod traits;

pub use models::*;
pub use properties::*;
pub use traits::*;
