pub mod premarket;
pub mod summary;
pub mod trade;

pub use premarket::*;
pub use summary::*;
pub use trade::*;
