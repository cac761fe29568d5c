pub mod feeds;
pub mod system;

pub use feeds::*;
pub use system::*;
