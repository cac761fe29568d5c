pub mod feed;
pub mod round;

pub use feed::*;
pub use round::*;
