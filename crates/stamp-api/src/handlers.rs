//! Request handlers.

pub mod health;
pub mod jobs;
pub mod watermark;

pub use health::*;
pub use jobs::*;
pub use watermark::*;
