pub mod config;
pub mod log;
pub mod magnet;
pub mod rect;
pub mod session;

pub use config::Config;
pub use magnet::{EdgeIndex, EdgeSegment};
pub use rect::Rect;
pub use session::{BorderOffset, DragSession, MoveSample};

/// A boxed error type for window operations.
///
/// Any error type that implements the `Error` trait can be boxed into this.
pub type WindowResult<T> = Result<T, Box<dyn std::error::Error>>;
