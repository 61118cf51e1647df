pub mod edges;
pub mod snap;
pub mod windows;
