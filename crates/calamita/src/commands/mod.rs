pub mod config;
pub mod debug;
pub mod gather;
pub mod init;
pub mod resize;
pub mod watch;
