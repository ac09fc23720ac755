pub mod catalog;
pub mod format;
pub mod protocol;
pub mod server;
