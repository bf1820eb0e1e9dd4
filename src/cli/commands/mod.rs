pub mod cleanup;
pub mod config;
pub mod device;
pub mod export;
pub mod files;
pub mod init;
pub mod segments;
pub mod session;
