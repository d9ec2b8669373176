pub mod init;
pub mod setup;
pub mod status;
