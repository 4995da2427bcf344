pub mod init;
pub mod read;
