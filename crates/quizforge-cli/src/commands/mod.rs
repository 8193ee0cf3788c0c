pub mod init;
pub mod list;
pub mod stats;
pub mod take;
pub mod validate;
