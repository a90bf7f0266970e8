pub mod export;
pub mod init;
pub mod logs;
pub mod projects;
pub mod root;
