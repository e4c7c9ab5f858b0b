pub mod init;
pub mod status_line;
pub mod watching;
