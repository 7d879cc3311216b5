pub mod init;
pub mod labels;
pub mod style;
pub mod viz;
