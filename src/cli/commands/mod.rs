mod command_result;
pub mod generate;
pub mod init;
pub mod list;

pub use command_result::*;
