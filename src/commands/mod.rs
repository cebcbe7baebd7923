mod convert_command;
pub use convert_command::*;

mod ls_command;
pub use ls_command::*;
