//! Line-oriented front end: turns input lines into navigator commands and
//! writes their output and status lines back.

mod command;
mod shell;

pub use command::Command;
pub use shell::{Response, Shell, ShellError};
