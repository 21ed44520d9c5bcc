use snafu::Snafu;

use crate::filesystem::{ResolveError, TreeError};

/// Per-command failures. The display text is the status line written back to the user.
#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum CommandError {
    #[snafu(display("Invalid command."))]
    UnknownCommand { name: String },
    #[snafu(display("{}: missing operand.", command))]
    MissingOperand { command: String },
    #[snafu(display("Invalid path."))]
    InvalidPath { path: String, source: ResolveError },
    #[snafu(display("Not a directory."))]
    NotADirectory { path: String },
    #[snafu(display("Invalid path. Could not make new directory '{}'.", path))]
    MakeDirectory { path: String, source: ResolveError },
    #[snafu(display("Invalid path. Could not make new directory '{}'.", path))]
    InvalidDirectoryName { path: String, source: TreeError },
    #[snafu(display("File exists."))]
    FileExists { path: String },
    #[snafu(display("Invalid path. Could not remove directory '{}'.", path))]
    RemoveDirectory { path: String, source: ResolveError },
    #[snafu(display("Directory not empty: {}.", path))]
    DirectoryNotEmpty { path: String },
    #[snafu(display("Not a directory: {}.", path))]
    RemoveNonDirectory { path: String },
    #[snafu(display("Cannot remove directory '{}'.", path))]
    CannotRemove { path: String },
}
