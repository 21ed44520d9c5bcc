use std::io::{BufRead, Write};

use colored::Colorize;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::navigator::{CommandError, Session};
use crate::shell::Command;

/// What a single command produced: regular output followed by status lines
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Response {
    pub output: String,
    pub errors: Vec<CommandError>,
}

impl Response {
    fn output(output: String) -> Self {
        Self {
            output,
            errors: Vec::new(),
        }
    }

    fn errors(errors: Vec<CommandError>) -> Self {
        Self {
            output: String::new(),
            errors,
        }
    }
}

impl From<Result<(), CommandError>> for Response {
    fn from(result: Result<(), CommandError>) -> Self {
        match result {
            Ok(()) => Self::default(),
            Err(error) => Self::errors(vec![error]),
        }
    }
}

/// Reads commands line by line and writes their results back
pub struct Shell {
    session: Session,
    color: bool,
}

impl Shell {
    pub fn new(session: Session, color: bool) -> Self {
        Self { session, color }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs until `exit` or the end of input. Only I/O failures end the loop early.
    pub fn run(&mut self, input: impl BufRead, output: &mut impl Write) -> Result<(), ShellError> {
        let mut executed = 0usize;

        for line in input.lines() {
            let line = line.context(ReadSnafu)?;
            let response = match Command::parse(&line) {
                Ok(None) => continue,
                Ok(Some(Command::Exit)) => {
                    debug!("Exit requested");
                    break;
                }
                Ok(Some(command)) => self.execute(&command),
                Err(error) => Response::errors(vec![error]),
            };

            self.write_response(&response, output)?;
            output.flush().context(WriteSnafu)?;
            executed += 1;
        }

        info!("Executed {} commands", executed);
        Ok(())
    }

    pub fn execute(&mut self, command: &Command) -> Response {
        debug!("Executing {:?}", command);
        let response: Response = match command {
            Command::Cd(path) => self.session.cd(path.as_deref()).into(),
            Command::Pwd => Response::output(self.session.pwd()),
            Command::Ls => Response::output(self.session.ls()),
            Command::Mkdir(paths) => Response::errors(self.session.mkdir(paths)),
            Command::Rmdir(paths) => Response::errors(self.session.rmdir(paths)),
            Command::Exit => Response::default(),
        };

        if !response.errors.is_empty() {
            debug!("{} reported {} errors", command, response.errors.len());
        }
        response
    }

    fn write_response(&self, response: &Response, output: &mut impl Write) -> Result<(), ShellError> {
        output
            .write_all(response.output.as_bytes())
            .context(WriteSnafu)?;

        for error in &response.errors {
            let line = error.to_string();
            if self.color {
                writeln!(output, "{}", line.red()).context(WriteSnafu)?;
            } else {
                writeln!(output, "{}", line).context(WriteSnafu)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ShellError {
    #[snafu(display("Failed to read from the command input"))]
    ReadError { source: std::io::Error },
    #[snafu(display("Failed to write to the command output"))]
    WriteError { source: std::io::Error },
}
