use derive_more::Display;

use crate::navigator::CommandError;

const EXIT_COMMAND: &str = "exit";

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Command {
    #[display("cd")]
    Cd(Option<String>),
    #[display("pwd")]
    Pwd,
    #[display("ls")]
    Ls,
    #[display("mkdir")]
    Mkdir(Vec<String>),
    #[display("rmdir")]
    Rmdir(Vec<String>),
    #[display("exit")]
    Exit,
}

impl Command {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.eq_ignore_ascii_case(EXIT_COMMAND) {
            return Ok(Some(Command::Exit));
        }

        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };

        let command = match name {
            "cd" => Command::Cd(words.next().map(str::to_string)),
            "pwd" => Command::Pwd,
            "ls" => Command::Ls,
            "mkdir" => Command::Mkdir(words.map(str::to_string).collect()),
            "rmdir" => Command::Rmdir(words.map(str::to_string).collect()),
            _ => {
                return Err(CommandError::UnknownCommand {
                    name: name.to_string(),
                });
            }
        };
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("pwd", Command::Pwd)]
    #[case("  ls  ", Command::Ls)]
    #[case("ls -la", Command::Ls)]
    #[case("cd", Command::Cd(None))]
    #[case("cd a/b", Command::Cd(Some("a/b".to_string())))]
    #[case("cd a b", Command::Cd(Some("a".to_string())))]
    #[case("mkdir a  b\tc", Command::Mkdir(vec!["a".into(), "b".into(), "c".into()]))]
    #[case("mkdir", Command::Mkdir(vec![]))]
    #[case("rmdir ~/x", Command::Rmdir(vec!["~/x".into()]))]
    #[case("exit", Command::Exit)]
    #[case("EXIT", Command::Exit)]
    #[case("  Exit ", Command::Exit)]
    fn parses_known_commands(#[case] line: &str, #[case] expected: Command) {
        assert_eq!(Command::parse(line), Ok(Some(expected)));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t")]
    fn blank_lines_are_skipped(#[case] line: &str) {
        assert_eq!(Command::parse(line), Ok(None));
    }

    #[rstest]
    #[case("rm x", "rm")]
    #[case("LS", "LS")]
    #[case("exit now", "exit")]
    fn unknown_commands_are_rejected(#[case] line: &str, #[case] name: &str) {
        assert_eq!(
            Command::parse(line),
            Err(CommandError::UnknownCommand {
                name: name.to_string()
            })
        );
    }

    #[test]
    fn displays_command_name() {
        assert_eq!(Command::Mkdir(vec!["a".into()]).to_string(), "mkdir");
        assert_eq!(Command::Cd(None).to_string(), "cd");
    }
}
