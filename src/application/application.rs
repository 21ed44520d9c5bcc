use std::io::Cursor;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::config::{ConfigCreationError, NavigatorConfig};
use crate::navigator::Session;
use crate::shell::{Shell, ShellError};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let config = match &app_config.config {
            Some(path) => NavigatorConfig::read(path).await.context(ConfigSnafu)?,
            None => NavigatorConfig::default(),
        };
        debug!("Loaded config: {:?}", config);

        let color_mode = app_config.color.or(config.color).unwrap_or_default();
        let color = color_mode.enabled();
        colored::control::set_override(color);
        debug!("Color mode {:?}, colored output: {}", color_mode, color);

        let mut shell = Shell::new(Session::new(config.build_tree()), color);
        let stdout = std::io::stdout();
        let mut output = stdout.lock();

        match &app_config.script {
            Some(path) => {
                info!("Running commands from {}", path.display());
                let script = compio::fs::read(path).await.context(ScriptSnafu {
                    file_path: path.display().to_string(),
                })?;
                shell
                    .run(Cursor::new(script), &mut output)
                    .context(ShellSnafu)?;
            }
            None => {
                debug!("Reading commands from standard input");
                shell
                    .run(std::io::stdin().lock(), &mut output)
                    .context(ShellSnafu)?;
            }
        }

        let session = shell.session();
        debug!(
            "Session ended in {} ({}) with {} nodes",
            session.pwd().trim_end(),
            session.current(),
            session.tree().len()
        );
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: ConfigCreationError },
    #[snafu(display("Failed to read the command script: {}", file_path))]
    ScriptError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Critical failure encountered while running commands"))]
    ShellError { source: ShellError },
}
