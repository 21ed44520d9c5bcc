use std::{borrow::Cow, path::Path, string::FromUtf8Error};

use clap::ValueEnum;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, warn};

use crate::application::data::ColorMode;
use crate::filesystem::{CURRENT_SEGMENT, FsTree, HOME_SEGMENT, NodeId, PARENT_SEGMENT};

pub const DEFAULT_ROOT_NAME: &str = "home";

const ROOT_KEY: &str = "root";
const COLOR_KEY: &str = "color";
const TREE_KEY: &str = "tree";

fn key<'a>(name: &'static str) -> Yaml<'a> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

/// One node of the tree the session starts with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedEntry {
    File {
        name: String,
    },
    Directory {
        name: String,
        children: Vec<SeedEntry>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorConfig {
    pub root_name: String,
    pub color: Option<ColorMode>,
    pub tree: Vec<SeedEntry>,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            color: None,
            tree: Vec::new(),
        }
    }
}

impl NavigatorConfig {
    pub async fn read(path: &Path) -> Result<Self, ConfigCreationError> {
        debug!("Reading config file: {}", path.display());
        let bytes = compio::fs::read(path).await.context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;
        debug!("Successfully read config file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.display().to_string(),
        })?;
        contents.as_str().try_into()
    }

    /// Builds the starting tree. Entries that cannot be added are skipped with a warning.
    pub fn build_tree(&self) -> FsTree {
        let mut tree = FsTree::new(self.root_name.as_str());
        let root = tree.root();
        Self::seed(&mut tree, root, &self.tree);
        debug!("Seeded tree with {} nodes", tree.len());
        tree
    }

    fn seed(tree: &mut FsTree, dir: NodeId, entries: &[SeedEntry]) {
        for entry in entries {
            match entry {
                SeedEntry::File { name } => {
                    if let Err(e) = tree.add_file(dir, name) {
                        warn!("Skipping seed file '{}': {}", name, e);
                    }
                }
                SeedEntry::Directory { name, children } => match tree.add_directory(dir, name) {
                    Ok(id) => Self::seed(tree, id, children),
                    Err(e) => warn!("Skipping seed directory '{}': {}", name, e),
                },
            }
        }
    }

    fn parse_entries(
        mapping: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<Vec<SeedEntry>, ConfigCreationError> {
        mapping
            .iter()
            .filter_map(|(key, value)| match key {
                Yaml::Value(Scalar::String(name)) => Some((name, value)),
                _ => {
                    debug!("Skipping tree entry with a non-string name: {:?}", key);
                    None
                }
            })
            .map(|(name, value)| {
                let name = validate_name(name)?;
                Ok(match value {
                    Yaml::Mapping(children) => SeedEntry::Directory {
                        name,
                        children: Self::parse_entries(children)?,
                    },
                    _ => SeedEntry::File { name },
                })
            })
            .collect()
    }
}

fn validate_name(name: &str) -> Result<String, ConfigCreationError> {
    let reserved = [CURRENT_SEGMENT, PARENT_SEGMENT, HOME_SEGMENT].contains(&name);
    if name.is_empty() || reserved || name.contains('/') || name.contains(char::is_whitespace) {
        return InvalidEntryNameSnafu { name }.fail();
    }
    Ok(name.to_string())
}

impl TryFrom<&str> for NavigatorConfig {
    type Error = ConfigCreationError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents
            .first()
            .ok_or(ConfigCreationError::MalformedConfig)?;
        let top_level = document
            .as_mapping()
            .ok_or(ConfigCreationError::TopLevelNotMap)?;

        for (name, _) in top_level {
            if ![key(ROOT_KEY), key(COLOR_KEY), key(TREE_KEY)].contains(name) {
                debug!("Ignoring unknown config key: {:?}", name);
            }
        }

        let root_name = match top_level.get(&key(ROOT_KEY)) {
            None => DEFAULT_ROOT_NAME.to_string(),
            Some(value) => {
                let name = value.as_str().context(InvalidRootNameSnafu {
                    name: format!("{:?}", value),
                })?;
                validate_name(name).map_err(|_| ConfigCreationError::InvalidRootName {
                    name: name.to_string(),
                })?
            }
        };

        let color = top_level
            .get(&key(COLOR_KEY))
            .map(|value| {
                let mode = value.as_str().unwrap_or_default();
                ColorMode::from_str(mode, true).map_err(|_| ConfigCreationError::InvalidColor {
                    value: format!("{:?}", value),
                })
            })
            .transpose()?;

        let tree = match top_level.get(&key(TREE_KEY)) {
            None => Vec::new(),
            Some(value) => {
                let mapping = value
                    .as_mapping()
                    .ok_or(ConfigCreationError::TreeNotMap)?;
                Self::parse_entries(mapping)?
            }
        };

        Ok(NavigatorConfig {
            root_name,
            color,
            tree,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum ConfigCreationError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Config file is not valid UTF-8: {}", file_path))]
    EncodingError {
        file_path: String,
        source: FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted config file"))]
    MalformedConfig,
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Tree section should be a map"))]
    TreeNotMap,
    #[snafu(display("Root name {} is not a valid directory name", name))]
    InvalidRootName { name: String },
    #[snafu(display("'{}' is not a valid entry name", name))]
    InvalidEntryName { name: String },
    #[snafu(display("Unknown color mode {}, expected auto, always or never", value))]
    InvalidColor { value: String },
}
