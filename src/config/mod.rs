mod navigator_config;

pub use navigator_config::{ConfigCreationError, NavigatorConfig, SeedEntry};
