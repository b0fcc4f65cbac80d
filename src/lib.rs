pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};

pub use adapters::CloudControllerClient;
pub use app::{execute, Action, ActionResult};
pub use config::toml_config::TomlConfig;
pub use crate::core::builder::SecurityGroupBuilder;
pub use domain::model::{ApplyOutcome, Lifecycle, SecurityGroup};
pub use domain::ports::{ConfigProvider, SecurityGroupApi};
pub use utils::error::{Result, SecGroupError};
