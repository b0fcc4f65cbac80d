#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::{ConfigProvider, SecurityGroup};
use crate::utils::error::Result;
use crate::utils::validation::{
    normalize_ports, validate_non_empty_string, validate_ports, validate_range, validate_url,
};

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// 所有設定來源共用的檢查
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_url("api_endpoint", config.api_endpoint())?;
    validate_non_empty_string("name", config.group_name())?;
    validate_non_empty_string("address", config.address())?;
    validate_ports("ports", config.ports())?;
    validate_range("timeout_seconds", config.timeout_seconds(), 1, 3600)?;
    Ok(())
}

pub fn security_group_from<C: ConfigProvider>(config: &C) -> SecurityGroup {
    let group = SecurityGroup::new(
        config.group_name().trim(),
        config.address().trim(),
        normalize_ports(config.ports()),
    );
    match config.description() {
        Some(description) if !description.trim().is_empty() => {
            group.with_description(description.trim())
        }
        _ => group,
    }
}
