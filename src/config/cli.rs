use crate::config::toml_config::TomlConfig;
use crate::config::{validate_provider, DEFAULT_TIMEOUT_SECONDS};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_required_field, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "cc-secgroup")]
#[command(about = "Create, bind or remove a platform security group")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "TOML config file; flags override its values")]
    pub config: Option<String>,

    #[arg(long, global = true, env = "CF_API_ENDPOINT")]
    pub api_endpoint: Option<String>,

    #[arg(long, global = true, env = "CF_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    #[arg(long, global = true, help = "Security group name")]
    pub name: Option<String>,

    #[arg(long, global = true, help = "Destination address or CIDR of the rule")]
    pub address: Option<String>,

    #[arg(long, global = true, help = "Ports of the rule, e.g. 443 or 8080-8090")]
    pub ports: Option<String>,

    #[arg(long, global = true)]
    pub description: Option<String>,

    #[arg(long, global = true, help = "Known GUID of the group, skips the name lookup")]
    pub group_id: Option<String>,

    #[arg(long, global = true, help = "Per-request timeout (default 30)")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, global = true)]
    pub skip_tls_verify: bool,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create or update the group and bind it to staging and running
    Apply,
    /// Delete the group if it exists
    Remove,
}

impl CliConfig {
    /// 命令列有給的值覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(endpoint) = &self.api_endpoint {
            config.api.endpoint = endpoint.clone();
        }
        if let Some(token) = &self.access_token {
            config.api.access_token = Some(token.clone());
        }
        if let Some(name) = &self.name {
            config.security_group.name = name.clone();
        }
        if let Some(address) = &self.address {
            config.security_group.address = address.clone();
        }
        if let Some(ports) = &self.ports {
            config.security_group.ports = ports.clone();
        }
        if let Some(description) = &self.description {
            config.security_group.description = Some(description.clone());
        }
        if let Some(timeout) = self.timeout_seconds {
            config.api.timeout_seconds = Some(timeout);
        }
        if self.skip_tls_verify {
            config.api.skip_tls_verify = Some(true);
        }
    }
}

impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        self.api_endpoint.as_deref().unwrap_or_default()
    }

    fn group_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    fn address(&self) -> &str {
        self.address.as_deref().unwrap_or_default()
    }

    fn ports(&self) -> &str {
        self.ports.as_deref().unwrap_or_default()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn skip_tls_verify(&self) -> bool {
        self.skip_tls_verify
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_required_field("api_endpoint", &self.api_endpoint)?;
        validate_required_field("name", &self.name)?;
        validate_required_field("address", &self.address)?;
        validate_required_field("ports", &self.ports)?;
        validate_provider(self)
    }
}
