use crate::config::{validate_provider, DEFAULT_TIMEOUT_SECONDS};
use crate::core::ConfigProvider;
use crate::utils::error::{Result, SecGroupError};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: ApiConfig,
    pub security_group: SecurityGroupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub endpoint: String,
    pub access_token: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub skip_tls_verify: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityGroupConfig {
    pub name: String,
    pub address: String,
    pub ports: String,
    pub description: Option<String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SecGroupError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SecGroupError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CF_ACCESS_TOKEN})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        &self.api.endpoint
    }

    fn group_name(&self) -> &str {
        &self.security_group.name
    }

    fn address(&self) -> &str {
        &self.security_group.address
    }

    fn ports(&self) -> &str {
        &self.security_group.ports
    }

    fn description(&self) -> Option<&str> {
        self.security_group.description.as_deref()
    }

    fn access_token(&self) -> Option<&str> {
        self.api.access_token.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn skip_tls_verify(&self) -> bool {
        self.api.skip_tls_verify.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;

        // 變數沒被替換代表環境沒設定
        if let Some(token) = &self.api.access_token {
            if env_var_pattern().is_match(token) {
                return Err(SecGroupError::InvalidConfigValueError {
                    field: "api.access_token".to_string(),
                    value: "<redacted>".to_string(),
                    reason: "environment variable is not set".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[api]
endpoint = "https://api.example.com"
timeout_seconds = 10

[security_group]
name = "credhub-internal"
address = "10.0.0.5"
ports = "8844"
description = "CredHub service access"
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.api_endpoint(), "https://api.example.com");
        assert_eq!(config.group_name(), "credhub-internal");
        assert_eq!(config.timeout_seconds(), 10);
        assert!(!config.skip_tls_verify());
        assert!(config.access_token().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CC_SECGROUP_TEST_TOKEN", "token-from-env");

        let config = TomlConfig::from_toml_str(
            r#"
[api]
endpoint = "https://api.example.com"
access_token = "${CC_SECGROUP_TEST_TOKEN}"

[security_group]
name = "g"
address = "10.0.0.5"
ports = "443"
"#,
        )
        .unwrap();
        assert_eq!(config.access_token(), Some("token-from-env"));
        assert_eq!(config.timeout_seconds(), DEFAULT_TIMEOUT_SECONDS);

        std::env::remove_var("CC_SECGROUP_TEST_TOKEN");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
endpoint = "https://api.example.com"
access_token = "${CC_SECGROUP_SURELY_UNSET_VAR}"

[security_group]
name = "g"
address = "10.0.0.5"
ports = "443"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(&BASIC.replace("8844", "99999")).unwrap();
        assert!(config.validate().is_err());

        let config =
            TomlConfig::from_toml_str(&BASIC.replace("https://api.example.com", "invalid-url"))
                .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_table_is_parse_error() {
        let err = TomlConfig::from_toml_str("[api]\nendpoint = \"https://x\"\n").unwrap_err();
        assert!(matches!(err, SecGroupError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.address(), "10.0.0.5");
    }
}
