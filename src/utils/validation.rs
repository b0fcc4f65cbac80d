use crate::utils::error::{Result, SecGroupError};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SecGroupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SecGroupError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SecGroupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| SecGroupError::MissingConfigError {
            field: field_name.to_string(),
        })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SecGroupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(SecGroupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

fn guid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("valid guid pattern"))
}

/// GUID 會放進 URL 路徑，只接受單一安全片段 (不含 `/`、`?`、`#`，也不能是 `..`)
pub fn validate_guid(field_name: &str, guid: &str) -> Result<()> {
    if !guid_pattern().is_match(guid) {
        return Err(SecGroupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: guid.to_string(),
            reason: "GUID may only contain letters, digits, '.', '_' and '-'".to_string(),
        });
    }
    Ok(())
}

/// 與 [`validate_ports`] 相同的切分規則，去掉每段前後空白
pub fn normalize_ports(ports: &str) -> String {
    ports
        .split(',')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(",")
}

fn port_entry_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{1,5})(?:-(\d{1,5}))?$").expect("valid port pattern"))
}

/// 規則的 ports 欄位：逗號分隔的單一 port 或 `low-high` 範圍，例如 `443,8080-8090`
pub fn validate_ports(field_name: &str, ports: &str) -> Result<()> {
    validate_non_empty_string(field_name, ports)?;

    let invalid = |reason: String| SecGroupError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: ports.to_string(),
        reason,
    };

    for entry in ports.split(',').map(str::trim) {
        let caps = port_entry_pattern()
            .captures(entry)
            .ok_or_else(|| invalid(format!("'{}' is not a port or port range", entry)))?;

        let low: u32 = caps[1]
            .parse()
            .map_err(|_| invalid(format!("'{}' is not a number", &caps[1])))?;
        validate_range(field_name, low, 1, 65535)?;

        if let Some(high) = caps.get(2) {
            let high: u32 = high
                .as_str()
                .parse()
                .map_err(|_| invalid(format!("'{}' is not a number", high.as_str())))?;
            validate_range(field_name, high, 1, 65535)?;
            if high < low {
                return Err(invalid(format!("range {} is reversed", entry)));
            }
        }
    }

    Ok(())
}
