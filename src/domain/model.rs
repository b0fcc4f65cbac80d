use serde::{Deserialize, Serialize};
use std::fmt;

/// 規則固定使用的協定
pub const RULE_PROTOCOL: &str = "tcp";

/// 期望狀態：要建立或更新的 security group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityGroup {
    pub name: String,
    pub address: String,
    pub ports: String,
    pub description: Option<String>,
}

impl SecurityGroup {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        ports: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            ports: ports.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 建立 / 更新時送出的 body，規則集合只有一條 tcp 規則
    pub fn definition(&self) -> SecurityGroupDefinition {
        SecurityGroupDefinition {
            name: self.name.clone(),
            rules: vec![SecurityGroupRule {
                protocol: RULE_PROTOCOL.to_string(),
                destination: self.address.clone(),
                ports: Some(self.ports.clone()).filter(|p| !p.is_empty()),
                description: self.description.clone(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupRule {
    pub protocol: String,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ports: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupDefinition {
    pub name: String,
    pub rules: Vec<SecurityGroupRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Staging,
    Running,
}

impl Lifecycle {
    /// 綁定順序：先 staging 再 running
    pub const ALL: [Lifecycle; 2] = [Lifecycle::Staging, Lifecycle::Running];

    pub fn path_segment(&self) -> &'static str {
        match self {
            Lifecycle::Staging => "staging_security_groups",
            Lifecycle::Running => "running_security_groups",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Staging => write!(f, "staging"),
            Lifecycle::Running => write!(f, "running"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceMetadata {
    pub guid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Resource<E> {
    pub metadata: ResourceMetadata,
    pub entity: E,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceList<E> {
    #[serde(default = "Vec::new")]
    pub resources: Vec<Resource<E>>,
    #[serde(default)]
    pub next_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupEntity {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub guid: String,
    pub created: bool,
}
