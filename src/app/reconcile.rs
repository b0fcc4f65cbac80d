use crate::adapters::CloudControllerClient;
use crate::config::security_group_from;
use crate::core::builder::SecurityGroupBuilder;
use crate::core::{ApplyOutcome, ConfigProvider, Result};
use crate::utils::validation::{validate_guid, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Apply,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Applied(ApplyOutcome),
    Removed,
}

/// 檢查設定、建立 client，然後執行一次 apply 或 remove
pub async fn execute<C>(config: &C, action: Action, group_id: Option<&str>) -> Result<ActionResult>
where
    C: ConfigProvider + Validate,
{
    config.validate()?;
    if let Some(guid) = group_id.filter(|g| !g.is_empty()) {
        validate_guid("group_id", guid)?;
    }

    let api = CloudControllerClient::from_config(config)?;
    let group = security_group_from(config);
    tracing::info!(
        "Using API endpoint {} for security group {}",
        api.endpoint(),
        group.name
    );

    let mut builder = SecurityGroupBuilder::new(api, group);
    if let Some(guid) = group_id {
        builder = builder.with_group_id(guid);
    }

    match action {
        Action::Apply => builder.apply().await.map(ActionResult::Applied),
        Action::Remove => builder.remove().await.map(|_| ActionResult::Removed),
    }
}
