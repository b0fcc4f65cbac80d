use crate::core::{ApplyOutcome, Lifecycle, Result, SecurityGroup, SecurityGroupApi};

/// 將期望的 security group 套用到 control plane，或將其移除。
///
/// GUID 在每次操作開始時解析一次 (除非已透過 [`with_group_id`] 指定)，
/// 之後的請求都使用同一個值。
///
/// [`with_group_id`]: SecurityGroupBuilder::with_group_id
pub struct SecurityGroupBuilder<A: SecurityGroupApi> {
    api: A,
    group: SecurityGroup,
    group_id_override: Option<String>,
}

impl<A: SecurityGroupApi> SecurityGroupBuilder<A> {
    pub fn new(api: A, group: SecurityGroup) -> Self {
        Self {
            api,
            group,
            group_id_override: None,
        }
    }

    /// 已知 GUID 時跳過名稱查詢；空字串代表「已知不存在」
    pub fn with_group_id(mut self, guid: impl Into<String>) -> Self {
        self.group_id_override = Some(guid.into());
        self
    }

    pub fn group(&self) -> &SecurityGroup {
        &self.group
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn group_id(&self) -> Result<Option<String>> {
        if let Some(guid) = &self.group_id_override {
            return Ok(Some(guid.clone()).filter(|g| !g.is_empty()));
        }

        tracing::debug!("🔍 Looking up security group {}", self.group.name);
        self.api.find_group(&self.group.name).await
    }

    pub async fn apply(&self) -> Result<ApplyOutcome> {
        let definition = self.group.definition();

        let outcome = match self.group_id().await? {
            None => {
                tracing::info!("➕ Creating security group {}", self.group.name);
                let guid = self.api.create_group(&definition).await?;
                ApplyOutcome {
                    guid,
                    created: true,
                }
            }
            Some(existing) => {
                tracing::info!(
                    "♻️ Updating security group {} ({})",
                    self.group.name,
                    existing
                );
                let guid = self.api.update_group(&existing, &definition).await?;
                ApplyOutcome {
                    guid,
                    created: false,
                }
            }
        };

        for lifecycle in Lifecycle::ALL {
            tracing::debug!(
                "🔗 Binding security group {} to {}",
                outcome.guid,
                lifecycle
            );
            self.api.bind_group(lifecycle, &outcome.guid).await?;
        }

        tracing::info!(
            "✅ Security group {} ({}) bound to staging and running",
            self.group.name,
            outcome.guid
        );
        Ok(outcome)
    }

    pub async fn remove(&self) -> Result<()> {
        match self.group_id().await? {
            None => {
                tracing::info!(
                    "Security group {} does not exist, nothing to remove",
                    self.group.name
                );
                Ok(())
            }
            Some(guid) => {
                tracing::info!("🗑️ Removing security group {} ({})", self.group.name, guid);
                self.api.delete_group(&guid).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SecurityGroupDefinition;
    use crate::utils::error::SecGroupError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Find(String),
        Create(String),
        Update(String),
        Bind(Lifecycle, String),
        Delete(String),
    }

    /// 以名稱為 key 的記憶體版 control plane
    #[derive(Clone, Default)]
    struct FakeApi {
        groups: Arc<Mutex<HashMap<String, String>>>,
        bindings: Arc<Mutex<Vec<(Lifecycle, String)>>>,
        calls: Arc<Mutex<Vec<Call>>>,
        fail_bind: bool,
    }

    impl FakeApi {
        async fn with_group(name: &str, guid: &str) -> Self {
            let api = Self::default();
            api.groups
                .lock()
                .await
                .insert(name.to_string(), guid.to_string());
            api
        }

        async fn calls(&self) -> Vec<Call> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl SecurityGroupApi for FakeApi {
        async fn find_group(&self, name: &str) -> Result<Option<String>> {
            self.calls.lock().await.push(Call::Find(name.to_string()));
            Ok(self.groups.lock().await.get(name).cloned())
        }

        async fn create_group(&self, definition: &SecurityGroupDefinition) -> Result<String> {
            self.calls
                .lock()
                .await
                .push(Call::Create(definition.name.clone()));
            let guid = format!("guid-{}", definition.name);
            self.groups
                .lock()
                .await
                .insert(definition.name.clone(), guid.clone());
            Ok(guid)
        }

        async fn update_group(
            &self,
            guid: &str,
            _definition: &SecurityGroupDefinition,
        ) -> Result<String> {
            self.calls.lock().await.push(Call::Update(guid.to_string()));
            Ok(guid.to_string())
        }

        async fn bind_group(&self, lifecycle: Lifecycle, guid: &str) -> Result<()> {
            self.calls
                .lock()
                .await
                .push(Call::Bind(lifecycle, guid.to_string()));
            if self.fail_bind {
                return Err(SecGroupError::UnexpectedStatus {
                    method: "PUT".to_string(),
                    url: format!("/v2/config/{}/{}", lifecycle.path_segment(), guid),
                    status: 500,
                    body: String::new(),
                });
            }
            let mut bindings = self.bindings.lock().await;
            if !bindings.contains(&(lifecycle, guid.to_string())) {
                bindings.push((lifecycle, guid.to_string()));
            }
            Ok(())
        }

        async fn delete_group(&self, guid: &str) -> Result<()> {
            self.calls.lock().await.push(Call::Delete(guid.to_string()));
            self.groups.lock().await.retain(|_, g| g != guid);
            Ok(())
        }
    }

    fn group(name: &str) -> SecurityGroup {
        SecurityGroup::new(name, "10.0.0.5", "8844")
    }

    #[tokio::test]
    async fn test_apply_creates_missing_group_and_binds_both_lifecycles() {
        let api = FakeApi::default();
        let builder = SecurityGroupBuilder::new(api.clone(), group("new-security-group"));

        let outcome = builder.apply().await.unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.guid, "guid-new-security-group");
        assert_eq!(
            api.calls().await,
            vec![
                Call::Find("new-security-group".to_string()),
                Call::Create("new-security-group".to_string()),
                Call::Bind(Lifecycle::Staging, outcome.guid.clone()),
                Call::Bind(Lifecycle::Running, outcome.guid.clone()),
            ]
        );
    }

    #[tokio::test]
    async fn test_apply_updates_existing_group() {
        let api = FakeApi::with_group("existing-security-group", "existing-guid").await;
        let builder = SecurityGroupBuilder::new(api.clone(), group("existing-security-group"));

        let outcome = builder.apply().await.unwrap();

        assert!(!outcome.created);
        assert_eq!(outcome.guid, "existing-guid");
        let calls = api.calls().await;
        assert!(calls.contains(&Call::Update("existing-guid".to_string())));
        assert!(!calls.iter().any(|c| matches!(c, Call::Create(_))));
        assert!(calls.contains(&Call::Bind(Lifecycle::Staging, "existing-guid".to_string())));
        assert!(calls.contains(&Call::Bind(Lifecycle::Running, "existing-guid".to_string())));
    }

    #[tokio::test]
    async fn test_apply_twice_is_idempotent() {
        let api = FakeApi::default();
        let builder = SecurityGroupBuilder::new(api.clone(), group("repeat"));

        let first = builder.apply().await.unwrap();
        let bindings_after_first = api.bindings.lock().await.clone();
        let second = builder.apply().await.unwrap();

        assert_eq!(first.guid, second.guid);
        assert!(first.created);
        assert!(!second.created);
        assert_eq!(*api.bindings.lock().await, bindings_after_first);
        assert_eq!(api.groups.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_group_id_override_skips_lookup() {
        let api = FakeApi::default();
        let builder =
            SecurityGroupBuilder::new(api.clone(), group("known")).with_group_id("known-guid");

        let outcome = builder.apply().await.unwrap();

        assert_eq!(outcome.guid, "known-guid");
        assert!(!api
            .calls()
            .await
            .iter()
            .any(|c| matches!(c, Call::Find(_))));
    }

    #[tokio::test]
    async fn test_empty_group_id_override_means_absent() {
        let api = FakeApi::default();
        let builder = SecurityGroupBuilder::new(api.clone(), group("absent")).with_group_id("");

        assert_eq!(builder.group_id().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_bind_failure_is_propagated() {
        let api = FakeApi {
            fail_bind: true,
            ..FakeApi::default()
        };
        let builder = SecurityGroupBuilder::new(api.clone(), group("broken"));

        let err = builder.apply().await.unwrap_err();

        assert!(matches!(
            err,
            SecGroupError::UnexpectedStatus { status: 500, .. }
        ));
        // 第一次綁定失敗後不再繼續
        let binds = api
            .calls()
            .await
            .into_iter()
            .filter(|c| matches!(c, Call::Bind(..)))
            .count();
        assert_eq!(binds, 1);
    }

    #[tokio::test]
    async fn test_remove_without_group_makes_no_delete() {
        let api = FakeApi::default();
        let builder = SecurityGroupBuilder::new(api.clone(), group("missing"));

        builder.remove().await.unwrap();

        assert_eq!(api.calls().await, vec![Call::Find("missing".to_string())]);
    }

    #[tokio::test]
    async fn test_remove_deletes_existing_group() {
        let api = FakeApi::with_group("doomed", "some-group-to-be-removed").await;
        let builder = SecurityGroupBuilder::new(api.clone(), group("doomed"));

        builder.remove().await.unwrap();

        assert!(api
            .calls()
            .await
            .contains(&Call::Delete("some-group-to-be-removed".to_string())));
        assert!(api.groups.lock().await.is_empty());
    }
}
