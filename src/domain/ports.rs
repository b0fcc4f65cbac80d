use crate::domain::model::{Lifecycle, SecurityGroupDefinition};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Control-plane 上 security group 的 CRUD 操作
#[async_trait]
pub trait SecurityGroupApi: Send + Sync {
    /// 以名稱精確比對查詢，找不到時回傳 `None`
    async fn find_group(&self, name: &str) -> Result<Option<String>>;

    async fn create_group(&self, definition: &SecurityGroupDefinition) -> Result<String>;

    async fn update_group(&self, guid: &str, definition: &SecurityGroupDefinition)
        -> Result<String>;

    async fn bind_group(&self, lifecycle: Lifecycle, guid: &str) -> Result<()>;

    /// 已不存在 (404) 也視為成功
    async fn delete_group(&self, guid: &str) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn group_name(&self) -> &str;
    fn address(&self) -> &str;
    fn ports(&self) -> &str;
    fn description(&self) -> Option<&str>;
    fn access_token(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
    fn skip_tls_verify(&self) -> bool;
}
