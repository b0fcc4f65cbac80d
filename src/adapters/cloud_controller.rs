use crate::domain::model::{
    GroupEntity, Lifecycle, Resource, ResourceList, SecurityGroupDefinition,
};
use crate::domain::ports::{ConfigProvider, SecurityGroupApi};
use crate::utils::error::{Result, SecGroupError};
use crate::utils::validation::{validate_guid, validate_url};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

const SECURITY_GROUPS_PATH: &str = "v2/security_groups";
const CONFIG_PATH: &str = "v2/config";

/// v2 Cloud Controller API 的 security group client
#[derive(Debug, Clone)]
pub struct CloudControllerClient {
    client: Client,
    endpoint: Url,
    access_token: Option<String>,
}

impl CloudControllerClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_client(endpoint, Client::new())
    }

    pub fn with_client(endpoint: &str, client: Client) -> Result<Self> {
        validate_url("api_endpoint", endpoint)?;
        Ok(Self {
            client,
            endpoint: Url::parse(endpoint)?,
            access_token: None,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        if config.skip_tls_verify() {
            tracing::warn!("⚠️ TLS certificate verification is disabled");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .danger_accept_invalid_certs(config.skip_tls_verify())
            .build()?;

        let mut cc = Self::with_client(config.api_endpoint(), client)?;
        if let Some(token) = config.access_token() {
            cc = cc.with_access_token(token);
        }
        Ok(cc)
    }

    /// 接受 `cf oauth-token` 的輸出格式 (`bearer xxx`)
    pub fn with_access_token(mut self, token: &str) -> Self {
        let token = token.trim();
        let token = token
            .strip_prefix("bearer ")
            .or_else(|| token.strip_prefix("Bearer "))
            .unwrap_or(token);
        self.access_token = Some(token.to_string()).filter(|t| !t.is_empty());
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// API 路徑接在 endpoint 之後，保留 endpoint 本身的路徑前綴
    fn api_url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }
        let base = self.endpoint.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!(
            "{}/{}",
            base,
            path.trim_start_matches('/')
        ))?)
    }

    /// GUID 一律以單一路徑片段加入，不會被當成路徑解讀
    fn resource_url(&self, base: &str, segments: &[&str]) -> Result<Url> {
        for segment in segments {
            validate_guid("guid", segment)?;
        }

        let mut url = self.api_url(base)?;
        url.path_segments_mut()
            .map_err(|_| SecGroupError::InvalidConfigValueError {
                field: "api_endpoint".to_string(),
                value: self.endpoint.to_string(),
                reason: "URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: &Url,
        body: Option<&SecurityGroupDefinition>,
    ) -> Result<Response> {
        tracing::debug!("📡 {} {}", method, url);

        let mut request = self
            .client
            .request(method, url.clone())
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        tracing::debug!("📡 API response status: {}", response.status());
        Ok(response)
    }

    async fn ensure_success(method: Method, url: &Url, response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(SecGroupError::UnexpectedStatus {
            method: method.to_string(),
            url: url.to_string(),
            status,
            body,
        })
    }

    async fn parse_body<T: DeserializeOwned>(response: Response) -> Result<T> {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn write_group(
        &self,
        method: Method,
        url: Url,
        definition: &SecurityGroupDefinition,
    ) -> Result<String> {
        let response = self.send(method.clone(), &url, Some(definition)).await?;
        let response = Self::ensure_success(method, &url, response).await?;
        let resource: Resource<GroupEntity> = Self::parse_body(response).await?;
        Ok(resource.metadata.guid)
    }
}

#[async_trait]
impl SecurityGroupApi for CloudControllerClient {
    async fn find_group(&self, name: &str) -> Result<Option<String>> {
        let mut url = self.api_url(SECURITY_GROUPS_PATH)?;
        url.query_pairs_mut()
            .append_pair("q", &format!("name:{}", name));
        let mut visited = HashSet::new();

        loop {
            visited.insert(url.to_string());

            let response = self.send(Method::GET, &url, None).await?;
            let response = Self::ensure_success(Method::GET, &url, response).await?;
            let page: ResourceList<GroupEntity> = Self::parse_body(response).await?;

            // 查詢條件只是過濾，仍需自行比對完整名稱
            if let Some(found) = page.resources.iter().find(|r| r.entity.name == name) {
                tracing::debug!("Found security group {} ({})", name, found.metadata.guid);
                return Ok(Some(found.metadata.guid.clone()));
            }

            match page.next_url.as_deref().filter(|n| !n.is_empty()) {
                Some(next) => {
                    let next = self.api_url(next)?;
                    if visited.contains(next.as_str()) {
                        tracing::warn!("⚠️ Pagination loops back to {}, stopping lookup", next);
                        return Ok(None);
                    }
                    url = next;
                }
                None => return Ok(None),
            }
        }
    }

    async fn create_group(&self, definition: &SecurityGroupDefinition) -> Result<String> {
        let url = self.api_url(SECURITY_GROUPS_PATH)?;
        self.write_group(Method::POST, url, definition).await
    }

    async fn update_group(
        &self,
        guid: &str,
        definition: &SecurityGroupDefinition,
    ) -> Result<String> {
        let url = self.resource_url(SECURITY_GROUPS_PATH, &[guid])?;
        self.write_group(Method::PUT, url, definition).await
    }

    async fn bind_group(&self, lifecycle: Lifecycle, guid: &str) -> Result<()> {
        let base = format!("{}/{}", CONFIG_PATH, lifecycle.path_segment());
        let url = self.resource_url(&base, &[guid])?;
        let response = self.send(Method::PUT, &url, None).await?;
        Self::ensure_success(Method::PUT, &url, response).await?;
        Ok(())
    }

    async fn delete_group(&self, guid: &str) -> Result<()> {
        let url = self.resource_url(SECURITY_GROUPS_PATH, &[guid])?;
        let response = self.send(Method::DELETE, &url, None).await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("Security group {} already absent", guid);
            return Ok(());
        }
        Self::ensure_success(Method::DELETE, &url, response).await?;
        Ok(())
    }
}
