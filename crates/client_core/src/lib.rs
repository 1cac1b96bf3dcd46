use anyhow::Result;
use reqwest::Client;
use shared::protocol::{BlogDetail, BlogSummary, ProjectSummary};

pub mod chat;
pub mod intent;
pub mod resolver;
pub mod store;

pub use chat::{ChatMessage, ChatSender, ChatSession, SendOutcome};
pub use resolver::{resolve, PageDescriptor};
pub use store::{NavigationRequest, NavigationStore};

/// Thin fetch wrappers over the content endpoints. These carry no decision
/// logic; pages consume them once the resolver has picked what to mount.
pub struct PortfolioClient {
    http: Client,
    server_url: String,
}

impl PortfolioClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.into(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub async fn fetch_projects(&self) -> Result<Vec<ProjectSummary>> {
        let res = self
            .http
            .get(format!("{}/api/projects", self.server_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn fetch_blogs(&self) -> Result<Vec<BlogSummary>> {
        let res = self
            .http
            .get(format!("{}/api/blogs", self.server_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn fetch_blog(&self, slug: &str) -> Result<BlogDetail> {
        let res = self
            .http
            .get(format!("{}/api/blogs/{}", self.server_url, slug))
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
