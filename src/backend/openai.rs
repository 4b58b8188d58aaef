//! OpenAI assistants-API implementation of [`AssistantBackend`].

use async_trait::async_trait;
use serde::Deserialize;

use super::http::{assistant_headers, check, shared_client};
use super::{AssistantBackend, RemoteMessage, RemoteRun};
use crate::config::ZorvaConfig;
use crate::error::Result;
use crate::types::ToolOutput;

/// HTTP client for the OpenAI assistants API (v2).
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    api_key: String,
    assistant_id: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ThreadResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

impl OpenAiBackend {
    pub fn new(config: &ZorvaConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            assistant_id: config.assistant_id.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl AssistantBackend for OpenAiBackend {
    async fn create_thread(&self) -> Result<String> {
        let response = shared_client()
            .post(self.url("/threads"))
            .headers(assistant_headers(&self.api_key))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let thread: ThreadResponse = check(response).await?.json().await?;
        Ok(thread.id)
    }

    async fn create_message(&self, thread_id: &str, text: &str) -> Result<()> {
        let response = shared_client()
            .post(self.url(&format!("/threads/{thread_id}/messages")))
            .headers(assistant_headers(&self.api_key))
            .json(&serde_json::json!({ "role": "user", "content": text }))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn create_run(&self, thread_id: &str) -> Result<RemoteRun> {
        let response = shared_client()
            .post(self.url(&format!("/threads/{thread_id}/runs")))
            .headers(assistant_headers(&self.api_key))
            .json(&serde_json::json!({ "assistant_id": self.assistant_id }))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<RemoteRun> {
        let response = shared_client()
            .get(self.url(&format!("/threads/{thread_id}/runs/{run_id}")))
            .headers(assistant_headers(&self.api_key))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn list_runs(&self, thread_id: &str) -> Result<Vec<RemoteRun>> {
        let response = shared_client()
            .get(self.url(&format!("/threads/{thread_id}/runs")))
            .headers(assistant_headers(&self.api_key))
            .send()
            .await?;
        let list: ListResponse<RemoteRun> = check(response).await?.json().await?;
        Ok(list.data)
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<()> {
        let response = shared_client()
            .post(self.url(&format!("/threads/{thread_id}/runs/{run_id}/cancel")))
            .headers(assistant_headers(&self.api_key))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<()> {
        let response = shared_client()
            .post(self.url(&format!(
                "/threads/{thread_id}/runs/{run_id}/submit_tool_outputs"
            )))
            .headers(assistant_headers(&self.api_key))
            .json(&serde_json::json!({ "tool_outputs": outputs }))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn list_messages(&self, thread_id: &str, limit: u32) -> Result<Vec<RemoteMessage>> {
        let response = shared_client()
            .get(self.url(&format!("/threads/{thread_id}/messages")))
            .query(&[("limit", limit)])
            .headers(assistant_headers(&self.api_key))
            .send()
            .await?;
        let list: ListResponse<RemoteMessage> = check(response).await?.json().await?;
        Ok(list.data)
    }
}
