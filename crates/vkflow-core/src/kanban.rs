//! Blocking client for the Vibe Kanban HTTP API.
//!
//! Every endpoint answers with an envelope `{ success, data, message }`.
//! Transport errors, non-2xx statuses and `success: false` all surface as
//! errors; `data` is returned to the caller.

use crate::error::{Result, VkflowError};
use reqwest::blocking::Client;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_repo_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub status: String,
}

impl NewTask {
    pub fn todo(project_id: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            project_id: project_id.to_string(),
            title: title.into(),
            description: description.into(),
            status: "todo".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub tag_name: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagAction {
    Created,
    Updated,
    Skipped,
}

impl TagAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagAction::Created => "created",
            TagAction::Updated => "updated",
            TagAction::Skipped => "skipped",
        }
    }
}

// ---------------------------------------------------------------------------
// TaskBackend
// ---------------------------------------------------------------------------

/// Task listing and creation, the two calls an import needs.
pub trait TaskBackend {
    fn list_tasks(&self, project_id: &str) -> Result<Vec<RemoteTask>>;
    fn create_task(&self, task: &NewTask) -> Result<RemoteTask>;
}

pub fn validate_project_id(project_id: &str) -> Result<()> {
    uuid::Uuid::parse_str(project_id)
        .map(|_| ())
        .map_err(|_| VkflowError::InvalidProjectId(project_id.to_string()))
}

// ---------------------------------------------------------------------------
// KanbanClient
// ---------------------------------------------------------------------------

pub struct KanbanClient {
    base_url: String,
    http: Client,
}

impl KanbanClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self
            .request::<Vec<Project>>(Method::GET, "/api/projects", &[], None)?
            .unwrap_or_default())
    }

    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        Ok(self
            .request::<Vec<Tag>>(Method::GET, "/api/tags", &[], None)?
            .unwrap_or_default())
    }

    pub fn create_tag(&self, tag_name: &str, content: &str) -> Result<Tag> {
        let body = serde_json::json!({ "tag_name": tag_name, "content": content });
        tracing::info!(tag = tag_name, "creating tag");
        self.request(Method::POST, "/api/tags", &[], Some(&body))?
            .ok_or_else(|| missing_data("POST /api/tags"))
    }

    pub fn update_tag(&self, tag_id: &str, tag_name: &str, content: &str) -> Result<Tag> {
        let body = serde_json::json!({ "tag_name": tag_name, "content": content });
        let path = format!("/api/tags/{tag_id}");
        tracing::info!(tag = tag_name, id = tag_id, "updating tag");
        self.request(Method::PUT, &path, &[], Some(&body))?
            .ok_or_else(|| missing_data(&format!("PUT {path}")))
    }

    /// Create `tag_name`, or overwrite its content when it already exists
    /// and `overwrite` is set.
    pub fn upsert_tag(&self, tag_name: &str, content: &str, overwrite: bool) -> Result<TagAction> {
        let tags = self.list_tags()?;
        match tags.iter().find(|t| t.tag_name == tag_name) {
            None => {
                self.create_tag(tag_name, content)?;
                Ok(TagAction::Created)
            }
            Some(_) if !overwrite => Ok(TagAction::Skipped),
            Some(existing) => {
                self.update_tag(&existing.id, tag_name, content)?;
                Ok(TagAction::Updated)
            }
        }
    }

    fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Option<T>> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "VK API request");

        let mut req = self
            .http
            .request(method, &url)
            .header("Accept", "application/json");
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send()?;
        let status = res.status();
        let text = res.text()?;

        let json: Value = serde_json::from_str(&text).map_err(|_| {
            let snippet: String = text.chars().take(200).collect();
            VkflowError::Api(format!("response was not JSON ({status}): {snippet}"))
        })?;

        if !status.is_success() {
            return Err(VkflowError::Api(
                envelope_message(&json).unwrap_or_else(|| status.to_string()),
            ));
        }
        if json.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(VkflowError::Api(
                envelope_message(&json).unwrap_or_else(|| "Unknown VK API error".to_string()),
            ));
        }

        match json.get("data") {
            None | Some(Value::Null) => Ok(None),
            Some(data) => Ok(Some(serde_json::from_value(data.clone())?)),
        }
    }
}

impl TaskBackend for KanbanClient {
    fn list_tasks(&self, project_id: &str) -> Result<Vec<RemoteTask>> {
        validate_project_id(project_id)?;
        Ok(self
            .request::<Vec<RemoteTask>>(Method::GET, "/api/tasks", &[("project_id", project_id)], None)?
            .unwrap_or_default())
    }

    fn create_task(&self, task: &NewTask) -> Result<RemoteTask> {
        validate_project_id(&task.project_id)?;
        let body = serde_json::to_value(task)?;
        tracing::info!(title = %task.title, project = %task.project_id, "creating task");
        self.request(Method::POST, "/api/tasks", &[], Some(&body))?
            .ok_or_else(|| missing_data("POST /api/tasks"))
    }
}

fn envelope_message(json: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|k| json.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

fn missing_data(call: &str) -> VkflowError {
    VkflowError::Api(format!("{call} returned no data"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
