use thiserror::Error;

#[derive(Debug, Error)]
pub enum VkflowError {
    #[error("invalid change name '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidChangeName(String),

    #[error("invalid project id '{0}': expected a UUID")]
    InvalidProjectId(String),

    #[error("invalid task id '{0}': expected 12 lowercase hex characters")]
    InvalidTaskId(String),

    #[error("tasks file not found: {0}")]
    TasksFileNotFound(String),

    #[error("no tasks found in tasks.md; use the @vkflow_tasks_format layout")]
    NoTasks,

    #[error(
        "unable to determine Vibe Kanban backend URL: start Vibe Kanban, set VIBE_BACKEND_URL, or pass --vk-url"
    )]
    BackendUnresolved,

    #[error("VK API error: {0}")]
    Api(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(
        "import aborted while creating '{title}' ({created} created, {remaining} not attempted); re-running is safe: {source}"
    )]
    ImportAborted {
        title: String,
        created: usize,
        remaining: usize,
        #[source]
        source: Box<VkflowError>,
    },

    #[error("invalid tags manifest: {0}")]
    InvalidManifest(String),

    #[error("asset not found: {0}")]
    AssetNotFound(String),

    #[error("{0} not found on PATH")]
    ToolNotFound(String),

    #[error("{command} failed with exit code {code}")]
    ToolFailed { command: String, code: i32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VkflowError>;
