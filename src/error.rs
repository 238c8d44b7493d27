use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotInitialized,
    MissingApiKey,
    DuplicateName,
    ProjectNotFound,
    TaskNotFound,
    AmbiguousRef,
    HasActiveTasks,
    InvalidIntent,
    CollaboratorUnavailable,
    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::MissingApiKey => "MISSING_API_KEY",
            Self::DuplicateName => "DUPLICATE_NAME",
            Self::ProjectNotFound => "PROJECT_NOT_FOUND",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::AmbiguousRef => "AMBIGUOUS_REF",
            Self::HasActiveTasks => "HAS_ACTIVE_TASKS",
            Self::InvalidIntent => "INVALID_INTENT",
            Self::CollaboratorUnavailable => "COLLABORATOR_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct TaskpilotError {
    pub code: ErrorCode,
    pub message: String,
}

impl TaskpilotError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_initialized() -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            "taskpilot is not initialized here. Run `taskpilot init` first.",
        )
    }

    pub fn missing_api_key() -> Self {
        Self::new(
            ErrorCode::MissingApiKey,
            "No API key. Set GEMINI_API_KEY or put \"api_key\" in .taskpilot/config.json.",
        )
    }

    pub fn duplicate_name(name: &str) -> Self {
        Self::new(
            ErrorCode::DuplicateName,
            format!("Project '{name}' already exists"),
        )
    }

    pub fn project_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::ProjectNotFound,
            format!("Project not found: {reference}"),
        )
    }

    pub fn task_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::TaskNotFound,
            format!("Task not found: {reference}"),
        )
    }

    pub fn ambiguous_ref(reference: &str, candidates: &[String]) -> Self {
        Self::new(
            ErrorCode::AmbiguousRef,
            format!(
                "Ambiguous reference '{}'. Candidates: {}",
                reference,
                candidates.join(", ")
            ),
        )
    }

    pub fn has_active_tasks(name: &str, count: i64) -> Self {
        Self::new(
            ErrorCode::HasActiveTasks,
            format!("Project '{name}' still has {count} task(s). Delete them first."),
        )
    }

    pub fn invalid_intent(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidIntent, message)
    }

    pub fn collaborator_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CollaboratorUnavailable, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }
}

impl From<rusqlite::Error> for TaskpilotError {
    fn from(e: rusqlite::Error) -> Self {
        Self::database(e.to_string())
    }
}
