//! Maps a validated intent to storage calls and a user-facing outcome.
//!
//! Reference resolution happens first; a reference that does not resolve
//! stops the command before any write. Each intent performs at most one
//! logical mutation.

use rusqlite::Connection;

use crate::collaborator::{context, Collaborator};
use crate::db::{project_repo, task_repo};
use crate::error::TaskpilotError;
use crate::intent::{EntityRef, Intent, IntentEnvelope};
use crate::models::{Priority, Project, Task};

#[derive(Debug)]
pub enum Outcome {
    ProjectCreated {
        project: Project,
        reply: Option<String>,
    },
    TaskCreated {
        task: Task,
        project: Project,
        /// due_date was present but not parseable as YYYY-MM-DD.
        due_warning: bool,
        reply: Option<String>,
    },
    TaskDeleted {
        task: Task,
        reply: Option<String>,
    },
    TaskCompleted {
        task: Task,
        reply: Option<String>,
    },
    TaskList {
        tasks: Vec<Task>,
        project: Option<Project>,
    },
    Recommendation {
        ranked: Vec<Task>,
        text: String,
    },
    Discussion {
        text: String,
    },
    Clarification {
        raw_text: String,
    },
}

pub fn execute(
    conn: &Connection,
    collaborator: &dyn Collaborator,
    envelope: IntentEnvelope,
) -> Result<Outcome, TaskpilotError> {
    let reply = envelope.reply;
    match envelope.intent {
        Intent::CreateProject { name, description } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(TaskpilotError::invalid_intent("Project name is empty"));
            }
            let project = project_repo::create_project(conn, name, description.as_deref())?;
            Ok(Outcome::ProjectCreated { project, reply })
        }

        Intent::CreateTask {
            project,
            title,
            description,
            priority,
            due_date,
        } => {
            let project = project_repo::resolve_project(conn, &project)?;
            let title = title.trim();
            if title.is_empty() {
                return Err(TaskpilotError::invalid_intent("Task title is empty"));
            }
            let due_warning = due_date
                .as_deref()
                .is_some_and(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").is_err());
            let task = task_repo::create_task(
                conn,
                project.id,
                title,
                description.as_deref(),
                priority.unwrap_or(Priority::Medium),
                due_date.as_deref(),
            )?;
            Ok(Outcome::TaskCreated {
                task,
                project,
                due_warning,
                reply,
            })
        }

        Intent::DeleteTask { task, project } => {
            let task = resolve_scoped_task(conn, &task, project.as_ref())?;
            task_repo::delete_task(conn, task.id)?;
            Ok(Outcome::TaskDeleted { task, reply })
        }

        Intent::CompleteTask { task, project } => {
            let task = resolve_scoped_task(conn, &task, project.as_ref())?;
            let task =
                task_repo::update_task_status(conn, task.id, crate::models::TaskStatus::Completed)?;
            Ok(Outcome::TaskCompleted { task, reply })
        }

        Intent::ListTasks { project, status } => {
            let project = project
                .map(|p| project_repo::resolve_project(conn, &p))
                .transpose()?;
            let tasks = task_repo::list_tasks(conn, project.as_ref().map(|p| p.id), status)?;
            Ok(Outcome::TaskList { tasks, project })
        }

        Intent::Recommend { project } => {
            let project = project
                .map(|p| project_repo::resolve_project(conn, &p))
                .transpose()?;
            let open = task_repo::open_tasks(conn, project.as_ref().map(|p| p.id))?;
            if open.is_empty() {
                return Ok(Outcome::Recommendation {
                    ranked: Vec::new(),
                    text: "No open tasks. Nothing to recommend.".into(),
                });
            }
            let ranked = rank_tasks(open);
            let with_names: Vec<(Task, String)> = ranked
                .iter()
                .map(|t| {
                    let name = project_repo::get_project_by_id(conn, t.project_id)
                        .map(|p| p.name)
                        .unwrap_or_else(|_| format!("project #{}", t.project_id));
                    (t.clone(), name)
                })
                .collect();
            let text = collaborator.compose(&context::recommend_prompt(&with_names))?;
            let text = if text.trim().is_empty() {
                // The collaborator returned nothing; the ranking stands on
                // its own.
                format!("Start with '{}'.", ranked[0].title)
            } else {
                text
            };
            Ok(Outcome::Recommendation { ranked, text })
        }

        Intent::Discuss {
            project,
            task,
            topic,
        } => {
            let project = project
                .map(|p| project_repo::resolve_project(conn, &p))
                .transpose()?;
            let task = task
                .map(|t| task_repo::resolve_task(conn, &t, project.as_ref().map(|p| p.id)))
                .transpose()?;
            let focus = match (&project, &task) {
                (_, Some(t)) => Some(format!("task '{}'", t.title)),
                (Some(p), None) => Some(format!("project '{}'", p.name)),
                (None, None) => None,
            };
            let state = context::snapshot_payload(&task_repo::snapshot(conn)?);
            let text =
                collaborator.compose(&context::discuss_prompt(&state, topic.as_deref(), focus.as_deref()))?;
            let text = if text.trim().is_empty() {
                "Nothing to add right now.".into()
            } else {
                text
            };
            Ok(Outcome::Discussion { text })
        }

        Intent::Unrecognized { raw_text } => Ok(Outcome::Clarification { raw_text }),
    }
}

fn resolve_scoped_task(
    conn: &Connection,
    task: &EntityRef,
    project: Option<&EntityRef>,
) -> Result<Task, TaskpilotError> {
    let scope = project
        .map(|p| project_repo::resolve_project(conn, p))
        .transpose()?
        .map(|p| p.id);
    task_repo::resolve_task(conn, task, scope)
}

/// Recommendation order: priority descending, due date ascending with
/// undated (or unparseable) tasks last, then creation order. Deterministic
/// and independent of the collaborator.
pub fn rank_tasks(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| match (a.due(), b.due()) {
                (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
            .then_with(|| a.id.cmp(&b.id))
    });
    tasks
}
