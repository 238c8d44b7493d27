pub mod json;
pub mod text;

use crate::executor::Outcome;

/// One-line confirmation for a mutating outcome: the collaborator's reply
/// when it sent one, otherwise a deterministic line.
pub fn headline(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::ProjectCreated { project, reply } => Some(reply.clone().unwrap_or_else(|| {
            format!("Created project '{}' (#{})", project.name, project.id)
        })),
        Outcome::TaskCreated {
            task,
            project,
            reply,
            ..
        } => Some(reply.clone().unwrap_or_else(|| {
            format!(
                "Added task '{}' (#{}) to {}",
                task.title, task.id, project.name
            )
        })),
        Outcome::TaskDeleted { task, reply } => Some(
            reply
                .clone()
                .unwrap_or_else(|| format!("Deleted task '{}' (#{})", task.title, task.id)),
        ),
        Outcome::TaskCompleted { task, reply } => Some(
            reply
                .clone()
                .unwrap_or_else(|| format!("Completed task '{}' (#{})", task.title, task.id)),
        ),
        _ => None,
    }
}
