//! Prompt and context-payload assembly for the collaborator.
//!
//! The interpret prompt carries the full store snapshot so the model can
//! resolve names; the executor never trusts anything here, it only consumes
//! the decoded intent.

use serde_json::{json, Value};

use crate::models::{Project, Task};

/// Current store state as the collaborator sees it: active projects with
/// their non-completed tasks.
pub fn snapshot_payload(snapshot: &[(Project, Vec<Task>)]) -> Value {
    let projects: Vec<Value> = snapshot
        .iter()
        .map(|(project, tasks)| {
            json!({
                "id": project.id,
                "name": project.name,
                "description": project.description,
                "status": project.status.as_str(),
                "tasks": tasks.iter().map(task_line).collect::<Vec<_>>(),
            })
        })
        .collect();
    json!({ "projects": projects })
}

fn task_line(t: &Task) -> Value {
    json!({
        "id": t.id,
        "title": t.title,
        "description": t.description,
        "priority": t.priority.as_str(),
        "status": t.status.as_str(),
        "due_date": t.due_date,
    })
}

pub fn interpret_prompt(command: &str, state: &Value) -> String {
    format!(
        r#"You are a task management assistant. The user gives natural language
commands about managing projects and tasks.

Current database state:
{state}

Respond with ONLY a JSON object. The "intent" field selects the operation;
"reply" is an optional short confirmation to show the user on success.
Reference projects by exact name or id; reference tasks by exact title or id.

Intents:
- {{"intent": "create_project", "name": "...", "description": "...", "reply": "..."}}
- {{"intent": "create_task", "project": "name-or-id", "title": "...", "description": "...", "priority": "low|medium|high", "due_date": "YYYY-MM-DD", "reply": "..."}}
- {{"intent": "delete_task", "task": "title-or-id", "project": "name-or-id (optional)", "reply": "..."}}
- {{"intent": "complete_task", "task": "title-or-id", "project": "name-or-id (optional)", "reply": "..."}}
- {{"intent": "list_tasks", "project": "name-or-id (optional)", "status": "pending|in_progress|completed (optional)"}}
- {{"intent": "recommend", "project": "name-or-id (optional)"}}
- {{"intent": "discuss", "project": "name-or-id (optional)", "task": "title-or-id (optional)", "topic": "..."}}
- {{"intent": "unrecognized", "raw_text": "..."}} when the command is not about task management or cannot be mapped.

Examples:
User: "Create a project called Website Development"
{{"intent": "create_project", "name": "Website Development", "reply": "Created the 'Website Development' project for you!"}}

User: "Add a task UI design to the Website Development project"
{{"intent": "create_task", "project": "Website Development", "title": "UI design", "reply": "Added 'UI design' to Website Development!"}}

User: "What should I work on next?"
{{"intent": "recommend"}}

User input: {command}
"#
    )
}

/// Recommendation prompt: the ranked list is computed deterministically by
/// the executor; the model only phrases it.
pub fn recommend_prompt(ranked: &[(Task, String)]) -> String {
    let mut lines = String::new();
    for (i, (task, project)) in ranked.iter().enumerate() {
        let due = task.due_date.as_deref().unwrap_or("no due date");
        lines.push_str(&format!(
            "{}. '{}' in {} (priority {}, status {}, due {})\n",
            i + 1,
            task.title,
            project,
            task.priority.as_str(),
            task.status.as_str(),
            due
        ));
    }
    format!(
        "You are a task management assistant. The open tasks below are already \
ranked by urgency (1 = most urgent). Recommend what to work on next in two or \
three sentences of plain text. Do not reorder the list.\n\n{lines}"
    )
}

pub fn discuss_prompt(state: &Value, topic: Option<&str>, focus: Option<&str>) -> String {
    let mut prompt = format!(
        "You are a task management assistant having a short conversation about \
the user's projects and tasks.\n\nCurrent database state:\n{state}\n\n"
    );
    if let Some(focus) = focus {
        prompt.push_str(&format!("Focus on: {focus}\n"));
    }
    match topic {
        Some(topic) => prompt.push_str(&format!("The user wants to discuss: {topic}\n")),
        None => prompt.push_str("Give a brief overview of where things stand.\n"),
    }
    prompt.push_str("Answer in plain text, a short paragraph.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, ProjectStatus, TaskStatus};

    fn sample_task(id: i64, title: &str) -> Task {
        Task {
            id,
            project_id: 1,
            title: title.into(),
            description: None,
            priority: Priority::High,
            status: TaskStatus::Pending,
            created_date: "2024-01-01 00:00:00".into(),
            due_date: Some("2024-01-05".into()),
        }
    }

    #[test]
    fn payload_groups_tasks_under_projects() {
        let project = Project {
            id: 1,
            name: "Web".into(),
            description: None,
            created_date: "2024-01-01 00:00:00".into(),
            status: ProjectStatus::Active,
        };
        let payload = snapshot_payload(&[(project, vec![sample_task(1, "UI design")])]);
        assert_eq!(payload["projects"][0]["name"], "Web");
        assert_eq!(payload["projects"][0]["tasks"][0]["title"], "UI design");
        assert_eq!(payload["projects"][0]["tasks"][0]["priority"], "high");
    }

    #[test]
    fn recommend_prompt_keeps_rank_order() {
        let ranked = vec![
            (sample_task(2, "database setup"), "Web".to_string()),
            (sample_task(1, "UI design"), "Web".to_string()),
        ];
        let prompt = recommend_prompt(&ranked);
        let first = prompt.find("1. 'database setup'").unwrap();
        let second = prompt.find("2. 'UI design'").unwrap();
        assert!(first < second);
    }

    #[test]
    fn interpret_prompt_embeds_state_and_command() {
        let prompt = interpret_prompt("delete the UI design task", &json!({"projects": []}));
        assert!(prompt.contains("delete the UI design task"));
        assert!(prompt.contains("\"projects\""));
    }
}
