use serde_json::{json, Value};

use crate::error::TaskpilotError;
use crate::executor::Outcome;
use crate::models::{Project, Task};

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &TaskpilotError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn project_json(p: &Project) -> Value {
    json!({
        "id": p.id,
        "name": p.name,
        "description": p.description,
        "status": p.status.as_str(),
        "created_date": p.created_date
    })
}

pub fn task_json(t: &Task) -> Value {
    json!({
        "id": t.id,
        "project_id": t.project_id,
        "title": t.title,
        "description": t.description,
        "priority": t.priority.as_str(),
        "status": t.status.as_str(),
        "created_date": t.created_date,
        "due_date": t.due_date
    })
}

pub fn outcome_json(outcome: &Outcome) -> Value {
    let message = super::headline(outcome);
    match outcome {
        Outcome::ProjectCreated { project, .. } => json!({
            "message": message,
            "project": project_json(project)
        }),
        Outcome::TaskCreated {
            task, due_warning, ..
        } => {
            let mut v = json!({
                "message": message,
                "task": task_json(task)
            });
            if *due_warning {
                v["due_warning"] = json!("due_date is not a YYYY-MM-DD date");
            }
            v
        }
        Outcome::TaskDeleted { task, .. } => json!({
            "message": message,
            "task": task_json(task)
        }),
        Outcome::TaskCompleted { task, .. } => json!({
            "message": message,
            "task": task_json(task)
        }),
        Outcome::TaskList { tasks, project } => json!({
            "project": project.as_ref().map(project_json),
            "tasks": tasks.iter().map(task_json).collect::<Vec<_>>()
        }),
        Outcome::Recommendation { ranked, text } => json!({
            "recommendation": text,
            "ranked": ranked.iter().map(task_json).collect::<Vec<_>>()
        }),
        Outcome::Discussion { text } => json!({ "discussion": text }),
        Outcome::Clarification { raw_text } => json!({
            "clarification": "Could not map the command to a task operation",
            "raw_text": raw_text
        }),
    }
}
