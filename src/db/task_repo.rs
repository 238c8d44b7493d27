use rusqlite::{params, Connection};

use crate::error::TaskpilotError;
use crate::intent::EntityRef;
use crate::models::{Priority, Project, Task, TaskStatus};

const COLUMNS: &str = "id, project_id, title, description, priority, status, created_date, due_date";

pub fn create_task(
    conn: &Connection,
    project_id: i64,
    title: &str,
    description: Option<&str>,
    priority: Priority,
    due_date: Option<&str>,
) -> Result<Task, TaskpilotError> {
    conn.execute(
        "INSERT INTO tasks (project_id, title, description, priority, due_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![project_id, title, description, priority.as_str(), due_date],
    )?;
    get_task_by_id(conn, conn.last_insert_rowid())
}

pub fn get_task_by_id(conn: &Connection, id: i64) -> Result<Task, TaskpilotError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM tasks WHERE id = ?1"),
        params![id],
        row_to_task,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => TaskpilotError::task_not_found(&id.to_string()),
        _ => TaskpilotError::from(e),
    })
}

/// Resolve a task reference: explicit id, or exact title match, optionally
/// scoped to one project. Several title matches without a scope narrow
/// enough to pick one is an ambiguity, never a guess.
pub fn resolve_task(
    conn: &Connection,
    reference: &EntityRef,
    project_scope: Option<i64>,
) -> Result<Task, TaskpilotError> {
    let title = match reference {
        EntityRef::Id(id) => return get_task_by_id(conn, *id),
        EntityRef::Name(title) => title,
    };

    let mut stmt;
    let tasks: Vec<Task> = match project_scope {
        Some(project_id) => {
            stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM tasks WHERE title = ?1 AND project_id = ?2 ORDER BY id ASC"
            ))?;
            stmt.query_map(params![title, project_id], row_to_task)?
                .collect::<Result<Vec<_>, _>>()?
        }
        None => {
            stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM tasks WHERE title = ?1 ORDER BY id ASC"
            ))?;
            stmt.query_map(params![title], row_to_task)?
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    match tasks.len() {
        0 => Err(TaskpilotError::task_not_found(title)),
        1 => Ok(tasks.into_iter().next().unwrap()),
        _ => {
            let candidates: Vec<String> = tasks
                .iter()
                .map(|t| {
                    let project = project_name(conn, t.project_id)
                        .unwrap_or_else(|_| format!("project #{}", t.project_id));
                    format!("'{}' (#{}) in {}", t.title, t.id, project)
                })
                .collect();
            Err(TaskpilotError::ambiguous_ref(title, &candidates))
        }
    }
}

/// List tasks in creation order, optionally filtered by project and status.
pub fn list_tasks(
    conn: &Connection,
    project_id: Option<i64>,
    status: Option<TaskStatus>,
) -> Result<Vec<Task>, TaskpilotError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM tasks
         WHERE (?1 IS NULL OR project_id = ?1)
           AND (?2 IS NULL OR status = ?2)
         ORDER BY id ASC"
    ))?;
    let tasks = stmt
        .query_map(params![project_id, status.map(|s| s.as_str())], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Pending and in-progress tasks, the input set for recommendations.
pub fn open_tasks(conn: &Connection, project_id: Option<i64>) -> Result<Vec<Task>, TaskpilotError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM tasks
         WHERE status IN ('pending', 'in_progress')
           AND (?1 IS NULL OR project_id = ?1)
         ORDER BY id ASC"
    ))?;
    let tasks = stmt
        .query_map(params![project_id], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

pub fn update_task_status(
    conn: &Connection,
    id: i64,
    status: TaskStatus,
) -> Result<Task, TaskpilotError> {
    let changed = conn.execute(
        "UPDATE tasks SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    if changed == 0 {
        return Err(TaskpilotError::task_not_found(&id.to_string()));
    }
    get_task_by_id(conn, id)
}

pub fn delete_task(conn: &Connection, id: i64) -> Result<(), TaskpilotError> {
    let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(TaskpilotError::task_not_found(&id.to_string()));
    }
    Ok(())
}

/// Active projects with their non-completed tasks: what the collaborator
/// sees as context, and what `status` prints.
pub fn snapshot(conn: &Connection) -> Result<Vec<(Project, Vec<Task>)>, TaskpilotError> {
    let projects = super::project_repo::list_projects(conn)?;
    let mut result = Vec::new();
    for project in projects {
        if project.status != crate::models::ProjectStatus::Active {
            continue;
        }
        let tasks: Vec<Task> = list_tasks(conn, Some(project.id), None)?
            .into_iter()
            .filter(|t| t.status.is_open())
            .collect();
        result.push((project, tasks));
    }
    Ok(result)
}

fn project_name(conn: &Connection, project_id: i64) -> Result<String, TaskpilotError> {
    Ok(super::project_repo::get_project_by_id(conn, project_id)?.name)
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        priority: Priority::from_str(&row.get::<_, String>(4)?).unwrap_or(Priority::Medium),
        status: TaskStatus::from_str(&row.get::<_, String>(5)?).unwrap_or(TaskStatus::Pending),
        created_date: row.get(6)?,
        due_date: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, project_repo};
    use crate::error::ErrorCode;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrations::run_migrations(&conn).unwrap();
        conn
    }

    fn project(conn: &Connection, name: &str) -> i64 {
        project_repo::create_project(conn, name, None).unwrap().id
    }

    #[test]
    fn defaults_on_create() {
        let conn = test_conn();
        let p = project(&conn, "Web");
        let task = create_task(&conn, p, "UI design", None, Priority::Medium, None).unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn list_empty_project_is_ok() {
        let conn = test_conn();
        let p = project(&conn, "Web");
        assert!(list_tasks(&conn, Some(p), None).unwrap().is_empty());
    }

    #[test]
    fn list_preserves_creation_order_and_filters() {
        let conn = test_conn();
        let p = project(&conn, "Web");
        let a = create_task(&conn, p, "UI design", None, Priority::Medium, None).unwrap();
        let b = create_task(&conn, p, "database setup", None, Priority::High, None).unwrap();
        update_task_status(&conn, a.id, TaskStatus::Completed).unwrap();

        let all = list_tasks(&conn, Some(p), None).unwrap();
        assert_eq!(
            all.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![a.id, b.id]
        );

        let pending = list_tasks(&conn, Some(p), Some(TaskStatus::Pending)).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, b.id);
    }

    #[test]
    fn delete_twice_fails_second_time() {
        let conn = test_conn();
        let p = project(&conn, "Web");
        let task = create_task(&conn, p, "UI design", None, Priority::Medium, None).unwrap();
        delete_task(&conn, task.id).unwrap();
        let err = delete_task(&conn, task.id).unwrap_err();
        assert_eq!(err.code, ErrorCode::TaskNotFound);
    }

    #[test]
    fn resolve_unique_title_across_projects() {
        let conn = test_conn();
        let p = project(&conn, "Web");
        let task = create_task(&conn, p, "UI design", None, Priority::Medium, None).unwrap();
        let found = resolve_task(&conn, &EntityRef::Name("UI design".into()), None).unwrap();
        assert_eq!(found.id, task.id);
    }

    #[test]
    fn resolve_duplicate_title_needs_scope() {
        let conn = test_conn();
        let p1 = project(&conn, "Web");
        let p2 = project(&conn, "Mobile");
        create_task(&conn, p1, "UI design", None, Priority::Medium, None).unwrap();
        let in_mobile = create_task(&conn, p2, "UI design", None, Priority::Medium, None).unwrap();

        let err = resolve_task(&conn, &EntityRef::Name("UI design".into()), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::AmbiguousRef);
        assert!(err.message.contains("Web") && err.message.contains("Mobile"));

        let found = resolve_task(&conn, &EntityRef::Name("UI design".into()), Some(p2)).unwrap();
        assert_eq!(found.id, in_mobile.id);
    }

    #[test]
    fn snapshot_hides_completed_tasks_and_inactive_projects() {
        let conn = test_conn();
        let p1 = project(&conn, "Web");
        let p2 = project(&conn, "Old");
        project_repo::update_project_status(&conn, p2, &crate::models::ProjectStatus::Archived)
            .unwrap();
        let t = create_task(&conn, p1, "UI design", None, Priority::Medium, None).unwrap();
        let done = create_task(&conn, p1, "kickoff", None, Priority::Low, None).unwrap();
        update_task_status(&conn, done.id, TaskStatus::Completed).unwrap();

        let snap = snapshot(&conn).unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].0.name, "Web");
        assert_eq!(snap[0].1.len(), 1);
        assert_eq!(snap[0].1[0].id, t.id);
    }
}
