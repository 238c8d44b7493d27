use rusqlite::{params, Connection};

use crate::error::TaskpilotError;
use crate::intent::EntityRef;
use crate::models::{Project, ProjectStatus};

const COLUMNS: &str = "id, name, description, created_date, status";

pub fn create_project(
    conn: &Connection,
    name: &str,
    description: Option<&str>,
) -> Result<Project, TaskpilotError> {
    // Uniqueness check and insert must see the same snapshot.
    conn.execute_batch("BEGIN IMMEDIATE")?;
    let result = (|| -> Result<Project, TaskpilotError> {
        if find_project_by_name(conn, name)?.is_some() {
            return Err(TaskpilotError::duplicate_name(name));
        }
        conn.execute(
            "INSERT INTO projects (name, description) VALUES (?1, ?2)",
            params![name, description],
        )
        .map_err(|e| map_unique_violation(e, name))?;
        get_project_by_id(conn, conn.last_insert_rowid())
    })();
    match result {
        Ok(project) => {
            conn.execute_batch("COMMIT")?;
            Ok(project)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}

pub fn get_project_by_id(conn: &Connection, id: i64) -> Result<Project, TaskpilotError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM projects WHERE id = ?1"),
        params![id],
        row_to_project,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => TaskpilotError::project_not_found(&id.to_string()),
        _ => TaskpilotError::from(e),
    })
}

pub fn find_project_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<Project>, TaskpilotError> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM projects WHERE name = ?1"))?;
    let mut rows = stmt.query(params![name])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_project(row)?)),
        None => Ok(None),
    }
}

/// Resolve a project reference: explicit id, or exact name match.
pub fn resolve_project(conn: &Connection, reference: &EntityRef) -> Result<Project, TaskpilotError> {
    match reference {
        EntityRef::Id(id) => get_project_by_id(conn, *id),
        EntityRef::Name(name) => find_project_by_name(conn, name)?
            .ok_or_else(|| TaskpilotError::project_not_found(name)),
    }
}

pub fn list_projects(conn: &Connection) -> Result<Vec<Project>, TaskpilotError> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM projects ORDER BY id ASC"))?;
    let projects = stmt
        .query_map([], row_to_project)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(projects)
}

pub fn update_project_status(
    conn: &Connection,
    id: i64,
    status: &ProjectStatus,
) -> Result<(), TaskpilotError> {
    let changed = conn.execute(
        "UPDATE projects SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    if changed == 0 {
        return Err(TaskpilotError::project_not_found(&id.to_string()));
    }
    Ok(())
}

/// Delete a project. Blocked while any task still references it.
pub fn delete_project(conn: &Connection, id: i64) -> Result<(), TaskpilotError> {
    conn.execute_batch("BEGIN IMMEDIATE")?;
    let result = (|| -> Result<(), TaskpilotError> {
        let project = get_project_by_id(conn, id)?;
        let remaining: i64 = conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE project_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        if remaining > 0 {
            return Err(TaskpilotError::has_active_tasks(&project.name, remaining));
        }
        conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(())
    })();
    match result {
        Ok(()) => {
            conn.execute_batch("COMMIT")?;
            Ok(())
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}

fn map_unique_violation(e: rusqlite::Error, name: &str) -> TaskpilotError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            TaskpilotError::duplicate_name(name)
        }
        _ => TaskpilotError::from(e),
    }
}

fn row_to_project(row: &rusqlite::Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_date: row.get(3)?,
        status: ProjectStatus::from_str(&row.get::<_, String>(4)?)
            .unwrap_or(ProjectStatus::Active),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, task_repo};
    use crate::models::Priority;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrations::run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn create_then_lookup_by_name() {
        let conn = test_conn();
        let created = create_project(&conn, "Website Development", Some("the site")).unwrap();
        assert_eq!(created.status, ProjectStatus::Active);

        let found = find_project_by_name(&conn, "Website Development")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.description.as_deref(), Some("the site"));
    }

    #[test]
    fn duplicate_name_rejected_without_new_row() {
        let conn = test_conn();
        create_project(&conn, "Website Development", None).unwrap();
        let err = create_project(&conn, "Website Development", None).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::DuplicateName);
        assert_eq!(list_projects(&conn).unwrap().len(), 1);
    }

    #[test]
    fn name_match_is_case_exact() {
        let conn = test_conn();
        create_project(&conn, "Website", None).unwrap();
        assert!(find_project_by_name(&conn, "website").unwrap().is_none());
    }

    #[test]
    fn resolve_by_id_and_name() {
        let conn = test_conn();
        let p = create_project(&conn, "Backend", None).unwrap();
        assert_eq!(resolve_project(&conn, &EntityRef::Id(p.id)).unwrap().id, p.id);
        assert_eq!(
            resolve_project(&conn, &EntityRef::Name("Backend".into()))
                .unwrap()
                .id,
            p.id
        );
        let err = resolve_project(&conn, &EntityRef::Name("Frontend".into())).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ProjectNotFound);
    }

    #[test]
    fn delete_blocked_while_tasks_remain() {
        let conn = test_conn();
        let p = create_project(&conn, "Backend", None).unwrap();
        task_repo::create_task(&conn, p.id, "api", None, Priority::Medium, None).unwrap();

        let err = delete_project(&conn, p.id).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::HasActiveTasks);
        // Still there.
        assert!(get_project_by_id(&conn, p.id).is_ok());
    }

    #[test]
    fn delete_empty_project() {
        let conn = test_conn();
        let p = create_project(&conn, "Backend", None).unwrap();
        delete_project(&conn, p.id).unwrap();
        let err = get_project_by_id(&conn, p.id).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ProjectNotFound);
    }
}
