use serde_json::json;

use crate::db::{connection, task_repo};
use crate::output;

pub fn run(json_output: bool) -> i32 {
    let result = connection::open_db().and_then(|conn| task_repo::snapshot(&conn));
    match result {
        Ok(snapshot) => {
            if json_output {
                let projects: Vec<_> = snapshot
                    .iter()
                    .map(|(project, tasks)| {
                        let mut v = output::json::project_json(project);
                        v["tasks"] = json!(tasks
                            .iter()
                            .map(output::json::task_json)
                            .collect::<Vec<_>>());
                        v
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output::json::success(json!({
                        "projects": projects
                    })))
                    .unwrap()
                );
            } else {
                output::text::print_snapshot(&snapshot);
            }
            0
        }
        Err(e) => {
            if json_output {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output::json::error(&e)).unwrap()
                );
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}
