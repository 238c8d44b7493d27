use crate::collaborator::{context, Collaborator, GeminiClient};
use crate::config::Config;
use crate::db::{connection, task_repo};
use crate::error::TaskpilotError;
use crate::executor::{self, Outcome};
use crate::output;

pub fn run(text: &str, json_output: bool) -> i32 {
    match run_inner(text) {
        Ok(outcome) => {
            if json_output {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output::json::success(
                        output::json::outcome_json(&outcome)
                    ))
                    .unwrap()
                );
            } else {
                output::text::print_outcome(&outcome);
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

fn run_inner(text: &str) -> Result<Outcome, TaskpilotError> {
    let conn = connection::open_db()?;
    // Startup-fatal: no key, no command processing.
    let config = Config::load()?;
    let client = GeminiClient::new(config);

    let state = context::snapshot_payload(&task_repo::snapshot(&conn)?);
    let envelope = client.interpret(text, &state)?;
    executor::execute(&conn, &client, envelope)
}
