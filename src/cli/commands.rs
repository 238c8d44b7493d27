use clap::{Parser, Subcommand};

const VERSION: &str = env!("GIT_VERSION");

#[derive(Parser)]
#[command(
    name = "taskpilot",
    version = VERSION,
    about = "Natural-language project and task manager",
    after_help = "\
NOTE:
  The store lives at <root>/.taskpilot/tasks.db, where <root> is found by
  walking up from the current directory. Run `taskpilot init` first.
  `do` requires GEMINI_API_KEY (or \"api_key\" in .taskpilot/config.json);
  `init` and `status` work offline.

EXIT CODES:
  0  Success (including a clarification request for unrecognized input)
  1  Error (unresolved reference, ambiguity, storage or collaborator failure)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the task store in this directory
    Init,

    /// Run one natural-language command
    #[command(after_help = "\
EXAMPLES:
  taskpilot do \"Create a project called Website Development\"
  taskpilot do \"Add a task UI design to the Website Development project\"
  taskpilot do \"What should I work on next?\"
  taskpilot do \"Delete the UI design task\"")]
    Do {
        /// The command, in plain English
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Show active projects and their open tasks (no AI call)
    Status,
}
