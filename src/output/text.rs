use crate::executor::Outcome;
use crate::models::{Project, Task};

pub fn print_outcome(outcome: &Outcome) {
    if let Some(line) = super::headline(outcome) {
        println!("{line}");
    }
    match outcome {
        Outcome::TaskCreated {
            task, due_warning, ..
        } if *due_warning => {
            let due = task.due_date.as_deref().unwrap_or_default();
            println!("  note: due date '{due}' is not a YYYY-MM-DD date");
        }
        Outcome::TaskList { tasks, project } => {
            if let Some(project) = project {
                println!("Tasks in {}:", project.name);
            }
            print_task_list(tasks);
        }
        Outcome::Recommendation { ranked, text } => {
            println!("{text}");
            if !ranked.is_empty() {
                println!();
                for (i, t) in ranked.iter().enumerate() {
                    let due = t.due_date.as_deref().unwrap_or("-");
                    println!(
                        "  {}. {} (#{}) [{}] due {}",
                        i + 1,
                        t.title,
                        t.id,
                        t.priority.as_str(),
                        due
                    );
                }
            }
        }
        Outcome::Discussion { text } => println!("{text}"),
        Outcome::Clarification { .. } => {
            println!("Sorry, I couldn't map that to a task command. Try rephrasing.");
        }
        _ => {}
    }
}

pub fn print_task_list(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    for t in tasks {
        let due = t
            .due_date
            .as_deref()
            .map(|d| format!(" due={d}"))
            .unwrap_or_default();
        println!(
            "  [{}] {} (#{}) p={}{}",
            t.status.as_str(),
            t.title,
            t.id,
            t.priority.as_str(),
            due
        );
    }
}

pub fn print_snapshot(snapshot: &[(Project, Vec<Task>)]) {
    if snapshot.is_empty() {
        println!("No active projects.");
        return;
    }
    for (project, tasks) in snapshot {
        println!("{} (#{})", project.name, project.id);
        if let Some(ref desc) = project.description {
            println!("  {desc}");
        }
        print_task_list(tasks);
    }
}
