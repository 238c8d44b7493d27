//! The structured contract between the AI collaborator and the executor.
//!
//! The collaborator returns one JSON object, tagged with `"intent"`, plus an
//! optional `"reply"` string it wants shown to the user on success. Anything
//! that fails to decode degrades to [`Intent::Unrecognized`] — the executor
//! never re-parses raw text and never guesses a mutation.

use serde::{Deserialize, Serialize};

use crate::models::{Priority, TaskStatus};

/// A disambiguation handle: an explicit row id, or a free-text name/title
/// to be resolved by the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    Id(i64),
    Name(String),
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    CreateProject {
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
    CreateTask {
        project: EntityRef,
        title: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        priority: Option<Priority>,
        #[serde(default)]
        due_date: Option<String>,
    },
    DeleteTask {
        task: EntityRef,
        #[serde(default)]
        project: Option<EntityRef>,
    },
    CompleteTask {
        task: EntityRef,
        #[serde(default)]
        project: Option<EntityRef>,
    },
    ListTasks {
        #[serde(default)]
        project: Option<EntityRef>,
        #[serde(default)]
        status: Option<TaskStatus>,
    },
    Recommend {
        #[serde(default)]
        project: Option<EntityRef>,
    },
    Discuss {
        #[serde(default)]
        project: Option<EntityRef>,
        #[serde(default)]
        task: Option<EntityRef>,
        #[serde(default)]
        topic: Option<String>,
    },
    Unrecognized {
        #[serde(default)]
        raw_text: String,
    },
}

/// A decoded collaborator response: the intent plus the optional
/// user-facing confirmation line it attached.
#[derive(Debug, Clone)]
pub struct IntentEnvelope {
    pub intent: Intent,
    pub reply: Option<String>,
}

impl IntentEnvelope {
    /// Decode a raw collaborator response. Total: malformed input of any
    /// shape becomes `Unrecognized`, carrying the original text.
    pub fn decode(raw: &str) -> Self {
        match try_decode(raw) {
            Some(envelope) => envelope,
            None => Self {
                intent: Intent::Unrecognized {
                    raw_text: raw.trim().to_string(),
                },
                reply: None,
            },
        }
    }
}

fn try_decode(raw: &str) -> Option<IntentEnvelope> {
    let object = extract_json_object(raw)?;
    let value: serde_json::Value = serde_json::from_str(object).ok()?;
    let reply = value["reply"]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);
    let intent: Intent = serde_json::from_value(value).ok()?;
    Some(IntentEnvelope { intent, reply })
}

/// Models wrap JSON in prose or code fences; take the outermost object.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_create_project() {
        let env = IntentEnvelope::decode(
            r#"{"intent": "create_project", "name": "Website Development", "reply": "Done!"}"#,
        );
        assert_eq!(
            env.intent,
            Intent::CreateProject {
                name: "Website Development".into(),
                description: None
            }
        );
        assert_eq!(env.reply.as_deref(), Some("Done!"));
    }

    #[test]
    fn decodes_refs_as_id_or_name() {
        let env = IntentEnvelope::decode(r#"{"intent": "delete_task", "task": 7}"#);
        assert_eq!(
            env.intent,
            Intent::DeleteTask {
                task: EntityRef::Id(7),
                project: None
            }
        );

        let env = IntentEnvelope::decode(
            r#"{"intent": "delete_task", "task": "UI design", "project": "Website Development"}"#,
        );
        assert_eq!(
            env.intent,
            Intent::DeleteTask {
                task: EntityRef::Name("UI design".into()),
                project: Some(EntityRef::Name("Website Development".into()))
            }
        );
    }

    #[test]
    fn decodes_task_with_priority_and_due_date() {
        let env = IntentEnvelope::decode(
            r#"{"intent": "create_task", "project": "Web", "title": "db setup",
                "priority": "high", "due_date": "2024-03-01"}"#,
        );
        match env.intent {
            Intent::CreateTask {
                priority, due_date, ..
            } => {
                assert_eq!(priority, Some(Priority::High));
                assert_eq!(due_date.as_deref(), Some("2024-03-01"));
            }
            other => panic!("unexpected intent: {other:?}"),
        }
    }

    #[test]
    fn strips_surrounding_prose_and_fences() {
        let env = IntentEnvelope::decode(
            "Sure, here you go:\n```json\n{\"intent\": \"list_tasks\"}\n```\n",
        );
        assert_eq!(
            env.intent,
            Intent::ListTasks {
                project: None,
                status: None
            }
        );
    }

    #[test]
    fn malformed_degrades_to_unrecognized() {
        for raw in ["not json at all", "{\"intent\": \"launch_missiles\"}", "{", ""] {
            let env = IntentEnvelope::decode(raw);
            assert!(
                matches!(env.intent, Intent::Unrecognized { .. }),
                "expected Unrecognized for {raw:?}"
            );
        }
    }

    #[test]
    fn unrecognized_keeps_raw_text() {
        let env = IntentEnvelope::decode("gibberish in, gibberish out");
        assert_eq!(
            env.intent,
            Intent::Unrecognized {
                raw_text: "gibberish in, gibberish out".into()
            }
        );
    }
}
