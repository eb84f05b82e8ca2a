use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inference language, selecting the backend endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Arabic,
}

impl Language {
    /// Path of the RAG endpoint serving this language.
    pub fn rag_path(&self) -> &'static str {
        match self {
            Language::English => "/rag",
            Language::Arabic => "/rag-arabic",
        }
    }
}

/// A named workspace scoping documents, chats and notes.
///
/// Produced once at the data-access boundary: the backend returns a bare
/// list of titles and ids are their 1-based positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
}

impl Project {
    pub(crate) fn from_titles(titles: Vec<String>) -> Vec<Project> {
        titles
            .into_iter()
            .enumerate()
            .map(|(i, title)| Project {
                id: (i + 1).to_string(),
                title,
            })
            .collect()
    }
}

/// One persisted question/reply pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: String,
    pub reply: String,
    /// Server timestamp; shape varies by backend version, kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
}

/// A project note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub id: Option<String>,
    pub content: String,
    /// Millisecond epoch, when the backend recorded one.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl Note {
    /// Most recent note by timestamp (entries without one sort last).
    pub fn latest(notes: &[Note]) -> Option<&Note> {
        notes.iter().max_by_key(|n| n.timestamp.unwrap_or(i64::MIN))
    }
}

/// A note shared by another user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedNote {
    pub id: String,
    pub project_name: String,
    pub sender_name: String,
    pub content: String,
    pub project_id: String,
    pub shared_at: Option<DateTime<Utc>>,
}

/// A user as shown in the admin view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub team: String,
    pub join_date: Option<String>,
    pub status: String,
}

/// Payload for creating a user. Field casing follows the backend contract
/// (camelCase names, snake_case role/team).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role_name: String,
    pub team_name: String,
}

fn str_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| {
        value
            .get(k)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    })
}

/// Render a loose id value (string or number) as a string.
fn id_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match value.get(k) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl UserRecord {
    /// Normalize one user object. The backend has shipped several field
    /// namings; a single `userName` is split into first/last on the first
    /// space.
    pub(crate) fn from_value(value: &Value) -> UserRecord {
        let (split_first, split_last) = match str_field(value, &["userName"]) {
            Some(full) => match full.split_once(' ') {
                Some((first, rest)) => (Some(first.to_string()), Some(rest.to_string())),
                None => (Some(full), None),
            },
            None => (None, None),
        };

        UserRecord {
            id: id_field(value, &["id", "userId", "_id"]).unwrap_or_default(),
            first_name: str_field(value, &["firstName", "first_name"])
                .or(split_first)
                .unwrap_or_default(),
            last_name: str_field(value, &["lastName", "last_name"])
                .or(split_last)
                .unwrap_or_default(),
            email: str_field(value, &["email"]).unwrap_or_default(),
            role: str_field(value, &["role", "role_name"]).unwrap_or_default(),
            team: str_field(value, &["team", "team_name"]).unwrap_or_default(),
            join_date: str_field(value, &["joinDate", "created_at"]),
            status: str_field(value, &["status"]).unwrap_or_else(|| "Active".to_string()),
        }
    }
}

/// Normalize the `/userName` body: a bare string, or an object carrying
/// `username`, `name`, or any first string value. Empty names count as
/// absent.
pub(crate) fn display_name_from_value(value: &Value) -> Option<String> {
    let name = match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Object(map) => str_field(value, &["username", "name"]).or_else(|| {
            map.values()
                .find_map(|v| v.as_str().map(str::trim).map(String::from))
        }),
        _ => None,
    };
    name.filter(|n| !n.is_empty())
}

/// Normalize a chat-count body: an array of integers, where anything
/// non-numeric coerces to 0 and a non-array body to an empty list.
pub(crate) fn counts_from_value(value: &Value) -> Vec<u64> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|v| {
                v.as_u64()
                    .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
                    .unwrap_or(0)
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Normalize a RAG reply body. The endpoint answers with raw text, a JSON
/// string, or a JSON object; all become a display string.
pub(crate) fn reply_from_body(body: String) -> String {
    match serde_json::from_str::<Value>(&body) {
        Ok(Value::String(s)) => s,
        Ok(Value::Object(map)) => {
            let known = map
                .get("reply")
                .or_else(|| map.get("answer"))
                .or_else(|| map.get("response"))
                .and_then(Value::as_str)
                .map(String::from);
            known.unwrap_or_else(|| Value::Object(map).to_string())
        }
        Ok(other) => other.to_string(),
        Err(_) => body,
    }
}

fn note_from_value(value: &Value) -> Note {
    match value {
        Value::String(s) => Note {
            id: None,
            content: s.clone(),
            timestamp: None,
        },
        _ => Note {
            id: id_field(value, &["id"]),
            content: str_field(value, &["content", "notes"]).unwrap_or_default(),
            timestamp: value.get("timestamp").and_then(Value::as_i64),
        },
    }
}

/// Normalize a `/getNotes` body. The backend returns a JSON array, a single
/// object, a double-encoded JSON string, or bare text; bare text becomes a
/// single note.
pub(crate) fn notes_from_body(body: String) -> Vec<Note> {
    let parsed = match serde_json::from_str::<Value>(&body) {
        Ok(Value::String(inner)) => serde_json::from_str::<Value>(&inner)
            .unwrap_or(Value::String(inner)),
        Ok(v) => v,
        Err(_) => Value::String(body),
    };

    match parsed {
        Value::Array(items) => items.iter().map(note_from_value).collect(),
        Value::String(text) => {
            if text.is_empty() {
                Vec::new()
            } else {
                vec![Note {
                    id: None,
                    content: text,
                    timestamp: None,
                }]
            }
        }
        Value::Null => Vec::new(),
        other => vec![note_from_value(&other)],
    }
}

pub(crate) fn shared_note_from_value(value: &Value) -> SharedNote {
    SharedNote {
        id: id_field(value, &["sharedNotesId", "id"]).unwrap_or_default(),
        project_name: str_field(value, &["projectName"])
            .unwrap_or_else(|| "Unnamed Project".to_string()),
        sender_name: str_field(value, &["senderName"])
            .unwrap_or_else(|| "Unknown Sender".to_string()),
        content: str_field(value, &["notes", "content"]).unwrap_or_default(),
        project_id: id_field(value, &["projectId"]).unwrap_or_default(),
        shared_at: str_field(value, &["date"])
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

/// Normalize a role/team listing: entries are strings or objects named by
/// `role_name`/`team_name`/`name`.
pub(crate) fn labels_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                _ => str_field(v, &["role_name", "team_name", "name"]),
            })
            .collect(),
        _ => Vec::new(),
    }
}
