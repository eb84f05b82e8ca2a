use serde_json::Value;
use tracing::warn;

use atrium_client::Project;

/// Fallback name used when no project reference resolves. A real project
/// named "default" on the server would collide with this; the resolution
/// below logs a warning whenever the fallback fires so the case is visible.
pub const DEFAULT_PROJECT_NAME: &str = "default";

/// A loose reference to a project, as handed over by embedding layers whose
/// shape is not contractually fixed: a bare name, a normalized [`Project`],
/// or an arbitrary JSON object carrying the name under one of several keys.
#[derive(Debug, Clone)]
pub enum ProjectRef {
    Title(String),
    Project(Project),
    Object(Value),
}

impl ProjectRef {
    /// Resolve the project name, checking in order: the string itself,
    /// `name`, `title`, `projectTitle`; otherwise the literal `"default"`.
    pub fn resolve_name(&self) -> String {
        match self {
            ProjectRef::Title(s) if !s.trim().is_empty() => s.trim().to_string(),
            ProjectRef::Project(p) if !p.title.trim().is_empty() => p.title.trim().to_string(),
            ProjectRef::Object(value) => {
                for key in ["name", "title", "projectTitle"] {
                    if let Some(name) = value
                        .get(key)
                        .and_then(Value::as_str)
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                    {
                        return name.to_string();
                    }
                }
                warn!(
                    reference = %value,
                    "No valid project name found, using \"{DEFAULT_PROJECT_NAME}\""
                );
                DEFAULT_PROJECT_NAME.to_string()
            }
            _ => {
                warn!("Empty project reference, using \"{DEFAULT_PROJECT_NAME}\"");
                DEFAULT_PROJECT_NAME.to_string()
            }
        }
    }
}

impl From<&str> for ProjectRef {
    fn from(title: &str) -> Self {
        ProjectRef::Title(title.to_string())
    }
}

impl From<String> for ProjectRef {
    fn from(title: String) -> Self {
        ProjectRef::Title(title)
    }
}

impl From<Project> for ProjectRef {
    fn from(project: Project) -> Self {
        ProjectRef::Project(project)
    }
}
