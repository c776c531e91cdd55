//! To-do tasks (rows of the `tareas` table)

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PlannerError, PlannerResult};
use crate::schedule::non_blank;

/// Format of due dates, as stored in the database
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How urgent a task is. Stored as its integer code (1, 2 or 3)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Priority {
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl TryFrom<u8> for Priority {
    type Error = PlannerError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::High),
            other => Err(PlannerError::Invalid(format!("Unknown priority {}", other))),
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Used to support serde
impl Serialize for Priority {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Priority, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = u8::deserialize(deserializer)?;
        Priority::try_from(code).map_err(serde::de::Error::custom)
    }
}


/// Identifier of a task. It is assigned by the store
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for TaskId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}


/// A to-do task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    #[serde(rename = "titulo")]
    title: String,
    #[serde(rename = "descripcion", default)]
    description: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(rename = "fecha")]
    due_date: String,
    #[serde(rename = "prioridad")]
    priority: Priority,
    #[serde(rename = "completada", default)]
    completed: bool,
}

impl Task {
    pub fn id(&self) -> TaskId            { self.id }
    pub fn title(&self) -> &str           { &self.title }
    pub fn description(&self) -> Option<&str> { self.description.as_deref() }
    pub fn due_date(&self) -> &str        { &self.due_date }
    pub fn priority(&self) -> Priority    { self.priority }
    pub fn completed(&self) -> bool       { self.completed }

    /// Whether the user may open the edit form for this task
    pub fn is_editable(&self) -> bool {
        self.completed == false
    }
}


/// The user-provided fields of a task.
///
/// Title and due date are required, and checked when this is built. There is no way to
/// create a task that is already completed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaskFields {
    #[serde(rename = "titulo")]
    title: String,
    #[serde(rename = "descripcion")]
    description: Option<String>,
    #[serde(rename = "fecha")]
    due_date: String,
    #[serde(rename = "prioridad")]
    priority: Priority,
}

impl TaskFields {
    pub fn new<T: ToString, U: ToString>(title: T, due_date: U, priority: Priority) -> PlannerResult<Self> {
        let title = title.to_string().trim().to_string();
        let due_date = due_date.to_string().trim().to_string();
        if title.is_empty() || due_date.is_empty() {
            return Err(PlannerError::Invalid("Title and due date are required.".to_string()));
        }
        if NaiveDate::parse_from_str(&due_date, DATE_FORMAT).is_err() {
            return Err(PlannerError::Invalid(format!("Invalid due date {:?}, expected YYYY-MM-DD.", due_date)));
        }
        Ok(Self { title, description: None, due_date, priority })
    }

    /// Set the description. A blank description is stored as "no description"
    pub fn with_description<S: ToString>(mut self, description: S) -> Self {
        self.description = non_blank(description);
        self
    }

    pub fn title(&self) -> &str           { &self.title }
    pub fn description(&self) -> Option<&str> { self.description.as_deref() }
    pub fn due_date(&self) -> &str        { &self.due_date }
    pub fn priority(&self) -> Priority    { self.priority }
}

/// The fields of an existing task (e.g. to duplicate it). Its completion status is not carried over.
impl From<&Task> for TaskFields {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.clone(),
            priority: task.priority,
        }
    }
}


/// A partial update of a task. Only the fields that are set are sent to the store
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TaskPatch {
    #[serde(rename = "titulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `Some(None)` clears the description
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(rename = "fecha", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(rename = "prioridad", skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(rename = "completada", skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// A patch that only sets the completion status
    pub fn completion(completed: bool) -> Self {
        Self { completed: Some(completed), ..Self::default() }
    }
}

/// Replace every user-editable field, but leave the completion status untouched
impl From<TaskFields> for TaskPatch {
    fn from(fields: TaskFields) -> Self {
        Self {
            title: Some(fields.title),
            description: Some(fields.description),
            due_date: Some(fields.due_date),
            priority: Some(fields.priority),
            completed: None,
        }
    }
}


/// What the task form holds while the user is typing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: Priority,
}

impl Default for TaskForm {
    /// A new task is due today, with a medium priority
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            due_date: chrono::Local::now().date_naive().format(DATE_FORMAT).to_string(),
            priority: Priority::Medium,
        }
    }
}

impl TaskForm {
    /// Pre-fill a form with the current values of a task
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title().to_string(),
            description: task.description().unwrap_or_default().to_string(),
            due_date: task.due_date().to_string(),
            priority: task.priority(),
        }
    }

    /// Check the required fields
    pub fn validate(&self) -> PlannerResult<TaskFields> {
        Ok(TaskFields::new(&self.title, &self.due_date, self.priority)?
            .with_description(&self.description))
    }
}
