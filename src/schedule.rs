//! Weekly class schedule entries (rows of the `horarios` table)

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};

/// Day of the week. The variants are in week order, which is the order schedules are displayed in
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "Lunes")]
    Monday,
    #[serde(rename = "Martes")]
    Tuesday,
    #[serde(rename = "Miércoles")]
    Wednesday,
    #[serde(rename = "Jueves")]
    Thursday,
    #[serde(rename = "Viernes")]
    Friday,
    #[serde(rename = "Sábado")]
    Saturday,
    #[serde(rename = "Domingo")]
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday, Weekday::Tuesday, Weekday::Wednesday, Weekday::Thursday,
        Weekday::Friday, Weekday::Saturday, Weekday::Sunday,
    ];

    /// Position in the week, starting at 0 for Monday
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The name stored in the database
    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Lunes",
            Weekday::Tuesday => "Martes",
            Weekday::Wednesday => "Miércoles",
            Weekday::Thursday => "Jueves",
            Weekday::Friday => "Viernes",
            Weekday::Saturday => "Sábado",
            Weekday::Sunday => "Domingo",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|day| day.name() == name)
    }
}

impl Default for Weekday {
    fn default() -> Self {
        Weekday::Monday
    }
}

impl Display for Weekday {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}


/// Identifier of a schedule entry. It is generated on the client before the entry is inserted
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleId(String);

/// Disambiguates timestamp identifiers generated within the same millisecond
static TIMESTAMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

impl ScheduleId {
    /// Generate a new ScheduleId: a random UUID, or a timestamp-based one if the OS random source fails
    pub fn generate() -> Self {
        match Self::random() {
            Ok(id) => id,
            Err(err) => {
                log::warn!("No secure random source ({}), using a timestamp identifier", err);
                Self::from_timestamp()
            },
        }
    }

    /// Generate a random (v4) ScheduleId
    pub fn random() -> Result<Self, getrandom::Error> {
        let mut bytes = [0u8; 16];
        getrandom::getrandom(&mut bytes)?;
        let uuid = uuid::Builder::from_bytes(bytes)
            .set_variant(uuid::Variant::RFC4122)
            .set_version(uuid::Version::Random)
            .build();
        Ok(Self(uuid.to_hyphenated().to_string()))
    }

    /// Generate a `temp-<millis>-<n>` ScheduleId, for platforms with no usable random source
    pub fn from_timestamp() -> Self {
        let sequence = TIMESTAMP_SEQUENCE.fetch_add(1, AtomicOrdering::Relaxed);
        Self(format!("temp-{}-{}", chrono::Utc::now().timestamp_millis(), sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ScheduleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
impl From<&str> for ScheduleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for ScheduleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}


/// A class in the weekly schedule
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(rename = "id_usuario", deserialize_with = "crate::utils::string_or_number")]
    id: ScheduleId,
    #[serde(rename = "dia")]
    day: Weekday,
    /// `HH:MM`
    #[serde(rename = "hora")]
    time: String,
    #[serde(rename = "materia")]
    subject: String,
    #[serde(rename = "salon", default)]
    room: Option<String>,
    #[serde(rename = "profesor", default)]
    instructor: Option<String>,
}

impl ScheduleEntry {
    /// Build the entry that will be stored for `fields` under identifier `id`
    pub fn new(id: ScheduleId, fields: ScheduleFields) -> Self {
        Self {
            id,
            day: fields.day,
            time: fields.time,
            subject: fields.subject,
            room: fields.room,
            instructor: fields.instructor,
        }
    }

    pub fn id(&self) -> &ScheduleId  { &self.id }
    pub fn day(&self) -> Weekday     { self.day }
    pub fn time(&self) -> &str       { &self.time }
    pub fn subject(&self) -> &str    { &self.subject }
    pub fn room(&self) -> Option<&str>       { self.room.as_deref() }
    pub fn instructor(&self) -> Option<&str> { self.instructor.as_deref() }

    /// The fields of this entry, without its identifier
    pub fn fields(&self) -> ScheduleFields {
        ScheduleFields {
            day: self.day,
            time: self.time.clone(),
            subject: self.subject.clone(),
            room: self.room.clone(),
            instructor: self.instructor.clone(),
        }
    }

    /// Display order: day of the week first, then time of the day
    pub fn display_order(&self, other: &Self) -> Ordering {
        self.day.cmp(&other.day)
            .then_with(|| self.time.cmp(&other.time))
    }
}


/// The user-provided fields of a schedule entry.
///
/// Day, time and subject are required, and checked when this is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScheduleFields {
    #[serde(rename = "dia")]
    day: Weekday,
    #[serde(rename = "hora")]
    time: String,
    #[serde(rename = "materia")]
    subject: String,
    #[serde(rename = "salon")]
    room: Option<String>,
    #[serde(rename = "profesor")]
    instructor: Option<String>,
}

impl ScheduleFields {
    pub fn new<T: ToString, U: ToString>(day: Weekday, time: T, subject: U) -> PlannerResult<Self> {
        let time = time.to_string().trim().to_string();
        let subject = subject.to_string().trim().to_string();
        if time.is_empty() || subject.is_empty() {
            return Err(PlannerError::Invalid("Day, time and subject are required.".to_string()));
        }
        Ok(Self { day, time, subject, room: None, instructor: None })
    }

    /// Set the room. A blank room is stored as "no room"
    pub fn with_room<S: ToString>(mut self, room: S) -> Self {
        self.room = non_blank(room);
        self
    }

    /// Set the instructor. A blank name is stored as "no instructor"
    pub fn with_instructor<S: ToString>(mut self, instructor: S) -> Self {
        self.instructor = non_blank(instructor);
        self
    }

    pub fn day(&self) -> Weekday     { self.day }
    pub fn time(&self) -> &str       { &self.time }
    pub fn subject(&self) -> &str    { &self.subject }
    pub fn room(&self) -> Option<&str>       { self.room.as_deref() }
    pub fn instructor(&self) -> Option<&str> { self.instructor.as_deref() }
}

/// A partial update of a schedule entry. Only the fields that are set are sent to the store
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SchedulePatch {
    #[serde(rename = "dia", skip_serializing_if = "Option::is_none")]
    pub day: Option<Weekday>,
    #[serde(rename = "hora", skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "materia", skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// `Some(None)` clears the room
    #[serde(rename = "salon", skip_serializing_if = "Option::is_none")]
    pub room: Option<Option<String>>,
    /// `Some(None)` clears the instructor
    #[serde(rename = "profesor", skip_serializing_if = "Option::is_none")]
    pub instructor: Option<Option<String>>,
}

/// Replace every field
impl From<ScheduleFields> for SchedulePatch {
    fn from(fields: ScheduleFields) -> Self {
        Self {
            day: Some(fields.day),
            time: Some(fields.time),
            subject: Some(fields.subject),
            room: Some(fields.room),
            instructor: Some(fields.instructor),
        }
    }
}

pub(crate) fn non_blank<S: ToString>(value: S) -> Option<String> {
    let value = value.to_string().trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}


/// What the schedule form holds while the user is typing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleForm {
    pub day: Weekday,
    pub time: String,
    pub subject: String,
    pub room: String,
    pub instructor: String,
}

impl Default for ScheduleForm {
    /// A new entry starts on Monday at 08:00
    fn default() -> Self {
        Self {
            day: Weekday::Monday,
            time: "08:00".to_string(),
            subject: String::new(),
            room: String::new(),
            instructor: String::new(),
        }
    }
}

impl ScheduleForm {
    /// Pre-fill a form with the current values of an entry
    pub fn from_entry(entry: &ScheduleEntry) -> Self {
        Self {
            day: entry.day(),
            time: entry.time().to_string(),
            subject: entry.subject().to_string(),
            room: entry.room().unwrap_or_default().to_string(),
            instructor: entry.instructor().unwrap_or_default().to_string(),
        }
    }

    /// Check the required fields
    pub fn validate(&self) -> PlannerResult<ScheduleFields> {
        Ok(ScheduleFields::new(self.day, &self.time, &self.subject)?
            .with_room(&self.room)
            .with_instructor(&self.instructor))
    }
}
