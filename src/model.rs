use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid position of a schedule entry within one class/term: day of week
/// (1 = Monday) plus the period it lands in. Used directly as the map key;
/// the string rendering exists for log lines only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotKey {
    pub day_of_week: i64,
    pub period_id: String,
}

impl SlotKey {
    pub fn new(day_of_week: i64, period_id: impl Into<String>) -> Self {
        Self {
            day_of_week,
            period_id: period_id.into(),
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}:{}", self.day_of_week, self.period_id)
    }
}

/// A schedule slot as the UI displays it. Baseline rows always carry an id;
/// a staged create has none until the backend assigns one. The denormalized
/// name fields exist for rendering and never reach a persistence payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub class_id: String,
    pub teacher_id: String,
    pub subject_id: String,
    pub period_id: String,
    pub day_of_week: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    pub academic_year: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
}

impl ScheduleEntry {
    pub fn slot_key(&self) -> SlotKey {
        SlotKey::new(self.day_of_week, self.period_id.clone())
    }

    /// A slot is only publishable with both a teacher and a subject; the UI
    /// enforces this at edit time and the publish path re-checks it.
    pub fn is_complete(&self) -> bool {
        !self.teacher_id.trim().is_empty() && !self.subject_id.trim().is_empty()
    }
}

/// The backend-recognized subset of a schedule row. Display fields do not
/// exist on this type, so they cannot ride along into a publish call. An
/// absent `id` is how the backend distinguishes create from update, which is
/// why both optionals are skipped rather than serialized as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub class_id: String,
    pub teacher_id: String,
    pub subject_id: String,
    pub period_id: String,
    pub day_of_week: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    pub academic_year: String,
    pub is_active: bool,
}

impl SchedulePayload {
    /// Total mapping from the display shape. The id travels only when the
    /// entry has a non-empty one, the room only when non-empty after trim.
    pub fn from_entry(entry: &ScheduleEntry) -> Self {
        Self {
            id: entry
                .id
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            class_id: entry.class_id.clone(),
            teacher_id: entry.teacher_id.clone(),
            subject_id: entry.subject_id.clone(),
            period_id: entry.period_id.clone(),
            day_of_week: entry.day_of_week,
            room_number: entry
                .room_number
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            academic_year: entry.academic_year.clone(),
            is_active: entry.is_active,
        }
    }
}

/// One row of a teacher's assignment candidates; the schedule editor derives
/// its subject picker from these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherCandidate {
    pub subject_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
    pub grade_level: String,
}

/// A class as listed in the global classes-by-grade roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRef {
    pub id: String,
    pub name: String,
}
