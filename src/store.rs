use std::collections::BTreeMap;

use crate::assign::{AssignmentState, AssignmentUnit};
use crate::model::{ClassRef, ScheduleEntry, SchedulePayload, TeacherCandidate};

/// Remote persistence for class schedules. Implementations live in the UI
/// layer; failures are opaque here and are never retried by the engine.
pub trait ScheduleStore {
    fn fetch_schedule(
        &self,
        class_id: &str,
        academic_year: &str,
    ) -> anyhow::Result<Vec<ScheduleEntry>>;

    /// Submits one publish's operation list and returns the authoritative
    /// post-publish slots for the scope. All-or-nothing on the backend side.
    fn publish_schedule(
        &self,
        operations: &[SchedulePayload],
    ) -> anyhow::Result<Vec<ScheduleEntry>>;
}

/// Remote persistence for teacher assignments.
pub trait AssignmentStore {
    fn fetch_teacher_assignments(&self, teacher_id: &str) -> anyhow::Result<AssignmentState>;

    /// Replaces every listed teacher's assignment set in one batch call.
    fn publish_assignments(&self, units: &[AssignmentUnit]) -> anyhow::Result<()>;
}

/// Read-mostly reference lookups backing the editors' pickers.
pub trait ReferenceSource {
    fn fetch_teacher_candidates(&self, teacher_id: &str) -> anyhow::Result<Vec<TeacherCandidate>>;

    fn fetch_classes_by_grade(&self) -> anyhow::Result<BTreeMap<String, Vec<ClassRef>>>;
}
