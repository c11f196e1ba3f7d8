use chrono::Duration;
use std::collections::{BTreeMap, BTreeSet};

use crate::cache::{ReferenceCache, ROSTER_TTL_SECS};
use crate::error::EngineError;
use crate::model::{ClassRef, TeacherCandidate};
use crate::store::ReferenceSource;

/// Cache key for one teacher's confirmed assignment state.
pub fn assignments_key(teacher_id: &str) -> String {
    format!("teacher:{teacher_id}:assignments")
}

/// Cache key for one teacher's assignment candidates.
pub fn candidates_key(teacher_id: &str) -> String {
    format!("teacher:{teacher_id}:candidates")
}

/// Cache key for the global classes-by-grade roster.
pub fn class_roster_key() -> String {
    "classes:byGrade".to_string()
}

/// A teacher's assignment candidates, cache-first under the default TTL.
pub fn teacher_candidates(
    cache: &mut ReferenceCache<Vec<TeacherCandidate>>,
    source: &impl ReferenceSource,
    teacher_id: &str,
) -> Result<Vec<TeacherCandidate>, EngineError> {
    cache.get_or_fetch(&candidates_key(teacher_id), || {
        source.fetch_teacher_candidates(teacher_id)
    })
}

/// Subjects the schedule editor offers for a teacher, derived from their
/// candidates.
pub fn selectable_subjects(candidates: &[TeacherCandidate]) -> BTreeSet<String> {
    candidates.iter().map(|c| c.subject_id.clone()).collect()
}

/// The near-static classes-by-grade roster, cached under the longer TTL.
pub fn classes_by_grade(
    cache: &mut ReferenceCache<BTreeMap<String, Vec<ClassRef>>>,
    source: &impl ReferenceSource,
) -> Result<BTreeMap<String, Vec<ClassRef>>, EngineError> {
    cache.get_or_fetch_with_ttl(
        &class_roster_key(),
        Duration::seconds(ROSTER_TTL_SECS),
        || source.fetch_classes_by_grade(),
    )
}
