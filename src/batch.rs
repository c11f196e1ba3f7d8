use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

use crate::assign::{AssignmentDraft, AssignmentState, AssignmentUnit};
use crate::cache::ReferenceCache;
use crate::error::{EngineError, IntegrityViolation};
use crate::reference;
use crate::store::AssignmentStore;

/// Ceiling on units per batch call. A session edits tens of teachers at
/// most, so anything larger indicates a staging-logic defect.
pub const BATCH_MAX_UNITS: usize = 200;

/// Summary handed back to the UI after a batch publish attempt.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub published_teachers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<IntegrityViolation>,
}

/// Multi-teacher assignment editing session: one confirmed/draft pair per
/// opened teacher, committed together as a single batch call.
#[derive(Debug, Default)]
pub struct BatchCoordinator {
    teachers: BTreeMap<String, AssignmentDraft>,
    publish_in_flight: bool,
}

impl BatchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a teacher into the session, cache-first. Reopening a teacher
    /// already in the session keeps their staged draft untouched.
    pub fn open_teacher(
        &mut self,
        store: &impl AssignmentStore,
        cache: &mut ReferenceCache<AssignmentState>,
        teacher_id: &str,
    ) -> Result<&AssignmentDraft, EngineError> {
        if !self.teachers.contains_key(teacher_id) {
            let state = cache.get_or_fetch(&reference::assignments_key(teacher_id), || {
                store.fetch_teacher_assignments(teacher_id)
            })?;
            self.teachers
                .insert(teacher_id.to_string(), AssignmentDraft::new(state));
        }
        Ok(&self.teachers[teacher_id])
    }

    pub fn draft(&self, teacher_id: &str) -> Option<&AssignmentDraft> {
        self.teachers.get(teacher_id)
    }

    pub fn draft_mut(&mut self, teacher_id: &str) -> Option<&mut AssignmentDraft> {
        self.teachers.get_mut(teacher_id)
    }

    /// Teachers whose draft differs from their confirmed state, in id order.
    pub fn dirty_teachers(&self) -> Vec<&str> {
        self.teachers
            .iter()
            .filter(|(_, draft)| draft.is_dirty())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn has_changes(&self) -> bool {
        self.teachers.values().any(AssignmentDraft::is_dirty)
    }

    pub fn publish_in_flight(&self) -> bool {
        self.publish_in_flight
    }

    /// Resets every dirty draft to its confirmed state. Cache entries are
    /// left alone; nothing happened remotely.
    pub fn discard_all(&mut self) {
        for draft in self.teachers.values_mut() {
            if draft.is_dirty() {
                draft.discard();
            }
        }
    }

    /// Publishes every dirty teacher in one batch call. On success each
    /// included teacher's confirmed state adopts the draft and their cached
    /// assignments are invalidated so the next read refetches authoritative
    /// data. On failure no teacher's confirmed state changes and every
    /// draft stays editable.
    pub fn publish(
        &mut self,
        store: &impl AssignmentStore,
        cache: &mut ReferenceCache<AssignmentState>,
    ) -> Result<BatchOutcome, EngineError> {
        if self.publish_in_flight {
            return Err(EngineError::PublishInFlight);
        }

        let mut outcome = BatchOutcome::default();
        let mut units = Vec::new();
        let mut included = Vec::new();
        for (teacher_id, draft) in &self.teachers {
            if !draft.is_dirty() {
                continue;
            }
            if let Err(violation) = draft.draft().check_integrity() {
                tracing::warn!(
                    teacher_id = teacher_id.as_str(),
                    code = violation.code.as_str(),
                    "assignment draft failed integrity check, skipping"
                );
                outcome.violations.push(violation);
                continue;
            }
            units.push(AssignmentUnit::from_state(teacher_id.clone(), draft.draft()));
            included.push(teacher_id.clone());
        }

        if units.is_empty() {
            return Ok(outcome);
        }
        if units.len() > BATCH_MAX_UNITS {
            return Err(EngineError::Integrity(
                IntegrityViolation::new("batch_too_large", "refusing oversized batch publish")
                    .with_details(json!({ "units": units.len(), "max": BATCH_MAX_UNITS })),
            ));
        }

        self.publish_in_flight = true;
        let result = store.publish_assignments(&units);
        self.publish_in_flight = false;

        match result {
            Ok(()) => {
                for teacher_id in &included {
                    if let Some(draft) = self.teachers.get_mut(teacher_id) {
                        draft.resync();
                    }
                    cache.invalidate(&reference::assignments_key(teacher_id));
                }
                tracing::info!(teachers = included.len(), "assignment batch reconciled");
                outcome.published_teachers = included;
                Ok(outcome)
            }
            Err(e) => Err(EngineError::PublishRejected(e)),
        }
    }
}
