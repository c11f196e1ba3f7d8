use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

use crate::draft::{DraftOverlay, DraftStatus, ResolvedSlot, ScheduleBaseline};
use crate::error::{EngineError, IntegrityViolation};
use crate::model::{ScheduleEntry, SchedulePayload, SlotKey};
use crate::store::ScheduleStore;

/// Summary handed back to the UI after a publish attempt.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishOutcome {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    /// Slots staged without a teacher or subject; skipped, not submitted.
    pub skipped_incomplete: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<IntegrityViolation>,
}

impl PublishOutcome {
    pub fn submitted(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

/// One open class-schedule editor: the baseline for its class/term plus the
/// operator's staged edits. Owns its scope exclusively; the surrounding UI
/// opens at most one editor per class/term.
#[derive(Debug)]
pub struct ScheduleEditor {
    baseline: ScheduleBaseline,
    overlay: DraftOverlay,
    publish_in_flight: bool,
}

impl ScheduleEditor {
    /// Opens the editor over a fresh baseline fetch. A failed fetch installs
    /// no partial baseline.
    pub fn open(
        store: &impl ScheduleStore,
        class_id: &str,
        academic_year: &str,
    ) -> Result<Self, EngineError> {
        let entries = store
            .fetch_schedule(class_id, academic_year)
            .map_err(EngineError::Load)?;
        Ok(Self {
            baseline: ScheduleBaseline::from_entries(class_id, academic_year, entries),
            overlay: DraftOverlay::new(),
            publish_in_flight: false,
        })
    }

    /// Replaces the baseline wholesale. Staged drafts survive a refresh;
    /// they die only by revert, discard, or publish.
    pub fn refresh(&mut self, store: &impl ScheduleStore) -> Result<(), EngineError> {
        let entries = store
            .fetch_schedule(self.baseline.class_id(), self.baseline.academic_year())
            .map_err(EngineError::Load)?;
        self.baseline.replace_all(entries);
        Ok(())
    }

    pub fn baseline(&self) -> &ScheduleBaseline {
        &self.baseline
    }

    pub fn stage(&mut self, key: SlotKey, entry: ScheduleEntry) {
        self.overlay.stage(key, entry, &self.baseline);
    }

    pub fn mark_deleted(&mut self, key: SlotKey) {
        self.overlay.mark_deleted(key, &self.baseline);
    }

    pub fn revert(&mut self, key: &SlotKey) {
        self.overlay.revert(key);
    }

    pub fn discard_all(&mut self) {
        self.overlay.discard_all();
    }

    pub fn has_changes(&self) -> bool {
        self.overlay.has_changes()
    }

    pub fn resolve(&self, key: &SlotKey) -> ResolvedSlot<'_> {
        self.overlay.resolve(key, &self.baseline)
    }

    pub fn resolve_all(&self) -> BTreeMap<SlotKey, ResolvedSlot<'_>> {
        self.overlay.resolve_all(&self.baseline)
    }

    pub fn publish_in_flight(&self) -> bool {
        self.publish_in_flight
    }

    /// Shapes the overlay into the minimal operation list: deletes first,
    /// then creates/updates, each group in slot order. Malformed drafts are
    /// skipped and flagged rather than submitted.
    fn build_operations(&self) -> (Vec<SchedulePayload>, PublishOutcome) {
        let mut ops = Vec::new();
        let mut outcome = PublishOutcome::default();

        for (key, draft) in self.overlay.iter() {
            if draft.status != DraftStatus::Delete {
                continue;
            }
            match draft.original.as_ref() {
                Some(original)
                    if original.id.as_deref().map(str::is_empty) == Some(false) =>
                {
                    let mut payload = SchedulePayload::from_entry(original);
                    payload.is_active = false;
                    outcome.deleted += 1;
                    ops.push(payload);
                }
                _ => {
                    // Staging should have collapsed this; flag, do not submit.
                    tracing::warn!(slot = %key, "delete draft without persisted identity, skipping");
                    outcome.violations.push(
                        IntegrityViolation::new(
                            "delete_without_identity",
                            "delete draft does not reference a persisted row",
                        )
                        .with_details(json!({ "slot": key.to_string() })),
                    );
                }
            }
        }

        for (key, draft) in self.overlay.iter() {
            if draft.status == DraftStatus::Delete {
                continue;
            }
            if !draft.data.is_complete() {
                tracing::warn!(slot = %key, "staged slot missing teacher or subject, skipping");
                outcome.skipped_incomplete += 1;
                continue;
            }
            let mut payload = SchedulePayload::from_entry(&draft.data);
            if draft.status == DraftStatus::Create {
                // The status decides the shape; an id sneaking onto a staged
                // create must not turn it into an update.
                payload.id = None;
                outcome.created += 1;
                ops.push(payload);
            } else if payload.id.is_some() {
                outcome.updated += 1;
                ops.push(payload);
            } else {
                tracing::warn!(slot = %key, "update draft without persisted identity, skipping");
                outcome.violations.push(
                    IntegrityViolation::new(
                        "update_without_identity",
                        "update draft does not reference a persisted row",
                    )
                    .with_details(json!({ "slot": key.to_string() })),
                );
            }
        }

        (ops, outcome)
    }

    /// One user-triggered publish. Nothing staged means no remote call. A
    /// rejected call leaves every draft and the baseline in place so the
    /// operator can retry or discard; a successful call folds the result
    /// into a new baseline and clears the overlay.
    pub fn publish(&mut self, store: &impl ScheduleStore) -> Result<PublishOutcome, EngineError> {
        if self.publish_in_flight {
            return Err(EngineError::PublishInFlight);
        }

        let (ops, outcome) = self.build_operations();
        tracing::debug!(
            created = outcome.created,
            updated = outcome.updated,
            deleted = outcome.deleted,
            skipped = outcome.skipped_incomplete,
            "built schedule publish payload"
        );
        if ops.is_empty() {
            return Ok(outcome);
        }

        self.publish_in_flight = true;
        let result = store.publish_schedule(&ops);
        self.publish_in_flight = false;

        match result {
            Ok(entries) => {
                self.baseline.replace_all(entries);
                self.overlay.discard_all();
                tracing::info!(
                    class_id = self.baseline.class_id(),
                    submitted = outcome.submitted(),
                    "schedule publish reconciled"
                );
                Ok(outcome)
            }
            Err(e) => Err(EngineError::PublishRejected(e)),
        }
    }
}
