use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{ScheduleEntry, SlotKey};

/// Lifecycle tag assigned when an edit is staged. The publish path trusts
/// this tag and never re-derives intent from payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DraftStatus {
    Create,
    Update,
    Delete,
}

/// One staged mutation against the baseline.
///
/// Invariants, maintained by [`DraftOverlay`]: a create has no original and
/// id-less data; an update's data carries the original's id; a delete's data
/// is a copy of the original with `is_active` cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEntry {
    pub status: DraftStatus,
    pub data: ScheduleEntry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<ScheduleEntry>,
}

/// Last confirmed persisted state for one class/term, keyed by grid slot.
/// Replaced wholesale after a successful publish or an explicit refresh,
/// never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct ScheduleBaseline {
    class_id: String,
    academic_year: String,
    entries: BTreeMap<SlotKey, ScheduleEntry>,
}

impl ScheduleBaseline {
    pub fn from_entries(
        class_id: impl Into<String>,
        academic_year: impl Into<String>,
        entries: Vec<ScheduleEntry>,
    ) -> Self {
        Self {
            class_id: class_id.into(),
            academic_year: academic_year.into(),
            entries: Self::index(entries),
        }
    }

    fn index(entries: Vec<ScheduleEntry>) -> BTreeMap<SlotKey, ScheduleEntry> {
        let mut map = BTreeMap::new();
        for entry in entries {
            // Deactivated rows never occupy a slot.
            if !entry.is_active {
                continue;
            }
            map.insert(entry.slot_key(), entry);
        }
        map
    }

    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    pub fn academic_year(&self) -> &str {
        &self.academic_year
    }

    pub fn get(&self, key: &SlotKey) -> Option<&ScheduleEntry> {
        self.entries.get(key)
    }

    pub fn replace_all(&mut self, entries: Vec<ScheduleEntry>) {
        self.entries = Self::index(entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &ScheduleEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What a grid cell should show once drafts are overlaid on baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSlot<'a> {
    pub entry: Option<&'a ScheduleEntry>,
    pub is_draft: bool,
    /// The slot still renders its row, flagged for removal.
    pub pending_delete: bool,
}

/// Pending local mutations keyed by slot. Holds no baseline data and never
/// talks to persistence; publishing is the editor's job.
#[derive(Debug, Default)]
pub struct DraftOverlay {
    drafts: BTreeMap<SlotKey, DraftEntry>,
}

impl DraftOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an edit. Create vs. update is decided here against the baseline
    /// and recorded on the entry. A prior draft at the same slot is
    /// overwritten; re-staging a create keeps it a create.
    pub fn stage(&mut self, key: SlotKey, mut entry: ScheduleEntry, baseline: &ScheduleBaseline) {
        match baseline.get(&key) {
            Some(original) => {
                entry.id = original.id.clone();
                self.drafts.insert(
                    key,
                    DraftEntry {
                        status: DraftStatus::Update,
                        data: entry,
                        original: Some(original.clone()),
                    },
                );
            }
            None => {
                entry.id = None;
                self.drafts.insert(
                    key,
                    DraftEntry {
                        status: DraftStatus::Create,
                        data: entry,
                        original: None,
                    },
                );
            }
        }
    }

    /// Mark a slot for deletion. Deleting a staged create removes the draft
    /// outright: the row was never persisted, so there is nothing to tell
    /// the server. Deleting a slot with neither a draft nor a baseline row
    /// is a no-op.
    pub fn mark_deleted(&mut self, key: SlotKey, baseline: &ScheduleBaseline) {
        if let Some(existing) = self.drafts.get(&key) {
            if existing.status == DraftStatus::Create {
                self.drafts.remove(&key);
                return;
            }
        }

        let original = self
            .drafts
            .get(&key)
            .and_then(|d| d.original.clone())
            .or_else(|| baseline.get(&key).cloned());
        let Some(original) = original else {
            return;
        };

        let mut data = original.clone();
        data.is_active = false;
        self.drafts.insert(
            key,
            DraftEntry {
                status: DraftStatus::Delete,
                data,
                original: Some(original),
            },
        );
    }

    /// Drop the draft at `key`, restoring the baseline view.
    pub fn revert(&mut self, key: &SlotKey) {
        self.drafts.remove(key);
    }

    /// Clears every draft; the baseline is untouched.
    pub fn discard_all(&mut self) {
        self.drafts.clear();
    }

    /// Any staged entry counts as a change, whatever its status.
    pub fn has_changes(&self) -> bool {
        !self.drafts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn get(&self, key: &SlotKey) -> Option<&DraftEntry> {
        self.drafts.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &DraftEntry)> {
        self.drafts.iter()
    }

    /// The entity to display at `key`: the draft's data if staged, the
    /// original under a removal flag if deletion-pending, else baseline.
    pub fn resolve<'a>(&'a self, key: &SlotKey, baseline: &'a ScheduleBaseline) -> ResolvedSlot<'a> {
        match self.drafts.get(key) {
            Some(draft) if draft.status == DraftStatus::Delete => ResolvedSlot {
                entry: draft.original.as_ref(),
                is_draft: true,
                pending_delete: true,
            },
            Some(draft) => ResolvedSlot {
                entry: Some(&draft.data),
                is_draft: true,
                pending_delete: false,
            },
            None => ResolvedSlot {
                entry: baseline.get(key),
                is_draft: false,
                pending_delete: false,
            },
        }
    }

    /// Merged view of every visible slot, for grid rendering.
    pub fn resolve_all<'a>(
        &'a self,
        baseline: &'a ScheduleBaseline,
    ) -> BTreeMap<SlotKey, ResolvedSlot<'a>> {
        let mut out = BTreeMap::new();
        for (key, _) in baseline.iter() {
            out.insert(key.clone(), self.resolve(key, baseline));
        }
        for (key, _) in self.drafts.iter() {
            out.insert(key.clone(), self.resolve(key, baseline));
        }
        out
    }
}
