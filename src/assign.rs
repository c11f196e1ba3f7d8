use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{EngineError, IntegrityViolation};

/// A teacher's full assignment picture: the subjects they teach, the grade
/// levels they cover, and the classes selected within each grade. Set and
/// map semantics make change detection order-independent by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentState {
    pub subjects: BTreeSet<String>,
    pub grade_levels: BTreeSet<String>,
    /// Selected classes per grade. A grade with no selected classes has no
    /// entry here, and every key must also be present in `grade_levels`.
    pub classes: BTreeMap<String, BTreeSet<String>>,
}

impl AssignmentState {
    pub fn add_subject(&mut self, subject_id: impl Into<String>) {
        self.subjects.insert(subject_id.into());
    }

    pub fn remove_subject(&mut self, subject_id: &str) {
        self.subjects.remove(subject_id);
    }

    pub fn add_grade_level(&mut self, grade: impl Into<String>) {
        self.grade_levels.insert(grade.into());
    }

    /// Deselecting a grade drops its class selections with it; re-adding
    /// the grade later starts from an empty class list.
    pub fn remove_grade_level(&mut self, grade: &str) {
        self.grade_levels.remove(grade);
        self.classes.remove(grade);
    }

    /// Class selections are only legal under a selected grade.
    pub fn add_class(&mut self, grade: &str, class_id: impl Into<String>) -> Result<(), EngineError> {
        if !self.grade_levels.contains(grade) {
            return Err(EngineError::Integrity(
                IntegrityViolation::new(
                    "class_without_grade",
                    "class selected under a grade level that is not selected",
                )
                .with_details(json!({ "gradeLevel": grade })),
            ));
        }
        self.classes
            .entry(grade.to_string())
            .or_default()
            .insert(class_id.into());
        Ok(())
    }

    pub fn remove_class(&mut self, grade: &str, class_id: &str) {
        let Some(selected) = self.classes.get_mut(grade) else {
            return;
        };
        selected.remove(class_id);
        if selected.is_empty() {
            self.classes.remove(grade);
        }
    }

    /// Re-checks the grade/class invariant before a state is shipped. A
    /// failure here means the staging logic upstream is defective.
    pub fn check_integrity(&self) -> Result<(), IntegrityViolation> {
        for (grade, selected) in &self.classes {
            if !self.grade_levels.contains(grade) {
                return Err(IntegrityViolation::new(
                    "class_without_grade",
                    "class selections reference a grade level that is not selected",
                )
                .with_details(json!({ "gradeLevel": grade, "classIds": selected })));
            }
        }
        Ok(())
    }
}

/// Confirmed/draft pair for one teacher. Dirtiness is a value comparison,
/// never edit history, so editing back to the original values reads clean.
#[derive(Debug, Clone)]
pub struct AssignmentDraft {
    initial: AssignmentState,
    draft: AssignmentState,
}

impl AssignmentDraft {
    pub fn new(initial: AssignmentState) -> Self {
        Self {
            draft: initial.clone(),
            initial,
        }
    }

    pub fn initial(&self) -> &AssignmentState {
        &self.initial
    }

    pub fn draft(&self) -> &AssignmentState {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut AssignmentState {
        &mut self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.initial
    }

    /// Reset the draft to the last confirmed state.
    pub fn discard(&mut self) {
        self.draft = self.initial.clone();
    }

    /// Adopt the draft as the new confirmed state after a successful publish.
    pub fn resync(&mut self) {
        self.initial = self.draft.clone();
    }
}

/// Persistence payload for one teacher: the full resulting assignment set,
/// not a diff, since the backend replaces a teacher's assignments wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentUnit {
    pub teacher_id: String,
    pub subjects: Vec<String>,
    pub grade_levels: Vec<String>,
    pub classes: BTreeMap<String, Vec<String>>,
}

impl AssignmentUnit {
    pub fn from_state(teacher_id: impl Into<String>, state: &AssignmentState) -> Self {
        Self {
            teacher_id: teacher_id.into(),
            subjects: state.subjects.iter().cloned().collect(),
            grade_levels: state.grade_levels.iter().cloned().collect(),
            classes: state
                .classes
                .iter()
                .map(|(grade, selected)| (grade.clone(), selected.iter().cloned().collect()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(subjects: &[&str], grades: &[&str], classes: &[(&str, &[&str])]) -> AssignmentState {
        AssignmentState {
            subjects: subjects.iter().map(|s| s.to_string()).collect(),
            grade_levels: grades.iter().map(|s| s.to_string()).collect(),
            classes: classes
                .iter()
                .map(|(grade, ids)| {
                    (
                        grade.to_string(),
                        ids.iter().map(|s| s.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn removing_a_grade_cascades_to_its_classes() {
        let mut s = state(&["math"], &["grade5"], &[("grade5", &["5a", "5b"])]);

        s.remove_grade_level("grade5");

        assert!(s.grade_levels.is_empty());
        assert!(s.classes.is_empty());

        // Re-selecting the grade starts with an empty class list.
        s.add_grade_level("grade5");
        assert!(s.classes.get("grade5").is_none());
    }

    #[test]
    fn class_under_unselected_grade_is_rejected() {
        let mut s = state(&[], &["grade5"], &[]);

        let err = s.add_class("grade6", "6b").expect_err("guarded");
        assert!(matches!(err, EngineError::Integrity(v) if v.code == "class_without_grade"));
        assert!(s.classes.is_empty());

        s.add_class("grade5", "5a").expect("grade5 is selected");
        assert!(s.classes["grade5"].contains("5a"));
    }

    #[test]
    fn removing_last_class_prunes_the_grade_entry() {
        let mut s = state(&[], &["grade5"], &[("grade5", &["5a"])]);

        s.remove_class("grade5", "5a");

        assert!(s.classes.get("grade5").is_none());
    }

    #[test]
    fn equality_is_order_independent() {
        let mut a = state(&[], &[], &[]);
        a.add_subject("math");
        a.add_subject("physics");
        a.add_grade_level("grade6");
        a.add_grade_level("grade7");
        a.add_class("grade6", "6b").unwrap();
        a.add_class("grade6", "6a").unwrap();

        let mut b = state(&[], &[], &[]);
        b.add_grade_level("grade7");
        b.add_grade_level("grade6");
        b.add_class("grade6", "6a").unwrap();
        b.add_class("grade6", "6b").unwrap();
        b.add_subject("physics");
        b.add_subject("math");

        assert_eq!(a, b);
    }

    #[test]
    fn dirtiness_compares_values_not_history() {
        let initial = state(&["math"], &["grade5"], &[("grade5", &["5a"])]);
        let mut draft = AssignmentDraft::new(initial);
        assert!(!draft.is_dirty());

        draft.draft_mut().add_subject("physics");
        assert!(draft.is_dirty());

        // Editing back to the original values reads clean again.
        draft.draft_mut().remove_subject("physics");
        assert!(!draft.is_dirty());
    }

    #[test]
    fn discard_and_resync_move_between_the_two_states() {
        let initial = state(&["math"], &["grade5"], &[("grade5", &["5a"])]);
        let mut draft = AssignmentDraft::new(initial.clone());

        draft.draft_mut().remove_grade_level("grade5");
        draft.discard();
        assert_eq!(draft.draft(), &initial);
        assert!(!draft.is_dirty());

        draft.draft_mut().add_grade_level("grade6");
        draft.draft_mut().add_class("grade6", "6b").unwrap();
        draft.resync();
        assert!(!draft.is_dirty());
        assert!(draft.initial().grade_levels.contains("grade6"));
    }

    #[test]
    fn integrity_check_flags_orphaned_class_selections() {
        // Bypass the guarded mutations to model a defective caller.
        let broken = state(&[], &["grade5"], &[("grade9", &["9c"])]);

        let violation = broken.check_integrity().expect_err("orphaned classes");
        assert_eq!(violation.code, "class_without_grade");
    }

    #[test]
    fn unit_carries_the_full_resulting_state_in_stable_order() {
        let s = state(
            &["physics", "math"],
            &["grade6"],
            &[("grade6", &["6b", "6a"])],
        );

        let unit = AssignmentUnit::from_state("t-1", &s);

        assert_eq!(unit.teacher_id, "t-1");
        assert_eq!(unit.subjects, vec!["math", "physics"]);
        assert_eq!(unit.grade_levels, vec!["grade6"]);
        assert_eq!(unit.classes["grade6"], vec!["6a", "6b"]);
    }
}
