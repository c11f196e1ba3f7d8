//! Draft-based reconciliation behind the ClassDesk schedule and
//! teacher-assignment editors: staged edits over an immutable baseline,
//! minimal publish payloads, and a short-lived reference cache. Remote
//! persistence is reached through the collaborator traits in [`store`].

pub mod assign;
pub mod batch;
pub mod cache;
pub mod draft;
pub mod error;
pub mod model;
pub mod reference;
pub mod schedule;
pub mod store;

pub use assign::{AssignmentDraft, AssignmentState, AssignmentUnit};
pub use batch::{BatchCoordinator, BatchOutcome};
pub use cache::ReferenceCache;
pub use draft::{DraftEntry, DraftOverlay, DraftStatus, ResolvedSlot, ScheduleBaseline};
pub use error::{EngineError, IntegrityViolation};
pub use model::{ClassRef, ScheduleEntry, SchedulePayload, SlotKey, TeacherCandidate};
pub use schedule::{PublishOutcome, ScheduleEditor};
pub use store::{AssignmentStore, ReferenceSource, ScheduleStore};
