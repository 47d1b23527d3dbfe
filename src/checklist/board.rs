use crate::api::ApiResult;
use crate::models::{ChecklistGroup, Feeling, PriorityTier, ReflectionDraft};
use std::collections::HashMap;

/// Result of one complete checklist load.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ChecklistSnapshot {
    pub groups: Vec<ChecklistGroup>,

    /// task id -> completed, rebuilt from `groups`.
    pub checked: HashMap<String, bool>,
}

impl ChecklistSnapshot {
    pub fn from_groups(groups: Vec<ChecklistGroup>) -> Self {
        let checked = groups
            .iter()
            .flat_map(|g| g.items.iter())
            .map(|item| (item.id.clone(), item.completed))
            .collect();
        Self { groups, checked }
    }
}

/// View-model behind one checklist view.
///
/// Holds the last committed snapshot plus purely local UI state: the single
/// expanded task and its reflection draft.
#[derive(Clone, Debug, Default)]
pub(crate) struct ChecklistBoard {
    pub groups: Vec<ChecklistGroup>,
    pub checked: HashMap<String, bool>,
    pub loading: bool,
    pub error: Option<String>,

    /// Task whose detail panel is open. At most one.
    pub active_task: Option<String>,
    pub draft: ReflectionDraft,

    tier: PriorityTier,

    /// Bumped per load; only the newest load may commit.
    generation: u64,
}

impl ChecklistBoard {
    pub fn new(tier: PriorityTier) -> Self {
        Self {
            tier,
            ..Self::default()
        }
    }

    pub fn is_checked(&self, task_id: &str) -> bool {
        self.checked.get(task_id).copied().unwrap_or(false)
    }

    pub fn is_active(&self, task_id: &str) -> bool {
        self.active_task.as_deref() == Some(task_id)
    }

    pub fn begin_load(&mut self) -> u64 {
        self.generation = self.generation.saturating_add(1);
        self.loading = true;
        self.error = None;
        self.generation
    }

    /// Commit a finished load. Returns `false` when the result was discarded
    /// because a newer load has started (or the load was cancelled).
    pub fn finish_load(&mut self, generation: u64, result: ApiResult<ChecklistSnapshot>) -> bool {
        if generation != self.generation {
            return false;
        }

        match result {
            Ok(snapshot) => {
                self.groups = snapshot.groups;
                self.checked = snapshot.checked;
            }
            Err(e) if e.is_cancelled() => {
                self.loading = false;
                return false;
            }
            Err(e) => {
                self.error = Some(e.user_message(self.tier.load_error()));
            }
        }

        self.loading = false;
        true
    }

    /// Open `task_id`'s panel, or close it if it is already open. Opening a
    /// different task starts a fresh draft.
    pub fn toggle_expansion(&mut self, task_id: &str) {
        if self.is_active(task_id) {
            self.active_task = None;
        } else {
            self.active_task = Some(task_id.to_string());
            self.draft = ReflectionDraft::default();
        }
    }

    pub fn set_feeling(&mut self, feeling: Feeling) {
        self.draft.feeling = feeling;
    }

    pub fn set_context(&mut self, context: String) {
        self.draft.context = context;
    }

    /// Reflection saved and completion confirmed by the backend.
    pub fn complete_saved(&mut self, task_id: &str) {
        if self.is_active(task_id) {
            self.active_task = None;
            self.draft = ReflectionDraft::default();
        }
    }

    pub fn fail(&mut self, message: String) {
        self.error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::task;
    use crate::api::{ApiError, ApiErrorKind};
    use crate::models::ChecklistType;

    fn snapshot(items: Vec<(&str, bool)>) -> ChecklistSnapshot {
        ChecklistSnapshot::from_groups(vec![ChecklistGroup {
            checklist_type: ChecklistType::Morning,
            items: items
                .into_iter()
                .map(|(id, done)| task(id, id, done))
                .collect(),
        }])
    }

    #[test]
    fn test_snapshot_projection_mirrors_completed_flags() {
        let s = snapshot(vec![("a", true), ("b", false)]);
        assert_eq!(s.checked.len(), 2);
        assert_eq!(s.checked.get("a"), Some(&true));
        assert_eq!(s.checked.get("b"), Some(&false));
    }

    #[test]
    fn test_reload_replaces_projection_instead_of_merging() {
        let mut board = ChecklistBoard::default();
        let g = board.begin_load();
        assert!(board.finish_load(g, Ok(snapshot(vec![("old-1", true), ("old-2", true)]))));

        // Different user / different data on the next load.
        let g = board.begin_load();
        assert!(board.finish_load(g, Ok(snapshot(vec![("new-1", false)]))));

        assert_eq!(board.checked.len(), 1);
        assert!(!board.is_checked("old-1"));
        assert!(!board.is_checked("new-1"));
        assert!(board.checked.contains_key("new-1"));
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut board = ChecklistBoard::default();
        let first = board.begin_load();
        let second = board.begin_load();

        assert!(board.finish_load(second, Ok(snapshot(vec![("fresh", false)]))));
        assert!(!board.finish_load(first, Ok(snapshot(vec![("stale", true)]))));

        assert!(board.checked.contains_key("fresh"));
        assert!(!board.checked.contains_key("stale"));
        assert!(!board.loading);
    }

    #[test]
    fn test_loading_flag_stays_on_until_latest_load_finishes() {
        let mut board = ChecklistBoard::default();
        let first = board.begin_load();
        let second = board.begin_load();
        board.finish_load(first, Ok(ChecklistSnapshot::default()));
        assert!(board.loading);
        board.finish_load(second, Ok(ChecklistSnapshot::default()));
        assert!(!board.loading);
    }

    #[test]
    fn test_failed_load_keeps_previous_groups_and_sets_error() {
        let mut board = ChecklistBoard::default();
        let g = board.begin_load();
        board.finish_load(g, Ok(snapshot(vec![("a", true)])));

        let g = board.begin_load();
        assert!(board.error.is_none());
        board.finish_load(g, Err(ApiError::cancelled()));
        assert!(board.error.is_none());

        let g = board.begin_load();
        board.finish_load(g, Err(ApiError::validation("boom")));
        assert_eq!(board.error.as_deref(), Some("boom"));
        assert!(board.is_checked("a"));
    }

    #[test]
    fn test_expanding_a_then_b_resets_draft_once() {
        let mut board = ChecklistBoard::default();

        board.toggle_expansion("a");
        board.set_feeling(Feeling::Great);
        board.set_context("ran 5k".to_string());
        assert!(board.is_active("a"));

        board.toggle_expansion("b");
        assert!(board.is_active("b"));
        assert!(!board.is_active("a"));
        assert_eq!(board.draft, ReflectionDraft::default());

        board.set_context("second".to_string());
        board.toggle_expansion("b");
        assert!(board.active_task.is_none());
        // Collapsing keeps the draft; only opening another task resets it.
        assert_eq!(board.draft.context, "second");
    }

    #[test]
    fn test_transport_failure_message_depends_on_tier() {
        let unreadable = || ApiError {
            kind: ApiErrorKind::Parse,
            message: "expected value at line 1 column 1".to_string(),
        };

        let mut board = ChecklistBoard::new(PriorityTier::Low);
        let g = board.begin_load();
        board.finish_load(g, Err(unreadable()));
        assert_eq!(
            board.error.as_deref(),
            Some("An error occurred while fetching Low-priority tasks.")
        );

        let mut board = ChecklistBoard::new(PriorityTier::Priority);
        let g = board.begin_load();
        board.finish_load(g, Err(unreadable()));
        assert_eq!(
            board.error.as_deref(),
            Some("An error occurred while fetching the checklist.")
        );
    }

    #[test]
    fn test_failed_save_leaves_completion_and_panel_untouched() {
        let mut board = ChecklistBoard::default();
        let g = board.begin_load();
        board.finish_load(g, Ok(snapshot(vec![("a", false), ("b", true)])));
        board.toggle_expansion("a");
        board.set_context("evening walk".to_string());

        board.fail("Failed to save activity.".to_string());

        assert_eq!(board.error.as_deref(), Some("Failed to save activity."));
        assert!(!board.is_checked("a"));
        assert!(board.is_checked("b"));
        assert!(board.is_active("a"));
        assert_eq!(board.draft.context, "evening walk");
    }

    #[test]
    fn test_complete_saved_collapses_only_the_active_task() {
        let mut board = ChecklistBoard::default();
        board.toggle_expansion("a");
        board.complete_saved("other");
        assert!(board.is_active("a"));
        board.complete_saved("a");
        assert!(board.active_task.is_none());
    }
}
