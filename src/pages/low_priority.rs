use super::checklist_view::ChecklistView;
use crate::models::PriorityTier;
use crate::state::Session;
use leptos::prelude::*;

#[component]
pub(crate) fn LowPriorityPage(session: Session) -> impl IntoView {
    view! {
        <ChecklistView
            session=session
            tier=PriorityTier::Low
            title="Low Priority Tasks"
            empty_text="No Low-priority tasks available."
        />
    }
}
