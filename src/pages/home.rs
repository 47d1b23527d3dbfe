use super::checklist_view::ChecklistView;
use crate::models::PriorityTier;
use crate::state::Session;
use leptos::prelude::*;

#[component]
pub(crate) fn HomePage(session: Session) -> impl IntoView {
    view! {
        <ChecklistView
            session=session
            tier=PriorityTier::Priority
            title="Checklist"
            empty_text="No checklist items available."
        />
    }
}
