use crate::pages::{HomePage, LowPriorityPage, ProfilePage, RequireSession, StatsPage};
use crate::state::{AppContext, AppState, Session};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    // Router hooks (query map, navigate) used by the pages need <Router>.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("low-priority") view=move || view! {
                    <RequireSession page=|session: Session| view! { <LowPriorityPage session=session /> } />
                } />
                <Route path=path!("profile") view=move || view! {
                    <RequireSession page=|session: Session| view! { <ProfilePage session=session /> } />
                } />
                <Route path=path!("stats") view=move || view! {
                    <RequireSession page=|session: Session| view! { <StatsPage session=session /> } />
                } />
                <Route path=path!("") view=move || view! {
                    <RequireSession page=|session: Session| view! { <HomePage session=session /> } />
                } />
            </Routes>
        </Router>
    }
}
