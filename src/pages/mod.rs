mod checklist_view;
mod home;
mod low_priority;
mod profile;
mod stats;

pub(crate) use home::HomePage;
pub(crate) use low_priority::LowPriorityPage;
pub(crate) use profile::ProfilePage;
pub(crate) use stats::StatsPage;

use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle,
    Notice, NoticeKind,
};
use crate::state::{AppContext, Session};
use leptos::logging::{error, log};
use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate, use_query_map};
use leptos_router::NavigateOptions;

#[component]
pub fn NavBar() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let location = use_location();
    let is_current = move |href: &'static str| location.pathname.get() == href;

    let links = [
        ("/", "Checklist"),
        ("/low-priority", "Low Priority"),
        ("/stats", "Stats"),
        ("/profile", "Profile"),
    ];

    view! {
        <nav class="border-b bg-background">
            <div class="mx-auto flex h-12 w-full max-w-4xl items-center gap-1 px-4">
                <span class="mr-4 text-sm font-semibold">"Habit Tracker"</span>
                {links
                    .into_iter()
                    .map(|(href, label)| {
                        view! {
                            <a
                                href=href
                                class="rounded-md px-3 py-1.5 text-sm hover:bg-accent"
                                class:bg-accent=move || is_current(href)
                                class:font-medium=move || is_current(href)
                            >
                                {label}
                            </a>
                        }
                    })
                    .collect_view()}
                <div class="flex-1"></div>
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    on:click=move |_| app_state.0.sign_out()
                >
                    "Sign out"
                </Button>
            </div>
        </nav>
    }
}

/// Renders `page` with the resolved session, or a sign-in notice when there
/// is none. Also consumes the `?user=` hand-off from the sign-in redirect.
#[component]
pub(crate) fn RequireSession<F, V>(page: F) -> impl IntoView
where
    F: Fn(Session) -> V + Send + Sync + 'static,
    V: IntoView + 'static,
{
    let app_state = expect_context::<AppContext>();
    let query = use_query_map();
    let location = use_location();
    let navigate = StoredValue::new(use_navigate());
    let bootstrap_error: RwSignal<Option<String>> = RwSignal::new(None);

    Effect::new(move |_| {
        let Some(raw) = query.get().get("user") else {
            return;
        };

        match Session::from_redirect_param(&raw) {
            Ok((session, user)) => {
                log!("[Session] Signed in as {}", session.user_id());
                app_state.0.sign_in(session, Some(user));
                bootstrap_error.set(None);

                // Drop the hand-off from the address bar.
                let path = location.pathname.get_untracked();
                navigate.with_value(|nav| {
                    nav(
                        &path,
                        NavigateOptions {
                            replace: true,
                            ..Default::default()
                        },
                    )
                });
            }
            Err(e) => {
                error!("[Session] {e}");
                bootstrap_error.set(Some(e));
            }
        }
    });

    let session = Memo::new(move |_| app_state.0.session.get());

    move || match session.get() {
        Some(session) => view! {
            <NavBar />
            <main class="mx-auto w-full max-w-4xl px-4 py-6">{page(session)}</main>
        }
        .into_any(),
        None => view! { <SignInRequired error=bootstrap_error.read_only() /> }.into_any(),
    }
}

#[component]
fn SignInRequired(error: ReadSignal<Option<String>>) -> impl IntoView {
    view! {
        <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
            <Card>
                <CardHeader>
                    <CardTitle class="text-lg">"Sign in required"</CardTitle>
                    <CardDescription class="text-xs">
                        "Open the tracker from the sign-in page so your account can be loaded."
                    </CardDescription>
                </CardHeader>
                <CardContent>
                    {move || {
                        error
                            .get()
                            .map(|e| view! { <Notice kind=NoticeKind::Error message=e /> })
                    }}
                </CardContent>
            </Card>
        </div>
    }
}
