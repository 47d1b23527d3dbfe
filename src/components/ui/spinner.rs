use icons::LoaderCircle;
use leptos::prelude::*;
use tw_merge::tw_merge;

#[component]
pub fn Spinner(#[prop(into, optional)] class: String) -> impl IntoView {
    let merged_class = tw_merge!("size-4 animate-spin", class);

    view! { <LoaderCircle class=merged_class attr:role="status" attr:aria-label="Loading" /> }
}

/// Spinner followed by a short message, e.g. "Loading stats...".
#[component]
pub fn LoadingLine(#[prop(into)] text: String) -> impl IntoView {
    view! {
        <p class="text-muted-foreground inline-flex items-center gap-2 text-sm">
            <Spinner />
            {text}
        </p>
    }
}
