use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-lg border px-4 py-3 text-sm"}
    clx! {AlertDescription, p, "text-sm leading-relaxed"}
}

pub use components::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Success,
}

/// One-line status message under a form or list.
#[component]
pub fn Notice(kind: NoticeKind, #[prop(into)] message: String) -> impl IntoView {
    let (frame, text) = match kind {
        NoticeKind::Error => ("border-destructive/30", "text-destructive text-xs"),
        NoticeKind::Success => ("border-emerald-500/30", "text-emerald-600 text-xs"),
    };

    view! {
        <Alert class=frame attr:role="status">
            <AlertDescription class=text>{message}</AlertDescription>
        </Alert>
    }
}
