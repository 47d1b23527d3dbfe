use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Card, div, "bg-card text-card-foreground flex flex-col gap-4 rounded-xl border py-5 shadow-sm"}
    clx! {CardHeader, div, "flex flex-col items-start gap-1.5 px-5"}
    clx! {CardTitle, h2, "leading-none font-semibold"}
    clx! {CardDescription, p, "text-muted-foreground text-sm"}
    clx! {CardContent, div, "px-5"}

    // One checklist-type group and its task rows.
    clx! {TaskList, ul, "flex flex-col divide-y"}
    clx! {TaskRow, li, "flex flex-col gap-2 py-2"}
}

pub use components::*;
