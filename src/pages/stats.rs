use crate::charts::{ChartSlot, CompletionChart, MountedChart, PriorityChart};
use crate::components::ui::{Card, CardContent, Input, Label, LoadingLine, NativeSelect, Notice, NoticeKind};
use crate::models::Report;
use crate::state::{AppContext, Session};
use crate::stats::{load_report, StatsCategory};
use crate::util::{format_form_date, parse_form_date, today_utc, CancelToken};
use leptos::html;
use leptos::logging::{log, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub(crate) fn StatsPage(session: Session) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let api_client = app_state.0.api_client;
    let session = StoredValue::new(session);

    let category: RwSignal<String> = RwSignal::new(StatsCategory::All.to_string());
    let date: RwSignal<String> = RwSignal::new(format_form_date(today_utc()));

    let report: RwSignal<Option<Report>> = RwSignal::new(None);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);
    let request_id: RwSignal<u64> = RwSignal::new(0);

    let cancel = CancelToken::new();
    let cancel_on_unmount = cancel.clone();
    on_cleanup(move || cancel_on_unmount.cancel());
    let cancel = StoredValue::new(cancel);

    // Refetch whenever either filter changes.
    Effect::new(move |_| {
        let selected: StatsCategory = category.get().parse().unwrap_or_default();
        let raw_date = date.get();
        let Some(day) = parse_form_date(&raw_date) else {
            warn!("[Stats] Ignoring unparseable date {raw_date:?}");
            return;
        };

        let req_id = request_id.get_untracked().saturating_add(1);
        request_id.set(req_id);

        let client = api_client.get_untracked();
        let session = session.get_value();
        let cancel = cancel.get_value();
        loading.set(true);
        error.set(None);

        spawn_local(async move {
            let result = load_report(&client, &session, selected, day, today_utc()).await;

            // Ignore stale responses.
            if cancel.is_cancelled() || request_id.get_untracked() != req_id {
                return;
            }
            loading.set(false);

            match result {
                Ok(data) => {
                    log!("[Stats] Loaded report for {} - {}", data.date, data.checklist_type);
                    report.set(Some(data));
                }
                Err(msg) => {
                    report.set(None);
                    error.set(Some(msg));
                }
            }
        });
    });

    let completion_ref: NodeRef<html::Div> = NodeRef::new();
    let priority_ref: NodeRef<html::Div> = NodeRef::new();
    let completion_slot = StoredValue::new_local(ChartSlot::<MountedChart>::default());
    let priority_slot = StoredValue::new_local(ChartSlot::<MountedChart>::default());

    // Each new report replaces both chart instances; no report clears them.
    Effect::new(move |_| {
        let current = report.get();
        let (Some(completion_el), Some(priority_el)) = (completion_ref.get(), priority_ref.get())
        else {
            return;
        };

        match current {
            Some(data) => {
                completion_slot.update_value(|slot| {
                    slot.render(|| {
                        MountedChart::completion(
                            completion_el.into(),
                            CompletionChart::from_report(&data),
                        )
                    })
                });
                priority_slot.update_value(|slot| {
                    slot.render(|| {
                        MountedChart::priority(priority_el.into(), PriorityChart::from_report(&data))
                    })
                });
            }
            None => {
                if completion_slot.with_value(|slot| slot.is_occupied()) {
                    log!("[Stats] Clearing charts");
                }
                completion_slot.update_value(|slot| slot.clear());
                priority_slot.update_value(|slot| slot.clear());
            }
        }
    });

    let category_options: Vec<(String, String)> = StatsCategory::options()
        .into_iter()
        .map(|c| (c.to_string(), c.to_string()))
        .collect();
    let max_date = format_form_date(today_utc());

    view! {
        <section class="flex flex-col gap-4">
            <h1 class="text-2xl font-bold">"Stats Overview"</h1>

            <div class="flex flex-wrap items-end gap-4">
                <div class="flex flex-col gap-1.5">
                    <Label html_for="stats-checklist">"Checklist"</Label>
                    <NativeSelect
                        id="stats-checklist"
                        class="w-44"
                        options=category_options
                        value=category
                        on_value=move |v: String| category.set(v)
                    />
                </div>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="stats-date">"Date"</Label>
                    <Input id="stats-date" r#type="date" class="w-44" max=max_date bind_value=date />
                </div>
            </div>

            {move || error.get().map(|e| view! { <Notice kind=NoticeKind::Error message=e /> })}

            <Show when=move || loading.get()>
                <LoadingLine text="Loading stats..." />
            </Show>

            <Show when=move || !loading.get() && report.with(|r| r.is_none()) && error.with(|e| e.is_none())>
                <p class="text-muted-foreground text-sm">"No data available."</p>
            </Show>

            {move || {
                report
                    .get()
                    .map(|r| {
                        view! {
                            <p class="text-muted-foreground text-sm">
                                {format!("Report for {} - {}", r.date, r.checklist_type)}
                            </p>
                        }
                    })
            }}

            // Chart containers stay mounted so the slots always have a target.
            <div class:hidden=move || report.with(|r| r.is_none())>
                <Card>
                    <CardContent>
                        <div class="grid grid-cols-1 gap-6 md:grid-cols-2">
                            <div node_ref=completion_ref class="flex min-h-64 justify-center"></div>
                            <div node_ref=priority_ref class="flex min-h-64 justify-center"></div>
                        </div>
                    </CardContent>
                </Card>
            </div>
        </section>
    }
}
