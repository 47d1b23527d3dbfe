use crate::checklist::{
    create_task, load_checklist, save_reflection_and_complete, ChecklistBoard, NewTaskForm,
};
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardHeader, CardTitle, Input, Label,
    LoadingLine, NativeSelect, Notice, NoticeKind, TaskList, TaskRow, Textarea,
};
use crate::models::{ChecklistGroup, ChecklistType, Feeling, PriorityTier, Task};
use crate::state::{AppContext, Session};
use crate::util::{local_time_label, now_utc, CancelToken};
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

/// Checklist page body shared by the main and low-priority routes. `tier`
/// selects the retrieval endpoint and the priority tag of new tasks.
#[component]
pub(crate) fn ChecklistView(
    session: Session,
    tier: PriorityTier,
    title: &'static str,
    empty_text: &'static str,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let api_client = app_state.0.api_client;
    let session = StoredValue::new(session);

    let board: RwSignal<ChecklistBoard> = RwSignal::new(ChecklistBoard::new(tier));
    let saving: RwSignal<bool> = RwSignal::new(false);

    // Late responses must not touch this view once it is gone.
    let cancel = CancelToken::new();
    let cancel_on_unmount = cancel.clone();
    on_cleanup(move || cancel_on_unmount.cancel());
    let cancel = StoredValue::new(cancel);

    let reload = move || {
        let Some(generation) = board.try_update(|b| b.begin_load()) else {
            return;
        };
        let client = api_client.get_untracked();
        let session = session.get_value();
        let cancel = cancel.get_value();

        spawn_local(async move {
            let result = load_checklist(&client, &session, tier, &cancel).await;
            if cancel.is_cancelled() {
                return;
            }
            board.update(|b| {
                if !b.finish_load(generation, result) {
                    log!("{} Dropped a superseded checklist response", tier.log_tag());
                }
            });
        });
    };

    Effect::new(move |_| reload());

    let on_save = Callback::new(move |(checklist_type, task): (ChecklistType, Task)| {
        if saving.get_untracked() {
            return;
        }
        let draft = board.with_untracked(|b| b.draft.clone());
        let client = api_client.get_untracked();
        let session = session.get_value();
        let cancel = cancel.get_value();
        saving.set(true);

        spawn_local(async move {
            let result = save_reflection_and_complete(
                &client,
                &session,
                checklist_type,
                &task,
                &draft,
                now_utc(),
            )
            .await;
            if cancel.is_cancelled() {
                return;
            }
            saving.set(false);

            match result {
                Ok(()) => {
                    log!("{} Completed task {}", tier.log_tag(), task.id);
                    board.update(|b| b.complete_saved(&task.id));
                    reload();
                }
                Err(msg) => board.update(|b| b.fail(msg)),
            }
        });
    });

    // Narrow projections so typing into a draft does not rebuild the list.
    let groups = Memo::new(move |_| board.with(|b| b.groups.clone()));
    let loading = Memo::new(move |_| board.with(|b| b.loading));
    let error = Memo::new(move |_| board.with(|b| b.error.clone()));

    let render_group = move |group: ChecklistGroup| {
        let checklist_type = group.checklist_type;
        view! {
            <Card>
                <CardHeader>
                    <CardTitle class="text-base">{checklist_type.to_string()}</CardTitle>
                </CardHeader>
                <CardContent>
                    <TaskList>
                        {group
                            .items
                            .into_iter()
                            .map(|task| {
                                view! {
                                    <TaskItem
                                        task=task
                                        checklist_type=checklist_type
                                        board=board
                                        saving=saving
                                        on_save=on_save
                                    />
                                }
                            })
                            .collect_view()}
                    </TaskList>
                </CardContent>
            </Card>
        }
    };

    view! {
        <section class="flex flex-col gap-4">
            <h1 class="text-2xl font-bold">{title}</h1>

            <NewTaskPanel session=session tier=tier cancel=cancel on_created=Callback::new(move |_| reload()) />

            {move || error.get().map(|e| view! { <Notice kind=NoticeKind::Error message=e /> })}

            <Show when=move || loading.get() && groups.with(|g| g.is_empty())>
                <LoadingLine text="Loading checklist..." />
            </Show>

            {move || {
                let groups = groups.get();
                if groups.is_empty() {
                    if loading.get() {
                        return ().into_any();
                    }
                    return view! { <p class="text-muted-foreground text-sm">{empty_text}</p> }
                        .into_any();
                }
                view! {
                    <div class="flex flex-col gap-4">
                        {groups.into_iter().map(render_group).collect_view()}
                    </div>
                }
                .into_any()
            }}
        </section>
    }
}

#[component]
fn TaskItem(
    task: Task,
    checklist_type: ChecklistType,
    board: RwSignal<ChecklistBoard>,
    saving: RwSignal<bool>,
    on_save: Callback<(ChecklistType, Task)>,
) -> impl IntoView {
    let dom_id = format!("task-{}", task.id);
    let task = StoredValue::new(task);

    let checked = Memo::new(move |_| board.with(|b| task.with_value(|t| b.is_checked(&t.id))));
    let is_open = Memo::new(move |_| board.with(|b| task.with_value(|t| b.is_active(&t.id))));

    let on_toggle = move |ev: web_sys::Event| {
        // The box mirrors the backend flag; clicking it only opens the panel.
        if let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        {
            input.set_checked(checked.get_untracked());
        }
        task.with_value(|t| board.update(|b| b.toggle_expansion(&t.id)));
    };

    let checkbox_id = dom_id.clone();
    let label_for = dom_id.clone();

    view! {
        <TaskRow>
            <div class="flex items-center gap-2" class:text-emerald-700=move || checked.get()>
                <input
                    type="checkbox"
                    id=checkbox_id
                    class="size-4"
                    prop:checked=move || checked.get()
                    on:change=on_toggle
                />
                <label
                    r#for=label_for
                    class="text-sm font-medium"
                    class:line-through=move || checked.get()
                >
                    {task.with_value(|t| t.name.clone())}
                </label>
            </div>
            {task
                .with_value(|t| t.note.clone())
                .filter(|n| !n.trim().is_empty())
                .map(|note| view! { <p class="text-muted-foreground pl-6 text-xs">{note}</p> })}
            <Show when=move || is_open.get()>
                <ReflectionPanel
                    dom_id=dom_id.clone()
                    board=board
                    saving=saving
                    on_save=Callback::new(move |_| on_save.run((checklist_type, task.get_value())))
                />
            </Show>
        </TaskRow>
    }
}

#[component]
fn ReflectionPanel(
    dom_id: String,
    board: RwSignal<ChecklistBoard>,
    saving: RwSignal<bool>,
    on_save: Callback<()>,
) -> impl IntoView {
    let feeling = Signal::derive(move || board.with(|b| b.draft.feeling.to_string()));
    let context = Signal::derive(move || board.with(|b| b.draft.context.clone()));

    let feeling_options: Vec<(String, String)> = std::iter::once((String::new(), "Select...".to_string()))
        .chain(Feeling::CHOICES.iter().map(|f| (f.to_string(), f.to_string())))
        .collect();

    let feeling_id = format!("{dom_id}-feeling");
    let context_id = format!("{dom_id}-context");

    view! {
        <div class="bg-muted/40 ml-6 flex flex-col gap-3 rounded-md p-3">
            <div class="flex flex-col gap-1.5">
                <Label html_for=feeling_id.clone()>"Feeling"</Label>
                <NativeSelect
                    id=feeling_id
                    options=feeling_options
                    value=feeling
                    on_value=move |v: String| board.update(|b| b.set_feeling(Feeling::from_form(&v)))
                />
            </div>
            <p class="text-muted-foreground text-xs">"Time: " {local_time_label()}</p>
            <div class="flex flex-col gap-1.5">
                <Label html_for=context_id.clone()>"Context"</Label>
                <Textarea
                    id=context_id
                    placeholder="Enter the context"
                    value=context
                    on_value=move |v: String| board.update(|b| b.set_context(v))
                />
            </div>
            <Button
                size=ButtonSize::Sm
                attr:disabled=move || saving.get()
                on:click=move |_| on_save.run(())
            >
                {move || if saving.get() { "Saving..." } else { "Save" }}
            </Button>
        </div>
    }
}

#[component]
fn NewTaskPanel(
    session: StoredValue<Session>,
    tier: PriorityTier,
    cancel: StoredValue<CancelToken>,
    on_created: Callback<()>,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let open: RwSignal<bool> = RwSignal::new(false);
    let name: RwSignal<String> = RwSignal::new(String::new());
    let note: RwSignal<String> = RwSignal::new(String::new());
    let checklist_type: RwSignal<String> = RwSignal::new(ChecklistType::default().to_string());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let submitting: RwSignal<bool> = RwSignal::new(false);

    let type_options: StoredValue<Vec<(String, String)>> = StoredValue::new(
        ChecklistType::all()
            .into_iter()
            .map(|t| (t.to_string(), t.to_string()))
            .collect(),
    );

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }

        let form = NewTaskForm {
            name: name.get_untracked(),
            note: note.get_untracked(),
            checklist_type: checklist_type
                .get_untracked()
                .parse()
                .unwrap_or_default(),
        };
        let client = app_state.0.api_client.get_untracked();
        let session = session.get_value();
        let cancel = cancel.get_value();

        submitting.set(true);
        error.set(None);

        spawn_local(async move {
            let result = create_task(&client, &session, tier, &form).await;
            if cancel.is_cancelled() {
                return;
            }
            submitting.set(false);

            match result {
                Ok(()) => {
                    log!("{} Added task {:?} to {}", tier.log_tag(), form.name, form.checklist_type);
                    name.set(String::new());
                    note.set(String::new());
                    checklist_type.set(ChecklistType::default().to_string());
                    open.set(false);
                    on_created.run(());
                }
                Err(msg) => error.set(Some(msg)),
            }
        });
    };

    view! {
        <div class="flex flex-col gap-3">
            <div class="flex items-center justify-between">
                <span class="text-muted-foreground text-sm">
                    {match tier {
                        PriorityTier::Priority => "Priority tasks",
                        PriorityTier::Low => "Low priority tasks",
                    }}
                </span>
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    on:click=move |_| open.update(|o| *o = !*o)
                >
                    {move || if open.get() { "Close" } else { "+ Add task" }}
                </Button>
            </div>

            <Show when=move || open.get()>
                <Card>
                    <CardHeader>
                        <CardTitle class="text-base">"Add New Task"</CardTitle>
                    </CardHeader>
                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="new-task-name">"Task name"</Label>
                                <Input
                                    id="new-task-name"
                                    placeholder="Enter the task name"
                                    bind_value=name
                                    required=true
                                />
                            </div>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="new-task-note">"Note"</Label>
                                <Input
                                    id="new-task-note"
                                    placeholder="Enter the task note"
                                    bind_value=note
                                />
                            </div>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="new-task-type">"Checklist type"</Label>
                                <NativeSelect
                                    id="new-task-type"
                                    options=type_options.get_value()
                                    value=checklist_type
                                    on_value=move |v: String| checklist_type.set(v)
                                />
                            </div>

                            {move || error.get().map(|e| view! { <Notice kind=NoticeKind::Error message=e /> })}

                            <Button
                                variant=ButtonVariant::Success
                                size=ButtonSize::Sm
                                attr:disabled=move || submitting.get()
                            >
                                {move || if submitting.get() { "Adding..." } else { "Add Task" }}
                            </Button>
                        </form>
                    </CardContent>
                </Card>
            </Show>
        </div>
    }
}
