use crate::components::ui::{
    Button, ButtonSize, Card, CardContent, CardDescription, CardHeader, CardTitle, Input, Label,
    LoadingLine, NativeSelect, Notice, NoticeKind,
};
use crate::models::Gender;
use crate::profile::{
    avatar_url, load_profile, save_profile, upload_avatar, HealthMetrics, ProfileForm,
    DEFAULT_AVATAR_URL,
};
use crate::state::{AppContext, Session};
use crate::util::CancelToken;
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

const REDIRECT_AFTER_SAVE_MS: i32 = 2000;

#[component]
pub(crate) fn ProfilePage(session: Session) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let api_client = app_state.0.api_client;
    let session = StoredValue::new(session);
    let navigate = StoredValue::new(use_navigate());

    let name: RwSignal<String> = RwSignal::new(String::new());
    let email: RwSignal<String> = RwSignal::new(String::new());
    let weight: RwSignal<String> = RwSignal::new(String::new());
    let height: RwSignal<String> = RwSignal::new(String::new());
    let gender: RwSignal<String> = RwSignal::new(String::new());
    let avatar: RwSignal<String> = RwSignal::new(DEFAULT_AVATAR_URL.to_string());

    let notice: RwSignal<Option<(NoticeKind, String)>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);
    let saving: RwSignal<bool> = RwSignal::new(false);
    let uploading: RwSignal<bool> = RwSignal::new(false);

    let cancel = CancelToken::new();
    let cancel_on_unmount = cancel.clone();
    on_cleanup(move || cancel_on_unmount.cancel());
    let cancel = StoredValue::new(cancel);

    let metrics = Memo::new(move |_| {
        HealthMetrics::compute(&weight.get(), &height.get(), Gender::from_form(&gender.get()))
    });

    let current_form = move || ProfileForm {
        name: name.get_untracked(),
        email: email.get_untracked(),
        weight: weight.get_untracked(),
        height: height.get_untracked(),
        gender: Gender::from_form(&gender.get_untracked()),
    };

    // Sign-in hand-off fills name/email before the stored profile arrives.
    Effect::new(move |_| {
        if let Some(user) = app_state.0.signed_in_user.get() {
            if name.get_untracked().is_empty() {
                name.set(user.name);
            }
            if email.get_untracked().is_empty() {
                email.set(user.email);
            }
        }
    });

    Effect::new(move |_| {
        let client = api_client.get_untracked();
        let session = session.get_value();
        let cancel = cancel.get_value();
        loading.set(true);

        spawn_local(async move {
            let result = load_profile(&client, &session).await;
            if cancel.is_cancelled() {
                return;
            }
            loading.set(false);

            match result {
                Ok(record) => {
                    let form = ProfileForm::from_record(&record);
                    name.set(form.name);
                    email.set(form.email);
                    weight.set(form.weight);
                    height.set(form.height);
                    gender.set(form.gender.to_string());
                    avatar.set(avatar_url(&client, record.avatar.as_deref()));
                }
                Err(msg) => notice.set(Some((NoticeKind::Error, msg))),
            }
        });
    });

    let on_save = move |_| {
        if saving.get_untracked() {
            return;
        }
        let form = current_form();
        let client = api_client.get_untracked();
        let session = session.get_value();
        let cancel = cancel.get_value();
        let nav = navigate.get_value();
        saving.set(true);
        notice.set(None);

        spawn_local(async move {
            let result = save_profile(&client, &session, &form).await;
            if cancel.is_cancelled() {
                return;
            }
            saving.set(false);

            match result {
                Ok(msg) => {
                    notice.set(Some((NoticeKind::Success, msg)));
                    let _ = window().set_timeout_with_callback_and_timeout_and_arguments_0(
                        wasm_bindgen::closure::Closure::once_into_js(move || {
                            nav("/", Default::default());
                        })
                        .as_ref()
                        .unchecked_ref(),
                        REDIRECT_AFTER_SAVE_MS,
                    );
                }
                Err(msg) => notice.set(Some((NoticeKind::Error, msg))),
            }
        });
    };

    let on_file = move |ev: web_sys::Event| {
        let Some(file) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
        else {
            notice.set(Some((NoticeKind::Error, "Please select a file.".to_string())));
            return;
        };

        let client = api_client.get_untracked();
        let session = session.get_value();
        let cancel = cancel.get_value();
        uploading.set(true);
        notice.set(None);

        spawn_local(async move {
            let file_name = file.name();
            let result = match JsFuture::from(file.array_buffer()).await {
                Ok(buffer) => {
                    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
                    log!("[Profile] Uploading {file_name} ({} bytes)", bytes.len());
                    upload_avatar(&client, &session, file_name, bytes).await
                }
                Err(_) => Err("Could not read the selected file.".to_string()),
            };
            if cancel.is_cancelled() {
                return;
            }
            uploading.set(false);

            match result {
                Ok(url) => {
                    avatar.set(url);
                    notice.set(Some((
                        NoticeKind::Success,
                        "Profile photo uploaded successfully".to_string(),
                    )));
                }
                Err(msg) => notice.set(Some((NoticeKind::Error, msg))),
            }
        });
    };

    let gender_options = vec![
        (String::new(), "Select gender".to_string()),
        (Gender::Male.to_string(), "Male".to_string()),
        (Gender::Female.to_string(), "Female".to_string()),
    ];

    view! {
        <section class="mx-auto flex w-full max-w-lg flex-col gap-4">
            <h1 class="text-2xl font-bold">"Profile"</h1>

            <Show when=move || loading.get()>
                <LoadingLine text="Loading profile..." />
            </Show>

            <Card>
                <CardHeader>
                    <CardTitle class="text-lg">"Your details"</CardTitle>
                    <CardDescription class="text-xs">
                        "BMI and calories are recalculated as you type."
                    </CardDescription>
                </CardHeader>
                <CardContent>
                    <div class="flex flex-col gap-4">
                        <div class="flex items-center gap-4">
                            <img
                                src=move || avatar.get()
                                alt="Profile"
                                class="size-24 rounded-full border object-cover"
                            />
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="profile-picture">"Profile picture"</Label>
                                <input
                                    id="profile-picture"
                                    type="file"
                                    accept="image/*"
                                    class="text-xs"
                                    disabled=move || uploading.get()
                                    on:change=on_file
                                />
                            </div>
                        </div>

                        <div class="flex flex-col gap-1.5">
                            <Label html_for="profile-name">"Name"</Label>
                            <Input id="profile-name" bind_value=name />
                        </div>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="profile-email">"Email"</Label>
                            <Input id="profile-email" r#type="email" bind_value=email readonly=true />
                        </div>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="profile-gender">"Gender"</Label>
                            <NativeSelect
                                id="profile-gender"
                                options=gender_options
                                value=gender
                                on_value=move |v: String| gender.set(v)
                            />
                        </div>
                        <div class="grid grid-cols-2 gap-3">
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="profile-weight">"Weight (kg)"</Label>
                                <Input id="profile-weight" r#type="number" step="any" bind_value=weight />
                            </div>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="profile-height">"Height (cm)"</Label>
                                <Input id="profile-height" r#type="number" step="any" bind_value=height />
                            </div>
                        </div>
                        <dl class="grid grid-cols-2 gap-3 text-sm">
                            <div class="bg-muted rounded-md px-3 py-2">
                                <dt class="text-muted-foreground text-xs">"BMI"</dt>
                                <dd class="font-semibold">{move || metrics.get().bmi.to_string()}</dd>
                            </div>
                            <div class="bg-muted rounded-md px-3 py-2">
                                <dt class="text-muted-foreground text-xs">"Calories"</dt>
                                <dd class="font-semibold">{move || metrics.get().calories.to_string()}</dd>
                            </div>
                        </dl>

                        {move || {
                            notice.get().map(|(kind, message)| view! { <Notice kind=kind message=message /> })
                        }}

                        <Button
                            size=ButtonSize::Sm
                            attr:disabled=move || saving.get() || loading.get()
                            on:click=on_save
                        >
                            {move || if saving.get() { "Saving..." } else { "Save" }}
                        </Button>
                    </div>
                </CardContent>
            </Card>
        </section>
    }
}
