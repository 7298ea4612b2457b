use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonVariant, Card, CardContent, CardDescription, CardFooter,
    CardHeader, CardTitle, Input, Label, Spinner,
};
use crate::models::Screenplay;
use crate::state::{AppContext, SessionController};
use crate::storage;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let username: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let is_registering: RwSignal<bool> = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();
    let controller = expect_context::<SessionController>();
    let notice = app_state.0.notice;

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let username_val = username.get_untracked();
        let password_val = password.get_untracked();

        // Mirrors the backend's 400: both fields are required.
        if username_val.trim().is_empty() || password_val.trim().is_empty() {
            error.set(Some("Username and password are required.".to_string()));
            return;
        }

        let registering = is_registering.get_untracked();
        let mut api_client = app_state.0.api_client.get_untracked();
        let app_state = app_state.clone();
        let controller = controller.clone();

        loading.set(true);
        error.set(None);
        notice.set(None);

        spawn_local(async move {
            let result = if registering {
                api_client.register(&username_val, &password_val).await
            } else {
                api_client.login(&username_val, &password_val).await
            };

            match result {
                Ok(response) => {
                    storage::save_session(&response.token, &response.user.username);
                    api_client.set_token(response.token);
                    app_state.0.api_client.set(api_client);
                    app_state
                        .0
                        .current_user
                        .set(Some(response.user.username.clone()));

                    username.set(String::new());
                    password.set(String::new());
                    is_registering.set(false);

                    controller.refresh();
                }
                Err(e) => {
                    // Bad credentials or a taken username: report and leave
                    // the session untouched.
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-md flex-col justify-center px-4 py-12">
                <div class="mb-6">
                    <span class="text-sm font-medium text-foreground">"ScriptWriter"</span>
                </div>

                <Show when=move || notice.get().is_some() fallback=|| ().into_view()>
                    {move || {
                        notice.get().map(|n| view! {
                            <Alert class="mb-4">
                                <AlertDescription>{n}</AlertDescription>
                            </Alert>
                        })
                    }}
                </Show>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-xl">
                            {move || if is_registering.get() { "Create account" } else { "Sign in" }}
                        </CardTitle>
                        <CardDescription>
                            {move || if is_registering.get() {
                                "Pick a username and password to get started."
                            } else {
                                "Use your ScriptWriter account to continue."
                            }}
                        </CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-4" on:submit=on_submit>
                            <div class="flex flex-col gap-2">
                                <Label html_for="username">"Username"</Label>
                                <Input
                                    id="username"
                                    r#type="text"
                                    placeholder="yourname"
                                    bind_value=username
                                    required=true
                                />
                            </div>

                            <div class="flex flex-col gap-2">
                                <Label html_for="password">"Password"</Label>
                                <Input
                                    id="password"
                                    r#type="password"
                                    placeholder="••••••••"
                                    bind_value=password
                                    required=true
                                />
                            </div>

                            <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                                {move || {
                                    error.get().map(|e| view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive">{e}</AlertDescription>
                                        </Alert>
                                    })
                                }}
                            </Show>

                            <Button
                                class="w-full"
                                attr:disabled=move || loading.get()
                            >
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || loading.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || match (loading.get(), is_registering.get()) {
                                        (true, true) => "Creating...",
                                        (true, false) => "Signing in...",
                                        (false, true) => "Register",
                                        (false, false) => "Sign in",
                                    }}
                                </span>
                            </Button>
                        </form>
                    </CardContent>

                    <CardFooter>
                        <div class="text-xs text-muted-foreground">
                            {move || if is_registering.get() {
                                "Already have an account? "
                            } else {
                                "No account? "
                            }}
                            <span
                                class="text-primary underline underline-offset-4 hover:cursor-pointer"
                                on:click=move |_| {
                                    is_registering.update(|v| *v = !*v);
                                    error.set(None);
                                }
                            >
                                {move || if is_registering.get() { "Sign in instead" } else { "Create one" }}
                            </span>
                        </div>
                    </CardFooter>
                </Card>
            </div>
        </div>
    }
}

#[component]
pub fn EditorPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let controller = expect_context::<SessionController>();

    let session = app_state.0.session;
    let current_user = app_state.0.current_user;
    let save_status = app_state.0.save_status;
    let error = app_state.0.error;

    // Initial registry load; reconciliation then picks the most recent entry.
    {
        let controller = controller.clone();
        Effect::new(move |_| {
            controller.refresh();
        });
    }

    // Anything still pending dies with the view.
    {
        let controller = controller.clone();
        on_cleanup(move || {
            controller.cancel_timers();
        });
    }

    let screenplays = move || session.with(|s| s.screenplays().to_vec());
    let selected_id = move || session.with(|s| s.selected_id());
    let has_selection = move || selected_id().is_some();

    let buffer_title = move || session.with(|s| s.buffer().title.clone());
    let buffer_content = move || session.with(|s| s.buffer().content.clone());

    let status_label = move || save_status.get().label();

    let on_select = {
        let controller = controller.clone();
        move |sp: Screenplay| controller.select(&sp)
    };

    let on_delete = {
        let controller = controller.clone();
        move |id: i64| {
            let confirmed = window()
                .confirm_with_message(
                    "Are you sure you want to delete this screenplay? This action cannot be undone.",
                )
                .unwrap_or(false);
            if confirmed {
                controller.remove(id);
            }
        }
    };

    let on_new = {
        let controller = controller.clone();
        move |_| controller.create()
    };
    let on_save = {
        let controller = controller.clone();
        move |_| controller.save_now()
    };
    let on_export = {
        let controller = controller.clone();
        move |_| controller.export_pdf()
    };
    let on_logout = {
        let controller = controller.clone();
        move |_| controller.logout()
    };

    let on_title_input = {
        let controller = controller.clone();
        move |ev: web_sys::Event| controller.on_title_input(&event_target_value(&ev))
    };
    let on_content_input = {
        let controller = controller.clone();
        move |ev: web_sys::Event| controller.on_content_input(&event_target_value(&ev))
    };

    view! {
        <div class="min-h-screen bg-background">
            <header class="flex items-center justify-between border-b px-4 py-3">
                <div class="flex items-baseline gap-4">
                    <h1 class="text-xl font-semibold">"ScriptWriter"</h1>
                    <span class="text-xs text-muted-foreground">
                        {move || {
                            current_user
                                .get()
                                .map(|u| format!("Welcome, {}!", u))
                                .unwrap_or_default()
                        }}
                    </span>
                </div>

                <div class="flex items-center gap-2">
                    <Button on:click=on_new>"New Script"</Button>
                    <Button
                        variant=ButtonVariant::Outline
                        attr:disabled=move || !has_selection()
                        on:click=on_save
                    >
                        "Save Script"
                    </Button>
                    <Button
                        variant=ButtonVariant::Outline
                        attr:disabled=move || !has_selection()
                        on:click=on_export
                    >
                        "Export PDF"
                    </Button>

                    <Show when=move || status_label().is_some() fallback=|| ().into_view()>
                        <span class="w-16 text-center text-xs text-muted-foreground">
                            {move || status_label().unwrap_or_default()}
                        </span>
                    </Show>

                    <Button variant=ButtonVariant::Ghost on:click=on_logout>
                        "Logout"
                    </Button>
                </div>
            </header>

            <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                {move || {
                    error.get().map(|e| view! {
                        <div class="px-4 pt-4">
                            <Alert class="border-destructive/30">
                                <AlertDescription class="text-destructive">{e}</AlertDescription>
                            </Alert>
                        </div>
                    })
                }}
            </Show>

            <div class="flex">
                <aside class="w-64 shrink-0 border-r px-3 py-4">
                    <h2 class="mb-2 px-1 text-sm font-medium">"Your Scripts"</h2>
                    <ul class="flex flex-col gap-1">
                        <Show
                            when=move || !screenplays().is_empty()
                            fallback=|| view! {
                                <li class="px-1 text-xs text-muted-foreground">
                                    "No screenplays yet. Create one!"
                                </li>
                            }
                        >
                            <For
                                each=screenplays
                                key=|sp| (sp.id, sp.updated_at.clone(), sp.title.clone())
                                children={
                                    let on_select = on_select.clone();
                                    let on_delete = on_delete.clone();
                                    move |sp: Screenplay| {
                                        let id = sp.id;
                                        let title = sp.title.clone();
                                        let on_select = on_select.clone();
                                        let on_delete = on_delete.clone();
                                        let is_active = move || selected_id() == Some(id);
                                        view! {
                                            <li
                                                class="group flex items-center justify-between rounded-md px-2 py-1.5 text-sm hover:bg-accent"
                                                class:bg-accent=is_active
                                            >
                                                <span
                                                    class="grow truncate hover:cursor-pointer"
                                                    on:click=move |_| on_select(sp.clone())
                                                >
                                                    {title}
                                                </span>
                                                <button
                                                    class="invisible px-1 text-muted-foreground hover:text-destructive group-hover:visible"
                                                    title="Delete screenplay"
                                                    on:click=move |ev| {
                                                        ev.stop_propagation();
                                                        on_delete(id);
                                                    }
                                                >
                                                    "×"
                                                </button>
                                            </li>
                                        }
                                    }
                                }
                            />
                        </Show>
                    </ul>
                </aside>

                <main class="grow px-6 py-4">
                    <Show
                        when=has_selection
                        fallback=|| view! {
                            <p class="text-sm text-muted-foreground">
                                "Select a screenplay from the left or create a new one to start writing."
                            </p>
                        }
                    >
                        <div class="flex flex-col gap-3">
                            <input
                                type="text"
                                class="w-full rounded-md border border-input bg-transparent px-3 py-2 text-lg font-medium outline-none focus-visible:border-ring"
                                placeholder="Enter Screenplay Title"
                                prop:value=buffer_title
                                on:input=on_title_input.clone()
                            />

                            <textarea
                                class="min-h-[60vh] w-full resize-y rounded-md border border-input bg-transparent px-3 py-2 font-mono text-sm outline-none focus-visible:border-ring"
                                placeholder="Start writing your screenplay here..."
                                prop:value=buffer_content
                                on:input=on_content_input.clone()
                            ></textarea>
                        </div>
                    </Show>
                </main>
            </div>
        </div>
    }
}
