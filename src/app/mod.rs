use crate::pages::{EditorPage, LoginPage};
use crate::state::{AppContext, AppState, SessionController};
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new();
    provide_context(AppContext(state.clone()));
    provide_context(SessionController::new(AppContext(state.clone())));

    // Single-view app: the editor when a token is present, the login form
    // otherwise. The restored token is trusted optimistically; a stale one
    // is cleared by the first authenticated request.
    let is_authenticated = move || state.api_client.get().is_authenticated();

    view! {
        <Show when=is_authenticated fallback=move || view! { <LoginPage /> }>
            <EditorPage />
        </Show>
    }
}
