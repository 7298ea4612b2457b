mod api;
mod app;
mod components;
mod editor;
mod models;
mod pages;
mod state;
mod storage;
mod util;

use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(crate::app::App);
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::api::ApiClient;
    use crate::storage;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_session_storage_roundtrip() {
        storage::clear_session();
        assert!(storage::load_session().is_none());

        storage::save_session("jwt-abc", "ada");
        let restored = storage::load_session().expect("session should survive a save");
        assert_eq!(restored.token, "jwt-abc");
        assert_eq!(restored.username, "ada");

        storage::clear_session();
        assert!(storage::load_session().is_none());
    }

    #[wasm_bindgen_test]
    fn test_placeholder_session_not_restored() {
        // A historical bug serialized the string "undefined" into storage;
        // such a record must read back as no-session.
        storage::save_session("undefined", "ada");
        assert!(storage::load_session().is_none());

        storage::save_session("jwt-abc", "");
        assert!(storage::load_session().is_none());

        storage::clear_session();
    }

    #[wasm_bindgen_test]
    fn test_api_client_restores_stored_token() {
        storage::clear_session();
        let client = ApiClient::load_from_storage();
        assert!(!client.is_authenticated());

        storage::save_session("jwt-abc", "ada");
        let client = ApiClient::load_from_storage();
        assert!(client.is_authenticated());

        storage::clear_session();
    }
}
