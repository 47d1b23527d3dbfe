mod api;
mod app;
mod charts;
mod checklist;
mod components;
mod models;
mod pages;
mod profile;
mod state;
mod stats;
mod storage;
mod util;

use crate::app::App;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::state::{Session, UserId};
    use crate::storage::load_user_id_from_storage;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_session_storage_roundtrip() {
        Session::clear_storage();
        assert!(Session::load_from_storage().is_none());

        let session = Session::new(UserId::parse("64f0c2").expect("valid id"));
        session.save_to_storage();

        let loaded = Session::load_from_storage().expect("session should load from localStorage");
        assert_eq!(loaded.user_id(), "64f0c2");

        Session::clear_storage();
        assert!(load_user_id_from_storage().is_none());
    }

    #[wasm_bindgen_test]
    fn test_blank_stored_id_is_not_a_session() {
        crate::storage::save_user_id_to_storage("   ");
        assert!(Session::load_from_storage().is_none());
        Session::clear_storage();
    }
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
