/// The only cross-view identity token. The key name is shared with the
/// sign-in flow, which writes it before redirecting here.
pub(crate) const USER_ID_KEY: &str = "userId";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn load_user_id_from_storage() -> Option<String> {
    local_storage()?.get_item(USER_ID_KEY).ok().flatten()
}

pub(crate) fn save_user_id_to_storage(user_id: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(USER_ID_KEY, user_id);
    }
}

pub(crate) fn clear_user_id_from_storage() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(USER_ID_KEY);
    }
}
