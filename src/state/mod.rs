use crate::api::ApiClient;
use crate::storage::{clear_user_id_from_storage, load_user_id_from_storage, save_user_id_to_storage};
use leptos::prelude::*;
use serde::Deserialize;

/// Backend user id. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct UserId(String);

impl UserId {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identity threaded into every view that talks to the backend.
///
/// Pages take a `Session` as a required prop; the router only builds them
/// once one has been resolved, so "no user id" cannot reach a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Session {
    pub user_id: UserId,
}

/// User object handed over by the sign-in redirect (`?user=<json>`).
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct SignedInUser {
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Session {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    pub fn load_from_storage() -> Option<Self> {
        load_user_id_from_storage()
            .as_deref()
            .and_then(UserId::parse)
            .map(Self::new)
    }

    pub fn save_to_storage(&self) {
        save_user_id_to_storage(self.user_id());
    }

    pub fn clear_storage() {
        clear_user_id_from_storage();
    }

    /// Parse the `user` query parameter written by the sign-in redirect.
    /// The id arrives either as a string or as a number.
    pub fn from_redirect_param(raw: &str) -> Result<(Self, SignedInUser), String> {
        let user: SignedInUser = serde_json::from_str(raw)
            .map_err(|e| format!("Failed to parse user data: {e}"))?;

        let id = match &user.id {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => String::new(),
        };

        let user_id = UserId::parse(&id).ok_or_else(|| "User data is missing an id".to_string())?;
        Ok((Self::new(user_id), user))
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// Resolved identity; `None` until the user has signed in.
    pub session: RwSignal<Option<Session>>,

    /// Name/email handed over by the sign-in redirect, used to prefill the
    /// profile form before the backend profile arrives.
    pub signed_in_user: RwSignal<Option<SignedInUser>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            api_client: RwSignal::new(ApiClient::from_env()),
            session: RwSignal::new(Session::load_from_storage()),
            signed_in_user: RwSignal::new(None),
        }
    }

    pub fn sign_in(&self, session: Session, user: Option<SignedInUser>) {
        session.save_to_storage();
        self.session.set(Some(session));
        self.signed_in_user.set(user);
    }

    pub fn sign_out(&self) {
        Session::clear_storage();
        self.session.set(None);
        self.signed_in_user.set(None);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_rejects_blank() {
        assert!(UserId::parse("   ").is_none());
        assert_eq!(UserId::parse(" u1 ").unwrap().as_str(), "u1");
    }

    #[test]
    fn test_redirect_param_with_string_id() {
        let (session, user) =
            Session::from_redirect_param(r#"{"id":"abc123","name":"Ann","email":"ann@example.com"}"#)
                .expect("should parse");
        assert_eq!(session.user_id(), "abc123");
        assert_eq!(user.name, "Ann");
        assert_eq!(user.email, "ann@example.com");
    }

    #[test]
    fn test_redirect_param_with_numeric_id() {
        let (session, _) = Session::from_redirect_param(r#"{"id":42}"#).expect("should parse");
        assert_eq!(session.user_id(), "42");
    }

    #[test]
    fn test_redirect_param_rejects_missing_id_and_bad_json() {
        assert!(Session::from_redirect_param(r#"{"name":"x"}"#).is_err());
        assert!(Session::from_redirect_param("not json").is_err());
    }
}
