//! Locally persisted proof of identity.
//!
//! The store lives in browser `localStorage` under the same fixed keys the
//! platform has always used; `load` runs once at startup, `store`/`clear`
//! only from the login and logout actions. Components observe the session
//! through a [`SessionCtx`] context value, never by polling the storage.

use common::req::{AuthResponse, Role};
use yew::Callback;

const KEY_EMAIL: &str = "userEmail";
const KEY_ORG: &str = "userOrg";
const KEY_ROLE: &str = "userRole";
const KEY_NAME: &str = "userName";
const KEY_REDIRECT: &str = "postLoginRedirect";

pub const DEFAULT_LANDING: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub email: String,
    pub organisation: Option<String>,
    pub role: Role,
    pub name: Option<String>,
}

impl Session {
    pub fn from_auth(resp: AuthResponse) -> Self {
        Self {
            email: resp.email,
            organisation: resp.org,
            role: Role::from_wire(&resp.role),
            name: resp.name,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Name shown in the navbar; falls back to the email.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

pub enum SessionEvent {
    LoggedIn(Session),
    LoggedOut,
}

/// Context value provided at the application root.
#[derive(Clone, PartialEq)]
pub struct SessionCtx {
    pub session: Option<Session>,
    pub onchange: Callback<SessionEvent>,
}

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Read the persisted identity. A session exists iff an email is present.
pub fn load() -> Option<Session> {
    let storage = storage()?;
    let get = |key| storage.get_item(key).ok().flatten();

    let email = get(KEY_EMAIL)?;
    Some(Session {
        email,
        organisation: get(KEY_ORG),
        role: Role::from_wire(&get(KEY_ROLE).unwrap_or_default()),
        name: get(KEY_NAME),
    })
}

/// Persist all identity fields in one go, as the login handshake requires.
pub fn store(session: &Session) {
    let Some(storage) = storage() else { return };
    let _ = storage.set_item(KEY_EMAIL, &session.email);
    let _ = storage.set_item(KEY_ORG, session.organisation.as_deref().unwrap_or_default());
    let _ = storage.set_item(KEY_ROLE, session.role.as_str());
    let _ = storage.set_item(KEY_NAME, session.name.as_deref().unwrap_or_default());
}

pub fn clear() {
    let Some(storage) = storage() else { return };
    for key in [KEY_EMAIL, KEY_ORG, KEY_ROLE, KEY_NAME, KEY_REDIRECT] {
        let _ = storage.remove_item(key);
    }
}

/// Remember where an unauthenticated visitor wanted to go.
pub fn remember_requested_path(path: &str) {
    if let Some(storage) = storage() {
        let _ = storage.set_item(KEY_REDIRECT, path);
    }
}

/// Consume the remembered path, if any.
pub fn take_requested_path() -> Option<String> {
    let storage = storage()?;
    let path = storage.get_item(KEY_REDIRECT).ok().flatten()?;
    let _ = storage.remove_item(KEY_REDIRECT);
    (!path.is_empty()).then_some(path)
}

/// Where to land after a successful login.
pub fn post_login_target(remembered: Option<String>) -> String {
    remembered.unwrap_or_else(|| DEFAULT_LANDING.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(role: &str) -> AuthResponse {
        AuthResponse {
            email: "a@b.com".into(),
            org: Some("Acme".into()),
            role: role.into(),
            name: Some("Alice".into()),
        }
    }

    #[test]
    fn session_from_auth_maps_role() {
        assert!(Session::from_auth(auth("admin")).is_admin());
        assert!(!Session::from_auth(auth("user")).is_admin());
        assert!(!Session::from_auth(auth("")).is_admin());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let mut s = Session::from_auth(auth("user"));
        assert_eq!(s.display_name(), "Alice");
        s.name = None;
        assert_eq!(s.display_name(), "a@b.com");
    }

    #[test]
    fn post_login_target_defaults_to_dashboard() {
        assert_eq!(post_login_target(None), "/dashboard");
        assert_eq!(
            post_login_target(Some("/admin/users".into())),
            "/admin/users"
        );
    }
}
