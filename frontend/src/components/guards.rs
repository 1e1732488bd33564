//! Route guards evaluated against the locally held session.
//!
//! The session is not re-validated against the backend on navigation;
//! the backend re-checks authorization on every API call anyway.

use yew::prelude::*;
use yew_router::prelude::*;

use crate::session::{self, Session, SessionCtx};
use crate::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Allow,
    ToLogin,
    ToDashboard,
}

pub fn auth_gate(session: Option<&Session>) -> Gate {
    match session {
        Some(_) => Gate::Allow,
        None => Gate::ToLogin,
    }
}

/// Authenticated non-admins are sent to the landing page, not back to
/// login — they are valid users, just not authorized for the screen.
pub fn admin_gate(session: Option<&Session>) -> Gate {
    match session {
        None => Gate::ToLogin,
        Some(s) if s.is_admin() => Gate::Allow,
        Some(_) => Gate::ToDashboard,
    }
}

#[derive(Properties, PartialEq)]
pub struct GuardProps {
    #[prop_or_default]
    pub children: Html,
}

fn render(gate: Gate, requested_path: Option<String>, children: Html) -> Html {
    match gate {
        Gate::Allow => children,
        Gate::ToLogin => {
            if let Some(path) = requested_path {
                session::remember_requested_path(&path);
            }
            html! { <Redirect<Route> to={Route::Login}/> }
        }
        Gate::ToDashboard => html! { <Redirect<Route> to={Route::Dashboard}/> },
    }
}

#[function_component(RequireAuth)]
pub fn require_auth(props: &GuardProps) -> Html {
    let ctx = use_context::<SessionCtx>().expect("session context");
    let path = use_location().map(|l| l.path().to_string());
    render(auth_gate(ctx.session.as_ref()), path, props.children.clone())
}

#[function_component(RequireAdmin)]
pub fn require_admin(props: &GuardProps) -> Html {
    let ctx = use_context::<SessionCtx>().expect("session context");
    let path = use_location().map(|l| l.path().to_string());
    render(admin_gate(ctx.session.as_ref()), path, props.children.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::req::Role;

    fn session(role: Role) -> Session {
        Session {
            email: "a@b.com".into(),
            organisation: None,
            role,
            name: None,
        }
    }

    #[test]
    fn unauthenticated_visitors_go_to_login() {
        assert_eq!(auth_gate(None), Gate::ToLogin);
        assert_eq!(admin_gate(None), Gate::ToLogin);
    }

    #[test]
    fn authenticated_users_pass_the_auth_gate() {
        assert_eq!(auth_gate(Some(&session(Role::User))), Gate::Allow);
        assert_eq!(auth_gate(Some(&session(Role::Admin))), Gate::Allow);
    }

    #[test]
    fn non_admins_are_sent_to_the_dashboard_not_login() {
        assert_eq!(admin_gate(Some(&session(Role::User))), Gate::ToDashboard);
        assert_eq!(admin_gate(Some(&session(Role::Admin))), Gate::Allow);
    }
}
