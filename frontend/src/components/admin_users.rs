//! User management: searchable list, read-only detail, edit-draft flow
//! with organisation/role pickers rendered by name.

use common::req::{Organisation, RoleEntry, User};
use yew::prelude::*;

use crate::components::search_bar::{matches, SearchBar};
use crate::{request, utils};

const NOT_ASSIGNED: &str = "Not assigned";

/// In-progress copy of a user while editing; select values are kept as
/// strings until save.
#[derive(Clone, PartialEq, Default)]
struct Draft {
    id: i64,
    email: String,
    name: String,
    organisation_id: String,
    roles_id: String,
}

impl Draft {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            organisation_id: user
                .organisation_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            roles_id: user.roles_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }

    /// Every field except the immutable id must be filled in.
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.organisation_id.is_empty() {
            missing.push("organisation");
        }
        if self.roles_id.is_empty() {
            missing.push("role");
        }
        missing
    }

    fn to_user(&self) -> Option<User> {
        Some(User {
            id: self.id,
            email: self.email.trim().to_string(),
            name: self.name.trim().to_string(),
            organisation_id: Some(self.organisation_id.parse().ok()?),
            roles_id: Some(self.roles_id.parse().ok()?),
        })
    }
}

fn org_name(orgs: &[Organisation], id: Option<i64>) -> String {
    id.and_then(|id| orgs.iter().find(|o| o.id == id))
        .map(|o| o.name.clone())
        .unwrap_or_else(|| NOT_ASSIGNED.to_string())
}

fn role_name(roles: &[RoleEntry], id: Option<i64>) -> String {
    id.and_then(|id| roles.iter().find(|r| r.id == id))
        .map(|r| r.name.clone())
        .unwrap_or_else(|| NOT_ASSIGNED.to_string())
}

#[function_component(AdminUsers)]
pub fn admin_users() -> Html {
    let users = use_state(Vec::<User>::new);
    let orgs = use_state(Vec::<Organisation>::new);
    let roles = use_state(Vec::<RoleEntry>::new);
    let query = use_state(String::new);
    let selected = use_state(|| None::<User>);
    let draft = use_state(|| None::<Draft>);
    let saving = use_state(|| false);
    let error = use_state(|| None::<String>);
    let success = use_state(|| None::<String>);

    // users, organisations and roles load together
    {
        let users = users.clone();
        let orgs = orgs.clone();
        let roles = roles.clone();
        let error = error.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match futures::try_join!(request::users(), request::organisations(), request::roles())
                {
                    Ok((user_list, org_list, role_list)) => {
                        users.set(user_list);
                        orgs.set(org_list);
                        roles.set(role_list);
                    }
                    Err(err) => {
                        log::error!("user screen load failed: {err}");
                        error.set(Some("Failed to load users".to_string()));
                    }
                }
            });
            || ()
        });
    }

    let filtered: Vec<User> = users
        .iter()
        .filter(|u| {
            matches(
                &query,
                &[
                    u.email.as_str(),
                    u.name.as_str(),
                    &org_name(&orgs, u.organisation_id),
                    &role_name(&roles, u.roles_id),
                    &u.id.to_string(),
                ],
            )
        })
        .cloned()
        .collect();

    let begin_edit = {
        let selected = selected.clone();
        let draft = draft.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(user) = &*selected {
                draft.set(Some(Draft::from_user(user)));
            }
        })
    };

    let cancel_edit = {
        let draft = draft.clone();
        Callback::from(move |_: MouseEvent| draft.set(None))
    };

    let save = {
        let users = users.clone();
        let selected = selected.clone();
        let draft = draft.clone();
        let saving = saving.clone();
        let error = error.clone();
        let success = success.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(current) = (*draft).clone() else {
                return;
            };
            let missing = current.missing_fields();
            if !missing.is_empty() {
                error.set(Some(format!("Required: {}.", missing.join(", "))));
                return;
            }
            let Some(payload) = current.to_user() else {
                error.set(Some("Please pick an organisation and a role.".to_string()));
                return;
            };

            saving.set(true);
            error.set(None);
            success.set(None);
            let users = users.clone();
            let selected = selected.clone();
            let draft = draft.clone();
            let saving = saving.clone();
            let error = error.clone();
            let success = success.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match request::update_user(&payload).await {
                    Ok(updated) => {
                        users.set(
                            users
                                .iter()
                                .map(|u| {
                                    if u.id == updated.id {
                                        updated.clone()
                                    } else {
                                        u.clone()
                                    }
                                })
                                .collect(),
                        );
                        selected.set(Some(updated));
                        draft.set(None);
                        success.set(Some("Saved changes".to_string()));
                    }
                    Err(err) => {
                        log::error!("user save failed: {err}");
                        error.set(Some("Failed to save user".to_string()));
                    }
                }
                saving.set(false);
            });
        })
    };

    let list_items: Vec<Html> = filtered
        .iter()
        .map(|u| {
            let active = selected.as_ref().map(|s| s.id) == Some(u.id);
            let onclick = {
                let selected = selected.clone();
                let draft = draft.clone();
                let error = error.clone();
                let success = success.clone();
                let user = u.clone();
                Callback::from(move |_: MouseEvent| {
                    selected.set(Some(user.clone()));
                    draft.set(None);
                    error.set(None);
                    success.set(None);
                })
            };
            html! {
                <li>
                    <button type="button" class={if active { "list-row active" } else { "list-row" }} {onclick}>
                        <div>{&u.email}</div>
                        <div class="muted">{&u.name}</div>
                    </button>
                </li>
            }
        })
        .collect();

    let detail_pane = match &*selected {
        None => html! {
            <div class="card"><p class="muted">{"Select a user to view details."}</p></div>
        },
        Some(user) => {
            let edit_mode = draft.is_some();
            let shown = (*draft)
                .clone()
                .unwrap_or_else(|| Draft::from_user(user));

            let on_email = {
                let draft = draft.clone();
                let shown = shown.clone();
                Callback::from(move |e: InputEvent| {
                    let mut d = shown.clone();
                    d.email = utils::input_value(&e);
                    draft.set(Some(d));
                })
            };
            let on_name = {
                let draft = draft.clone();
                let shown = shown.clone();
                Callback::from(move |e: InputEvent| {
                    let mut d = shown.clone();
                    d.name = utils::input_value(&e);
                    draft.set(Some(d));
                })
            };
            let on_org = {
                let draft = draft.clone();
                let shown = shown.clone();
                Callback::from(move |e: Event| {
                    let mut d = shown.clone();
                    d.organisation_id = utils::select_value(&e);
                    draft.set(Some(d));
                })
            };
            let on_role = {
                let draft = draft.clone();
                let shown = shown.clone();
                Callback::from(move |e: Event| {
                    let mut d = shown.clone();
                    d.roles_id = utils::select_value(&e);
                    draft.set(Some(d));
                })
            };

            let org_options: Vec<Html> = orgs
                .iter()
                .map(|o| {
                    let value = o.id.to_string();
                    html! {
                        <option value={value.clone()} selected={shown.organisation_id == value}>
                            {&o.name}
                        </option>
                    }
                })
                .collect();
            let role_options: Vec<Html> = roles
                .iter()
                .map(|r| {
                    let value = r.id.to_string();
                    html! {
                        <option value={value.clone()} selected={shown.roles_id == value}>
                            {&r.name}
                        </option>
                    }
                })
                .collect();

            html! {
                <div class="card">
                    <div class="admin-header">
                        <h2>{&user.email}</h2>
                        if !edit_mode {
                            <button class="btn btn-primary" onclick={begin_edit.clone()}>{"Edit"}</button>
                        }
                    </div>

                    <div class="form-field">
                        <label>{"User ID"}</label>
                        <input type="text" disabled={true} value={user.id.to_string()} />
                    </div>
                    <div class="form-field">
                        <label for="user-email">{"Email"}</label>
                        <input id="user-email" type="email" disabled={!edit_mode}
                            value={shown.email.clone()} oninput={on_email} />
                    </div>
                    <div class="form-field">
                        <label for="user-name">{"Name"}</label>
                        <input id="user-name" type="text" disabled={!edit_mode}
                            value={shown.name.clone()} oninput={on_name} />
                    </div>
                    <div class="form-field">
                        <label for="user-org">{"Organisation"}</label>
                        if edit_mode {
                            <select id="user-org" class="form-control" onchange={on_org}>
                                <option value="" selected={shown.organisation_id.is_empty()}>
                                    {NOT_ASSIGNED}
                                </option>
                                {org_options}
                            </select>
                        } else {
                            <input type="text" disabled={true}
                                value={org_name(&orgs, user.organisation_id)} />
                        }
                    </div>
                    <div class="form-field">
                        <label for="user-role">{"Role"}</label>
                        if edit_mode {
                            <select id="user-role" class="form-control" onchange={on_role}>
                                <option value="" selected={shown.roles_id.is_empty()}>
                                    {NOT_ASSIGNED}
                                </option>
                                {role_options}
                            </select>
                        } else {
                            <input type="text" disabled={true}
                                value={role_name(&roles, user.roles_id)} />
                        }
                    </div>

                    if edit_mode {
                        <div class="form-actions">
                            <button class="btn btn-primary" disabled={*saving} onclick={save.clone()}>
                                { if *saving { "Saving…" } else { "Save changes" } }
                            </button>
                            <button type="button" class="btn" onclick={cancel_edit.clone()}>{"Cancel"}</button>
                        </div>
                    }
                </div>
            }
        }
    };

    let on_query = {
        let query = query.clone();
        Callback::from(move |value| query.set(value))
    };

    html! {
        <div class="admin-page">
            <div class="admin-header">
                <h1>{"Users"}</h1>
            </div>

            if let Some(message) = &*error {
                <div class="banner banner-error">{message}</div>
            }
            if let Some(message) = &*success {
                <div class="banner banner-success">{message}</div>
            }

            <div class="admin-grid">
                <div class="card">
                    <SearchBar value={(*query).clone()}
                        placeholder="Search users by email, name, organisation or role…"
                        onchange={on_query} />
                    <p class="muted">
                        { format!("{} result{}", filtered.len(), if filtered.len() == 1 { "" } else { "s" }) }
                    </p>
                    <ul class="list">
                        {list_items}
                        if filtered.is_empty() {
                            <li class="muted">{"No matching users."}</li>
                        }
                    </ul>
                </div>

                {detail_pane}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orgs() -> Vec<Organisation> {
        vec![Organisation {
            id: 1,
            name: "Acme".into(),
            notes: None,
        }]
    }

    fn roles() -> Vec<RoleEntry> {
        vec![RoleEntry {
            id: 2,
            name: "admin".into(),
        }]
    }

    #[test]
    fn names_fall_back_to_not_assigned() {
        assert_eq!(org_name(&orgs(), Some(1)), "Acme");
        assert_eq!(org_name(&orgs(), Some(9)), NOT_ASSIGNED);
        assert_eq!(org_name(&orgs(), None), NOT_ASSIGNED);
        assert_eq!(role_name(&roles(), Some(2)), "admin");
        assert_eq!(role_name(&roles(), None), NOT_ASSIGNED);
    }

    #[test]
    fn draft_requires_every_mutable_field() {
        let draft = Draft {
            id: 1,
            email: "a@b.com".into(),
            name: "".into(),
            organisation_id: "1".into(),
            roles_id: "".into(),
        };
        assert_eq!(draft.missing_fields(), vec!["name", "role"]);

        let complete = Draft {
            id: 1,
            email: "a@b.com".into(),
            name: "Alice".into(),
            organisation_id: "1".into(),
            roles_id: "2".into(),
        };
        assert!(complete.missing_fields().is_empty());
        let user = complete.to_user().expect("parses");
        assert_eq!(user.organisation_id, Some(1));
        assert_eq!(user.roles_id, Some(2));
    }

    #[test]
    fn draft_round_trips_a_user() {
        let user = User {
            id: 7,
            email: "a@b.com".into(),
            name: "Alice".into(),
            organisation_id: Some(1),
            roles_id: None,
        };
        let draft = Draft::from_user(&user);
        assert_eq!(draft.organisation_id, "1");
        assert_eq!(draft.roles_id, "");
        assert_eq!(draft.missing_fields(), vec!["role"]);
    }
}
