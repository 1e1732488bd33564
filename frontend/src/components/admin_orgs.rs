//! Organisation management: searchable list, per-selection detail fetch,
//! edit-draft flow and a create flow that prepends and selects the new
//! record.

use common::req::{Organisation, OrganisationPayload};
use yew::prelude::*;

use crate::components::search_bar::{matches, SearchBar};
use crate::{request, utils};

#[derive(Clone, PartialEq, Default)]
struct Draft {
    name: String,
    notes: String,
}

impl Draft {
    fn from_org(org: &Organisation) -> Self {
        Self {
            name: org.name.clone(),
            notes: org.notes.clone().unwrap_or_default(),
        }
    }

    /// Empty notes travel as an explicit null.
    fn payload(&self) -> OrganisationPayload {
        let notes = self.notes.trim();
        OrganisationPayload {
            name: self.name.trim().to_string(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        }
    }
}

#[function_component(AdminOrganisations)]
pub fn admin_organisations() -> Html {
    let orgs = use_state(Vec::<Organisation>::new);
    let query = use_state(String::new);
    let selected = use_state(|| None::<i64>);
    let detail = use_state(|| None::<Organisation>);
    let draft = use_state(|| None::<Draft>);
    let show_create = use_state(|| false);
    let create_draft = use_state(Draft::default);
    let saving = use_state(|| false);
    let error = use_state(|| None::<String>);
    let success = use_state(|| None::<String>);

    // list load, once
    {
        let orgs = orgs.clone();
        let error = error.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match request::organisations().await {
                    Ok(list) => orgs.set(list),
                    Err(err) => {
                        log::error!("organisation list fetch failed: {err}");
                        error.set(Some("Failed to load organisations".to_string()));
                    }
                }
            });
            || ()
        });
    }

    // detail load per selection
    {
        let detail = detail.clone();
        let draft = draft.clone();
        let error = error.clone();
        use_effect_with(*selected, move |selected| {
            draft.set(None);
            match *selected {
                None => detail.set(None),
                Some(id) => {
                    wasm_bindgen_futures::spawn_local(async move {
                        match request::organisation(id).await {
                            Ok(org) => detail.set(Some(org)),
                            Err(err) => {
                                log::error!("organisation {id} fetch failed: {err}");
                                error.set(Some("Failed to load organisation".to_string()));
                            }
                        }
                    });
                }
            }
            || ()
        });
    }

    let filtered: Vec<Organisation> = orgs
        .iter()
        .filter(|o| {
            matches(
                &query,
                &[
                    o.name.as_str(),
                    o.notes.as_deref().unwrap_or_default(),
                    &o.id.to_string(),
                ],
            )
        })
        .cloned()
        .collect();

    let begin_edit = {
        let detail = detail.clone();
        let draft = draft.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(org) = &*detail {
                draft.set(Some(Draft::from_org(org)));
            }
        })
    };

    let cancel_edit = {
        let draft = draft.clone();
        Callback::from(move |_: MouseEvent| draft.set(None))
    };

    let save = {
        let orgs = orgs.clone();
        let selected = selected.clone();
        let detail = detail.clone();
        let draft = draft.clone();
        let saving = saving.clone();
        let error = error.clone();
        let success = success.clone();
        Callback::from(move |_: MouseEvent| {
            let (Some(current), Some(id)) = ((*draft).clone(), *selected) else {
                return;
            };
            let payload = current.payload();
            if payload.name.is_empty() {
                error.set(Some("Please enter an organisation name.".to_string()));
                return;
            }

            saving.set(true);
            error.set(None);
            success.set(None);
            let orgs = orgs.clone();
            let detail = detail.clone();
            let draft = draft.clone();
            let saving = saving.clone();
            let error = error.clone();
            let success = success.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match request::update_organisation(id, &payload).await {
                    Ok(updated) => {
                        orgs.set(
                            orgs.iter()
                                .map(|o| if o.id == id { updated.clone() } else { o.clone() })
                                .collect(),
                        );
                        detail.set(Some(updated));
                        draft.set(None);
                        success.set(Some("Saved changes".to_string()));
                    }
                    Err(err) => {
                        log::error!("organisation save failed: {err}");
                        error.set(Some("Failed to save organisation".to_string()));
                    }
                }
                saving.set(false);
            });
        })
    };

    let create = {
        let orgs = orgs.clone();
        let selected = selected.clone();
        let show_create = show_create.clone();
        let create_draft = create_draft.clone();
        let saving = saving.clone();
        let error = error.clone();
        let success = success.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let payload = create_draft.payload();
            if payload.name.is_empty() {
                error.set(Some("Please enter an organisation name.".to_string()));
                return;
            }

            saving.set(true);
            error.set(None);
            success.set(None);
            let orgs = orgs.clone();
            let selected = selected.clone();
            let show_create = show_create.clone();
            let create_draft = create_draft.clone();
            let saving = saving.clone();
            let error = error.clone();
            let success = success.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match request::create_organisation(&payload).await {
                    Ok(created) => {
                        let mut list = vec![created.clone()];
                        list.extend(orgs.iter().cloned());
                        orgs.set(list);
                        selected.set(Some(created.id));
                        create_draft.set(Draft::default());
                        show_create.set(false);
                        success.set(Some("Organisation created".to_string()));
                    }
                    Err(err) => {
                        log::error!("organisation create failed: {err}");
                        error.set(Some("Failed to create organisation".to_string()));
                    }
                }
                saving.set(false);
            });
        })
    };

    let banners = html! {
        <>
            if let Some(message) = &*error {
                <div class="banner banner-error">{message}</div>
            }
            if let Some(message) = &*success {
                <div class="banner banner-success">{message}</div>
            }
        </>
    };

    // create-only view hides the list/detail panes
    if *show_create {
        let on_name = {
            let create_draft = create_draft.clone();
            Callback::from(move |e: InputEvent| {
                let mut d = (*create_draft).clone();
                d.name = utils::input_value(&e);
                create_draft.set(d);
            })
        };
        let on_notes = {
            let create_draft = create_draft.clone();
            Callback::from(move |e: InputEvent| {
                let mut d = (*create_draft).clone();
                d.notes = utils::textarea_value(&e);
                create_draft.set(d);
            })
        };
        let close = {
            let show_create = show_create.clone();
            Callback::from(move |_: MouseEvent| show_create.set(false))
        };

        return html! {
            <div class="admin-page">
                <div class="admin-header">
                    <h1>{"Organisations"}</h1>
                    <button class="btn" onclick={close.clone()}>{"Close"}</button>
                </div>
                {banners}
                <form class="card" onsubmit={create}>
                    <h2>{"Create new organisation"}</h2>
                    <div class="form-field">
                        <label for="org-name">{"Name"}</label>
                        <input id="org-name" type="text" placeholder="Organisation name"
                            value={create_draft.name.clone()} oninput={on_name} />
                    </div>
                    <div class="form-field">
                        <label for="org-notes">{"Notes"}</label>
                        <textarea id="org-notes" rows="3"
                            placeholder="Optional notes (e.g. billing info, contacts)"
                            value={create_draft.notes.clone()} oninput={on_notes} />
                    </div>
                    <div class="form-actions">
                        <button type="submit" class="btn btn-primary" disabled={*saving}>
                            { if *saving { "Creating…" } else { "Create" } }
                        </button>
                        <button type="button" class="btn" onclick={close}>{"Cancel"}</button>
                    </div>
                </form>
            </div>
        };
    }

    let open_create = {
        let show_create = show_create.clone();
        Callback::from(move |_: MouseEvent| show_create.set(true))
    };

    let list_items: Vec<Html> = filtered
        .iter()
        .map(|o| {
            let active = *selected == Some(o.id);
            let onclick = {
                let selected = selected.clone();
                let id = o.id;
                Callback::from(move |_: MouseEvent| selected.set(Some(id)))
            };
            html! {
                <li>
                    <button type="button" class={if active { "list-row active" } else { "list-row" }} {onclick}>
                        { if o.name.is_empty() { "(No name)" } else { o.name.as_str() } }
                    </button>
                </li>
            }
        })
        .collect();

    let detail_pane = match (&*detail, &*draft) {
        _ if selected.is_none() => html! {
            <div class="card"><p class="muted">{"Select an organisation to view details."}</p></div>
        },
        (None, _) => html! {
            <div class="card"><p class="muted">{"Loading organisation details…"}</p></div>
        },
        (Some(org), editing) => {
            let edit_mode = editing.is_some();
            let shown = editing.clone().unwrap_or_else(|| Draft::from_org(org));

            let on_name = {
                let draft = draft.clone();
                let shown = shown.clone();
                Callback::from(move |e: InputEvent| {
                    let mut d = shown.clone();
                    d.name = utils::input_value(&e);
                    draft.set(Some(d));
                })
            };
            let on_notes = {
                let draft = draft.clone();
                let shown = shown.clone();
                Callback::from(move |e: InputEvent| {
                    let mut d = shown.clone();
                    d.notes = utils::textarea_value(&e);
                    draft.set(Some(d));
                })
            };
            let close = {
                let selected = selected.clone();
                Callback::from(move |_: MouseEvent| selected.set(None))
            };

            html! {
                <div class="card">
                    <div class="admin-header">
                        <h2>{ if org.name.is_empty() { "(No name)" } else { org.name.as_str() } }</h2>
                        if !edit_mode {
                            <button class="btn btn-primary" onclick={begin_edit.clone()}>{"Edit"}</button>
                        }
                    </div>

                    <div class="form-field">
                        <label for="edit-name">{"Name"}</label>
                        <input id="edit-name" type="text" disabled={!edit_mode}
                            value={shown.name.clone()} oninput={on_name} />
                    </div>
                    <div class="form-field">
                        <label for="edit-notes">{"Notes"}</label>
                        <textarea id="edit-notes" rows="4" disabled={!edit_mode}
                            placeholder="Any internal notes about this organisation"
                            value={shown.notes.clone()} oninput={on_notes} />
                    </div>

                    <div class="form-actions">
                        if edit_mode {
                            <button class="btn btn-primary" disabled={*saving} onclick={save.clone()}>
                                { if *saving { "Saving…" } else { "Save changes" } }
                            </button>
                            <button type="button" class="btn" onclick={cancel_edit.clone()}>{"Cancel"}</button>
                        } else {
                            <button type="button" class="btn" onclick={close}>{"Close"}</button>
                        }
                    </div>
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
                <h1>{"Organisations"}</h1>
                <button class="btn btn-primary" onclick={open_create}>{"New Organisation"}</button>
            </div>

            {banners}

            <div class="admin-grid">
                <div class="card">
                    <SearchBar value={(*query).clone()}
                        placeholder="Search organisations by name or notes…"
                        onchange={on_query} />
                    <p class="muted">
                        { format!("{} result{}", filtered.len(), if filtered.len() == 1 { "" } else { "s" }) }
                    </p>
                    <ul class="list">
                        {list_items}
                        if filtered.is_empty() {
                            <li class="muted">{"No matching organisations."}</li>
                        }
                    </ul>
                </div>

                {detail_pane}
            </div>
        </div>
    }
}
