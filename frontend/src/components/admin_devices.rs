//! Device management: the admin catalog with organisation assignment.

use common::req::{Device, Organisation};
use yew::prelude::*;

use crate::components::search_bar::{matches, SearchBar};
use crate::{request, utils};

#[derive(Clone, PartialEq, Default)]
struct Draft {
    device_id: String,
    name: String,
    organisation_id: String,
}

impl Draft {
    fn from_device(device: &Device) -> Self {
        Self {
            device_id: device.device_id.clone(),
            name: device.name.clone(),
            organisation_id: device
                .organisation_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        }
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.organisation_id.is_empty() {
            missing.push("organisation");
        }
        missing
    }

    fn to_device(&self) -> Option<Device> {
        Some(Device {
            device_id: self.device_id.clone(),
            name: self.name.trim().to_string(),
            organisation_id: Some(self.organisation_id.parse().ok()?),
        })
    }
}

fn org_name(orgs: &[Organisation], id: Option<i64>) -> String {
    id.and_then(|id| orgs.iter().find(|o| o.id == id))
        .map(|o| o.name.clone())
        .unwrap_or_else(|| "Not assigned".to_string())
}

#[function_component(AdminDevices)]
pub fn admin_devices() -> Html {
    let devices = use_state(Vec::<Device>::new);
    let orgs = use_state(Vec::<Organisation>::new);
    let query = use_state(String::new);
    let selected = use_state(|| None::<Device>);
    let draft = use_state(|| None::<Draft>);
    let saving = use_state(|| false);
    let error = use_state(|| None::<String>);
    let success = use_state(|| None::<String>);

    {
        let devices = devices.clone();
        let orgs = orgs.clone();
        let error = error.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match futures::try_join!(request::admin_devices(), request::organisations()) {
                    Ok((device_list, org_list)) => {
                        devices.set(device_list);
                        orgs.set(org_list);
                    }
                    Err(err) => {
                        log::error!("device screen load failed: {err}");
                        error.set(Some("Failed to load devices".to_string()));
                    }
                }
            });
            || ()
        });
    }

    let filtered: Vec<Device> = devices
        .iter()
        .filter(|d| matches(&query, &[d.name.as_str(), d.device_id.as_str()]))
        .cloned()
        .collect();

    let begin_edit = {
        let selected = selected.clone();
        let draft = draft.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(device) = &*selected {
                draft.set(Some(Draft::from_device(device)));
            }
        })
    };

    let cancel_edit = {
        let draft = draft.clone();
        Callback::from(move |_: MouseEvent| draft.set(None))
    };

    let save = {
        let devices = devices.clone();
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
            let Some(payload) = current.to_device() else {
                error.set(Some("Please pick an organisation.".to_string()));
                return;
            };

            saving.set(true);
            error.set(None);
            success.set(None);
            let devices = devices.clone();
            let selected = selected.clone();
            let draft = draft.clone();
            let saving = saving.clone();
            let error = error.clone();
            let success = success.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match request::update_device(&payload).await {
                    Ok(updated) => {
                        devices.set(
                            devices
                                .iter()
                                .map(|d| {
                                    if d.device_id == updated.device_id {
                                        updated.clone()
                                    } else {
                                        d.clone()
                                    }
                                })
                                .collect(),
                        );
                        selected.set(Some(updated));
                        draft.set(None);
                        success.set(Some("Saved changes".to_string()));
                    }
                    Err(err) => {
                        log::error!("device save failed: {err}");
                        error.set(Some("Failed to update device".to_string()));
                    }
                }
                saving.set(false);
            });
        })
    };

    let list_items: Vec<Html> = filtered
        .iter()
        .map(|d| {
            let active = selected.as_ref().map(|s| s.device_id.as_str()) == Some(d.device_id.as_str());
            let onclick = {
                let selected = selected.clone();
                let draft = draft.clone();
                let error = error.clone();
                let success = success.clone();
                let device = d.clone();
                Callback::from(move |_: MouseEvent| {
                    selected.set(Some(device.clone()));
                    draft.set(None);
                    error.set(None);
                    success.set(None);
                })
            };
            html! {
                <li>
                    <button type="button" class={if active { "list-row active" } else { "list-row" }} {onclick}>
                        <div>{&d.name}</div>
                        <div class="muted">{format!("ID {}", d.device_id)}</div>
                    </button>
                </li>
            }
        })
        .collect();

    let detail_pane = match &*selected {
        None => html! {
            <div class="card"><p class="muted">{"Select a device to view details."}</p></div>
        },
        Some(device) => {
            let edit_mode = draft.is_some();
            let shown = (*draft)
                .clone()
                .unwrap_or_else(|| Draft::from_device(device));

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

            html! {
                <div class="card">
                    <div class="admin-header">
                        <h2>{&device.name}</h2>
                        if !edit_mode {
                            <button class="btn btn-primary" onclick={begin_edit.clone()}>{"Edit"}</button>
                        }
                    </div>

                    <div class="form-field">
                        <label>{"Device ID"}</label>
                        <input type="text" disabled={true} value={device.device_id.clone()} />
                    </div>
                    <div class="form-field">
                        <label for="device-name">{"Name"}</label>
                        <input id="device-name" type="text" disabled={!edit_mode}
                            value={shown.name.clone()} oninput={on_name} />
                    </div>
                    <div class="form-field">
                        <label for="device-org">{"Organisation"}</label>
                        if edit_mode {
                            <select id="device-org" class="form-control" onchange={on_org}>
                                <option value="" selected={shown.organisation_id.is_empty()}>
                                    {"Not assigned"}
                                </option>
                                {org_options}
                            </select>
                        } else {
                            <input type="text" disabled={true}
                                value={org_name(&orgs, device.organisation_id)} />
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
                <h1>{"Devices"}</h1>
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
                        placeholder="Search devices by name or id…"
                        onchange={on_query} />
                    <p class="muted">
                        { format!("{} result{}", filtered.len(), if filtered.len() == 1 { "" } else { "s" }) }
                    </p>
                    <ul class="list">
                        {list_items}
                        if filtered.is_empty() {
                            <li class="muted">{"No matching devices."}</li>
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

    #[test]
    fn draft_requires_name_and_organisation() {
        let draft = Draft {
            device_id: "7".into(),
            name: " ".into(),
            organisation_id: "".into(),
        };
        assert_eq!(draft.missing_fields(), vec!["name", "organisation"]);
        assert_eq!(draft.to_device(), None);

        let draft = Draft {
            device_id: "7".into(),
            name: "Fountain A".into(),
            organisation_id: "3".into(),
        };
        assert!(draft.missing_fields().is_empty());
        let device = draft.to_device().expect("parses");
        assert_eq!(device.device_id, "7");
        assert_eq!(device.organisation_id, Some(3));
    }
}
