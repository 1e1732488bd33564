use chrono::NaiveDate;
use common::req::Device;
use yew::prelude::*;

use crate::telemetry::{RangePreset, Selection, ALL_DEVICES};
use crate::utils;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub catalog: Vec<Device>,
    pub selection: Selection,
    pub preset: RangePreset,
    pub custom_start: Option<NaiveDate>,
    pub custom_end: Option<NaiveDate>,

    pub on_selection: Callback<Selection>,
    pub on_preset: Callback<RangePreset>,
    pub on_custom_start: Callback<Option<NaiveDate>>,
    pub on_custom_end: Callback<Option<NaiveDate>>,
}

/// Device and date-range filters. Any change here re-triggers the
/// aggregation in the parent.
#[function_component(Filters)]
pub fn filters(props: &Props) -> Html {
    let on_device_change = {
        let cb = props.on_selection.clone();
        Callback::from(move |e: Event| {
            cb.emit(Selection::from_value(&utils::select_value(&e)));
        })
    };

    let on_preset_change = {
        let cb = props.on_preset.clone();
        Callback::from(move |e: Event| {
            cb.emit(RangePreset::from_value(&utils::select_value(&e)));
        })
    };

    let on_start_change = {
        let cb = props.on_custom_start.clone();
        Callback::from(move |e: Event| {
            cb.emit(utils::parse_date_input(&utils::input_value(&e)));
        })
    };

    let on_end_change = {
        let cb = props.on_custom_end.clone();
        Callback::from(move |e: Event| {
            cb.emit(utils::parse_date_input(&utils::input_value(&e)));
        })
    };

    let device_options: Vec<Html> = std::iter::once(html! {
        <option value={ALL_DEVICES} selected={props.selection == Selection::All}>
            {"All Devices"}
        </option>
    })
    .chain(props.catalog.iter().map(|d| {
        let selected = props.selection == Selection::One(d.device_id.clone());
        html! {
            <option value={d.device_id.clone()} {selected}>{&d.name}</option>
        }
    }))
    .collect();

    let preset_options: Vec<Html> = RangePreset::SELECTABLE
        .iter()
        .map(|p| {
            html! {
                <option value={p.as_value()} selected={*p == props.preset}>{p.label()}</option>
            }
        })
        .collect();

    html! {
        <div class="filters">
            <div class="filter">
                <label for="device-select">{"Select a device"}</label>
                <select id="device-select" class="form-control" onchange={on_device_change}>
                    {device_options}
                </select>
            </div>

            <div class="filter">
                <label for="range-select">{"Select time range"}</label>
                <select id="range-select" class="form-control" onchange={on_preset_change}>
                    {preset_options}
                </select>
            </div>

            if props.preset == RangePreset::Custom {
                <div class="filter">
                    <label>{"Custom range"}</label>
                    <div class="filter-dates">
                        <input type="date" class="form-control"
                            onchange={on_start_change}
                            value={props.custom_start.map(utils::format_date_input).unwrap_or_default()}
                        />
                        <input type="date" class="form-control"
                            onchange={on_end_change}
                            value={props.custom_end.map(utils::format_date_input).unwrap_or_default()}
                            min={props.custom_start.map(utils::format_date_input).unwrap_or_default()}
                        />
                    </div>
                </div>
            }
        </div>
    }
}
