//! The telemetry dashboard.
//!
//! Owns the device catalog, the current filters and the result state.
//! Every filter change supersedes the invocation in flight; completions
//! carry the sequence token they were started with and stale ones are
//! dropped in `update` (see [`crate::telemetry::ResultState`]).

use chrono::{NaiveDate, Utc};
use common::req::Device;
use yew::prelude::*;

use crate::components::chart_plotly::VolumeChart;
use crate::components::filters::Filters;
use crate::components::kpi::KpiRow;
use crate::error::FetchError;
use crate::telemetry::{self, Aggregate, Metrics, RangePreset, ResultState, Selection};
use crate::{csv, request, utils};

pub enum Msg {
    CatalogLoaded(Result<Vec<Device>, FetchError>),
    SelectionChanged(Selection),
    PresetChanged(RangePreset),
    CustomStartChanged(Option<NaiveDate>),
    CustomEndChanged(Option<NaiveDate>),
    Completed {
        seq: u64,
        outcome: Result<Aggregate, FetchError>,
    },
    ExportCsv,
}

pub struct Dashboard {
    catalog: Option<Vec<Device>>,
    catalog_error: Option<String>,
    selection: Selection,
    preset: RangePreset,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
    results: ResultState,
}

impl Component for Dashboard {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        wasm_bindgen_futures::spawn_local(async move {
            link.send_message(Msg::CatalogLoaded(request::devices().await));
        });

        Self {
            catalog: None,
            catalog_error: None,
            selection: Selection::All,
            preset: RangePreset::All,
            custom_start: None,
            custom_end: None,
            results: ResultState::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::CatalogLoaded(Ok(devices)) => {
                self.catalog = Some(devices);
                self.refresh(ctx);
                true
            }
            Msg::CatalogLoaded(Err(err)) => {
                log::error!("device list fetch failed: {err}");
                self.catalog_error = Some("Failed to fetch device list.".to_string());
                true
            }
            Msg::SelectionChanged(selection) => {
                self.selection = selection;
                self.refresh(ctx);
                true
            }
            Msg::PresetChanged(preset) => {
                self.preset = preset;
                self.refresh(ctx);
                true
            }
            Msg::CustomStartChanged(day) => {
                self.custom_start = day;
                self.refresh(ctx);
                true
            }
            Msg::CustomEndChanged(day) => {
                self.custom_end = day;
                self.refresh(ctx);
                true
            }
            Msg::Completed { seq, outcome } => {
                if let Err(err) = &outcome {
                    log::error!("data fetch failed: {err}");
                }
                // false for overtaken invocations, which must not repaint
                self.results.complete(seq, outcome)
            }
            Msg::ExportCsv => {
                let content = csv::readings_csv(&self.results.aggregate.readings);
                if let Err(err) = utils::download_text(&csv::export_filename(&self.selection), &content)
                {
                    log::error!("csv download failed: {err}");
                }
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let metrics = Metrics::from_total_ml(self.results.aggregate.total_volume_ml);
        let error = self
            .catalog_error
            .clone()
            .or_else(|| {
                self.results
                    .error
                    .as_ref()
                    .map(|_| "Failed to fetch device data.".to_string())
            });

        html! {
            <div class="dashboard">
                <div class="dashboard-header">
                    <h1>{"Device Data Dashboard"}</h1>
                    <button class="btn"
                        disabled={self.results.aggregate.readings.is_empty()}
                        onclick={link.callback(|_| Msg::ExportCsv)}>
                        {"⬇ Download CSV"}
                    </button>
                </div>

                <Filters
                    catalog={self.catalog.clone().unwrap_or_default()}
                    selection={self.selection.clone()}
                    preset={self.preset}
                    custom_start={self.custom_start}
                    custom_end={self.custom_end}
                    on_selection={link.callback(Msg::SelectionChanged)}
                    on_preset={link.callback(Msg::PresetChanged)}
                    on_custom_start={link.callback(Msg::CustomStartChanged)}
                    on_custom_end={link.callback(Msg::CustomEndChanged)}
                />

                <KpiRow {metrics} />

                <div class="panel">
                    <h2>{"Dispense Volume (by day)"}</h2>
                    if let Some(message) = error {
                        <div class="banner banner-error">{message}</div>
                    }
                    if self.results.loading() {
                        <div class="loading">{"Loading data…"}</div>
                    } else if self.results.aggregate.histogram.is_empty() {
                        <div class="empty">{"No usage data to display for this period."}</div>
                    } else {
                        <VolumeChart id="volume-histogram"
                            buckets={self.results.aggregate.histogram.clone()} />
                    }
                </div>
            </div>
        }
    }
}

impl Dashboard {
    /// Start a new invocation for the current filters. Does nothing when
    /// the catalog is missing or a custom bound is absent — by contract
    /// no request is issued and no state changes in that case.
    fn refresh(&mut self, ctx: &Context<Self>) {
        let Some(catalog) = &self.catalog else {
            return;
        };
        let Some((start, end)) =
            telemetry::resolve_range(self.preset, Utc::now(), self.custom_start, self.custom_end)
        else {
            return;
        };

        let ids = self.selection.expand(catalog);
        let seq = self.results.begin();
        let link = ctx.link().clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = telemetry::fetch_aggregate(ids, start, end).await;
            link.send_message(Msg::Completed { seq, outcome });
        });
    }
}
