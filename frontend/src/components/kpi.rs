use yew::prelude::*;

use crate::telemetry::Metrics;

#[derive(Properties, PartialEq)]
pub struct CardProps {
    pub label: String,
    pub value: String,
}

#[function_component(KpiCard)]
pub fn kpi_card(props: &CardProps) -> Html {
    html! {
        <div class="kpi-card">
            <p class="kpi-label">{&props.label}</p>
            <p class="kpi-value">{&props.value}</p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct RowProps {
    pub metrics: Metrics,
}

/// The four sustainability cards above the chart.
#[function_component(KpiRow)]
pub fn kpi_row(props: &RowProps) -> Html {
    let m = &props.metrics;
    html! {
        <div class="kpi-row">
            <KpiCard label="Total Volume Dispensed" value={format!("{:.2} L", m.liters)} />
            <KpiCard label="Bottles Saved" value={format!("{:.0}", m.bottles_saved)} />
            <KpiCard label="Plastic Saved (kg)" value={format!("{:.2}", m.plastic_saved_kg)} />
            <KpiCard label="Social Cost of Carbon (€)" value={format!("€{:.2}", m.social_cost_eur)} />
        </div>
    }
}
