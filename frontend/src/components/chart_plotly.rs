use plotly::{
    layout::Margin,
    Configuration, Layout, Plot,
};
use yew::prelude::*;

use crate::telemetry::HistogramBucket;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub id: String,
    pub buckets: Vec<HistogramBucket>,
}

/// Daily dispense-volume bar chart. The x axis is re-derived from the
/// bucket day keys, so bucket order in the input does not matter.
#[function_component(VolumeChart)]
pub fn volume_chart(props: &Props) -> Html {
    let id = props.id.clone();
    let p = yew_hooks::use_async::<_, _, ()>({
        let days: Vec<String> = props
            .buckets
            .iter()
            .map(|b| b.day.format("%Y-%m-%d").to_string())
            .collect();
        let volumes: Vec<f64> = props.buckets.iter().map(|b| b.total_volume_ml).collect();

        let mut plot = Plot::new();
        plot.add_trace(plotly::Bar::new(days, volumes).name("Volume (mL)"));
        plot.set_configuration(
            Configuration::default()
                .display_logo(false)
                .editable(false)
                .display_mode_bar(plotly::configuration::DisplayModeBar::Hover),
        );
        plot.set_layout(
            Layout::default()
                .hover_mode(plotly::layout::HoverMode::XUnified)
                .auto_size(true)
                .margin(Margin::default().top(20).bottom(40).left(50).right(20)),
        );

        async move {
            plotly::bindings::new_plot(&id, &plot).await;
            Ok(())
        }
    });

    {
        let p = p.clone();
        // replot whenever the buckets change
        use_effect_with(props.buckets.clone(), move |_| {
            p.run();
            || ()
        });
    }

    html! {
        <div class="chart" id={props.id.clone()}></div>
    }
}
