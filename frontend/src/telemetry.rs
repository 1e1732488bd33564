//! Dispense-volume aggregation.
//!
//! Given a device selection and a date range, every selected device is
//! fetched concurrently; the merged readings produce a time-ordered flat
//! list, a per-UTC-day histogram and the grand total the sustainability
//! metrics derive from. Histograms are always recomputed client-side from
//! raw readings so bucket boundaries cannot drift from the chart.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use common::req::{Device, Reading};

use crate::{error::FetchError, request};

/// Sentinel value of the device selector meaning "every device".
pub const ALL_DEVICES: &str = "ALL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    One(String),
}

impl Selection {
    pub fn from_value(value: &str) -> Self {
        if value == ALL_DEVICES {
            Selection::All
        } else {
            Selection::One(value.to_string())
        }
    }

    pub fn as_value(&self) -> &str {
        match self {
            Selection::All => ALL_DEVICES,
            Selection::One(id) => id,
        }
    }

    /// Expand to the concrete device ids to fetch.
    pub fn expand(&self, catalog: &[Device]) -> Vec<String> {
        match self {
            Selection::All => catalog.iter().map(|d| d.device_id.clone()).collect(),
            Selection::One(id) => vec![id.clone()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePreset {
    Today,
    ThisWeek,
    ThisMonth,
    LastMonth,
    All,
    Custom,
}

impl RangePreset {
    pub const SELECTABLE: [RangePreset; 6] = [
        RangePreset::Today,
        RangePreset::ThisWeek,
        RangePreset::ThisMonth,
        RangePreset::LastMonth,
        RangePreset::All,
        RangePreset::Custom,
    ];

    pub fn as_value(&self) -> &'static str {
        match self {
            RangePreset::Today => "today",
            RangePreset::ThisWeek => "thisWeek",
            RangePreset::ThisMonth => "thisMonth",
            RangePreset::LastMonth => "lastMonth",
            RangePreset::All => "all",
            RangePreset::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RangePreset::Today => "Today",
            RangePreset::ThisWeek => "This Week",
            RangePreset::ThisMonth => "This Month",
            RangePreset::LastMonth => "Last Month",
            RangePreset::All => "All Data",
            RangePreset::Custom => "Custom Range",
        }
    }

    pub fn from_value(value: &str) -> Self {
        match value {
            "today" => RangePreset::Today,
            "thisWeek" => RangePreset::ThisWeek,
            "thisMonth" => RangePreset::ThisMonth,
            "lastMonth" => RangePreset::LastMonth,
            "custom" => RangePreset::Custom,
            _ => RangePreset::All,
        }
    }
}

fn day_start(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

fn month_start(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap()
}

/// Floor of the "All Data" range, the platform's beginning of recorded time.
pub fn range_floor() -> DateTime<Utc> {
    day_start(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
}

/// Far-future ceiling of the "All Data" range.
pub fn range_ceiling() -> DateTime<Utc> {
    day_start(NaiveDate::from_ymd_opt(2099, 12, 31).unwrap())
}

/// Resolve a preset into concrete bounds. Pure; `now` is injected.
///
/// Returns `None` only for `Custom` with a missing bound — the documented
/// precondition under which no request may be issued at all.
pub fn resolve_range(
    preset: RangePreset,
    now: DateTime<Utc>,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let today = now.date_naive();
    match preset {
        RangePreset::Today => Some((day_start(today), now)),
        RangePreset::ThisWeek => {
            let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
            Some((day_start(monday), now))
        }
        RangePreset::ThisMonth => Some((day_start(month_start(today)), now)),
        RangePreset::LastMonth => {
            let this_month = month_start(today);
            let last_month = month_start(this_month - Duration::days(1));
            Some((
                day_start(last_month),
                day_start(this_month) - Duration::milliseconds(1),
            ))
        }
        RangePreset::All => Some((range_floor(), range_ceiling())),
        RangePreset::Custom => {
            let (start, end) = (custom_start?, custom_end?);
            Some((day_start(start), day_start(end)))
        }
    }
}

/// A reading tagged with the device it came from, for table/CSV rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedReading {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub volume_ml: f64,
}

/// Total volume dispensed during one UTC calendar day, across the whole
/// selection.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBucket {
    pub day: NaiveDate,
    pub total_volume_ml: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregate {
    pub readings: Vec<TaggedReading>,
    pub histogram: Vec<HistogramBucket>,
    pub total_volume_ml: f64,
}

/// Merge per-device reading lists into the flat list, daily histogram and
/// grand total. Pure.
pub fn aggregate(per_device: Vec<(String, Vec<Reading>)>) -> Aggregate {
    let mut readings: Vec<TaggedReading> = per_device
        .into_iter()
        .flat_map(|(device_id, list)| {
            list.into_iter().map(move |r| TaggedReading {
                device_id: device_id.clone(),
                timestamp: r.timestamp,
                volume_ml: r.volume_ml,
            })
        })
        .collect();

    // stable sort: equal timestamps keep their per-device arrival order
    readings.sort_by_key(|r| r.timestamp);

    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut total = 0.0;
    for r in &readings {
        *buckets.entry(r.timestamp.date_naive()).or_insert(0.0) += r.volume_ml;
        total += r.volume_ml;
    }

    Aggregate {
        readings,
        histogram: buckets
            .into_iter()
            .map(|(day, total_volume_ml)| HistogramBucket {
                day,
                total_volume_ml,
            })
            .collect(),
        total_volume_ml: total,
    }
}

/// Sustainability figures derived from the grand total. The conversion
/// factors are fixed platform constants.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub liters: f64,
    pub bottles_saved: f64,
    pub plastic_saved_kg: f64,
    pub social_cost_eur: f64,
}

impl Metrics {
    pub fn from_total_ml(total_volume_ml: f64) -> Self {
        let liters = total_volume_ml / 1000.0;
        let bottles_saved = liters * 2.0;
        let plastic_saved_kg = bottles_saved * 0.02;
        let social_cost_eur = plastic_saved_kg * 0.022;
        Self {
            liters,
            bottles_saved,
            plastic_saved_kg,
            social_cost_eur,
        }
    }
}

/// Fetch raw readings for every id concurrently and aggregate them.
///
/// Fails as a whole if any single fetch fails; partial results are
/// discarded, never merged.
pub async fn fetch_aggregate(
    ids: Vec<String>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Aggregate, FetchError> {
    let fetches = ids.iter().map(|id| request::readings(id, start, end));
    let per_device = futures::future::try_join_all(fetches).await?;
    Ok(aggregate(ids.into_iter().zip(per_device).collect()))
}

/// Result state of the dashboard, updated only by the freshest invocation.
///
/// Every trigger bumps the sequence number; completions carrying an older
/// number are discarded on arrival, so an overtaken request can never
/// clobber newer results.
#[derive(Debug, Default)]
pub struct ResultState {
    pub aggregate: Aggregate,
    pub error: Option<FetchError>,
    seq: u64,
    in_flight: bool,
}

impl ResultState {
    /// Start a new invocation and return its sequence token.
    pub fn begin(&mut self) -> u64 {
        self.seq += 1;
        self.in_flight = true;
        self.error = None;
        self.seq
    }

    pub fn loading(&self) -> bool {
        self.in_flight
    }

    /// Commit a completion. Returns false for stale arrivals, which leave
    /// every field untouched. A failure keeps the previous aggregate.
    pub fn complete(&mut self, seq: u64, outcome: Result<Aggregate, FetchError>) -> bool {
        if seq != self.seq {
            return false;
        }
        self.in_flight = false;
        match outcome {
            Ok(aggregate) => {
                self.aggregate = aggregate;
                self.error = None;
            }
            Err(err) => self.error = Some(err),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().expect("timestamp")
    }

    fn reading(s: &str, volume_ml: f64) -> Reading {
        Reading {
            timestamp: ts(s),
            volume_ml,
        }
    }

    #[test]
    fn histogram_and_flat_list_conserve_the_total() {
        let agg = aggregate(vec![
            (
                "a".into(),
                vec![
                    reading("2024-01-01T08:00:00Z", 250.0),
                    reading("2024-01-02T10:00:00Z", 100.0),
                ],
            ),
            ("b".into(), vec![reading("2024-01-01T23:59:59Z", 150.0)]),
        ]);

        let flat_sum: f64 = agg.readings.iter().map(|r| r.volume_ml).sum();
        let bucket_sum: f64 = agg.histogram.iter().map(|b| b.total_volume_ml).sum();
        assert_eq!(agg.total_volume_ml, 500.0);
        assert_eq!(flat_sum, agg.total_volume_ml);
        assert_eq!(bucket_sum, agg.total_volume_ml);
    }

    #[test]
    fn buckets_group_by_utc_day_across_devices() {
        let agg = aggregate(vec![
            ("a".into(), vec![reading("2024-01-01T08:00:00Z", 250.0)]),
            ("b".into(), vec![reading("2024-01-01T22:00:00Z", 150.0)]),
            ("a".into(), vec![reading("2024-01-02T00:00:00Z", 50.0)]),
        ]);
        assert_eq!(agg.histogram.len(), 2);
        assert_eq!(
            agg.histogram[0].day,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(agg.histogram[0].total_volume_ml, 400.0);
        assert_eq!(agg.histogram[1].total_volume_ml, 50.0);
    }

    #[test]
    fn flat_list_is_time_ordered_regardless_of_fetch_order() {
        let agg = aggregate(vec![
            ("late".into(), vec![reading("2024-03-05T12:00:00Z", 10.0)]),
            ("early".into(), vec![reading("2024-03-01T12:00:00Z", 20.0)]),
            ("middle".into(), vec![reading("2024-03-03T12:00:00Z", 30.0)]),
        ]);
        let order: Vec<&str> = agg.readings.iter().map(|r| r.device_id.as_str()).collect();
        assert_eq!(order, ["early", "middle", "late"]);
    }

    #[test]
    fn all_selection_equals_sum_of_singles() {
        let readings_a = vec![reading("2024-01-01T08:00:00Z", 250.0)];
        let readings_b = vec![reading("2024-01-02T08:00:00Z", 500.0)];

        let single_a = aggregate(vec![("a".into(), readings_a.clone())]);
        let single_b = aggregate(vec![("b".into(), readings_b.clone())]);
        let combined = aggregate(vec![("a".into(), readings_a), ("b".into(), readings_b)]);

        assert_eq!(
            combined.total_volume_ml,
            single_a.total_volume_ml + single_b.total_volume_ml
        );
    }

    #[test]
    fn metric_formulas_are_exact() {
        let m = Metrics::from_total_ml(750.0);
        assert_eq!(m.liters, 0.75);
        assert_eq!(m.bottles_saved, 1.5);
        assert_eq!(m.plastic_saved_kg, 0.03);
        assert_eq!(m.social_cost_eur, 0.03 * 0.022);
        assert!((m.social_cost_eur - 0.00066).abs() < 1e-12);

        let zero = Metrics::from_total_ml(0.0);
        assert_eq!(zero.bottles_saved, 0.0);
        assert_eq!(zero.social_cost_eur, 0.0);
    }

    #[test]
    fn end_to_end_example() {
        let agg = aggregate(vec![(
            "1".into(),
            vec![
                reading("2024-01-01T08:00:00Z", 250.0),
                reading("2024-01-01T09:00:00Z", 500.0),
            ],
        )]);
        assert_eq!(agg.total_volume_ml, 750.0);
        assert_eq!(agg.histogram.len(), 1);
        assert_eq!(
            agg.histogram[0].day,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(agg.histogram[0].total_volume_ml, 750.0);

        let m = Metrics::from_total_ml(agg.total_volume_ml);
        assert_eq!(m.bottles_saved, 1.5);
        assert_eq!(m.plastic_saved_kg, 0.03);
        assert!((m.social_cost_eur - 0.00066).abs() < 1e-12);
    }

    #[test]
    fn custom_without_bounds_resolves_to_nothing() {
        let now = ts("2024-06-15T10:30:00Z");
        let day = NaiveDate::from_ymd_opt(2024, 6, 1);
        assert_eq!(resolve_range(RangePreset::Custom, now, None, None), None);
        assert_eq!(resolve_range(RangePreset::Custom, now, day, None), None);
        assert_eq!(resolve_range(RangePreset::Custom, now, None, day), None);
        assert!(resolve_range(RangePreset::Custom, now, day, day).is_some());
    }

    #[test]
    fn preset_bounds() {
        // a Saturday
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();

        let (start, end) = resolve_range(RangePreset::Today, now, None, None).unwrap();
        assert_eq!(start, ts("2024-06-15T00:00:00Z"));
        assert_eq!(end, now);

        let (start, _) = resolve_range(RangePreset::ThisWeek, now, None, None).unwrap();
        assert_eq!(start, ts("2024-06-10T00:00:00Z")); // Monday

        let (start, _) = resolve_range(RangePreset::ThisMonth, now, None, None).unwrap();
        assert_eq!(start, ts("2024-06-01T00:00:00Z"));

        let (start, end) = resolve_range(RangePreset::LastMonth, now, None, None).unwrap();
        assert_eq!(start, ts("2024-05-01T00:00:00Z"));
        assert_eq!(end, ts("2024-06-01T00:00:00Z") - Duration::milliseconds(1));

        let (start, end) = resolve_range(RangePreset::All, now, None, None).unwrap();
        assert_eq!(start, range_floor());
        assert_eq!(end, range_ceiling());
    }

    #[test]
    fn week_start_on_a_monday_is_that_monday() {
        let monday = Utc.with_ymd_and_hms(2024, 6, 10, 5, 0, 0).unwrap();
        let (start, _) = resolve_range(RangePreset::ThisWeek, monday, None, None).unwrap();
        assert_eq!(start, ts("2024-06-10T00:00:00Z"));
    }

    #[test]
    fn last_month_across_a_year_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let (start, end) = resolve_range(RangePreset::LastMonth, now, None, None).unwrap();
        assert_eq!(start, ts("2023-12-01T00:00:00Z"));
        assert_eq!(end, ts("2024-01-01T00:00:00Z") - Duration::milliseconds(1));
    }

    #[test]
    fn selection_expansion() {
        let catalog = vec![
            Device {
                device_id: "1".into(),
                name: "Fountain A".into(),
                organisation_id: None,
            },
            Device {
                device_id: "2".into(),
                name: "Fountain B".into(),
                organisation_id: None,
            },
        ];
        assert_eq!(Selection::All.expand(&catalog), ["1", "2"]);
        assert_eq!(Selection::One("2".into()).expand(&catalog), ["2"]);
        assert_eq!(Selection::from_value("ALL"), Selection::All);
        assert_eq!(Selection::from_value("7"), Selection::One("7".into()));
    }

    #[test]
    fn stale_completions_are_discarded() {
        let mut state = ResultState::default();
        let first = state.begin();
        let second = state.begin();

        let newer = aggregate(vec![("a".into(), vec![reading("2024-01-01T08:00:00Z", 1.0)])]);
        assert!(state.complete(second, Ok(newer.clone())));
        assert_eq!(state.aggregate, newer);

        // the overtaken invocation resolves afterwards and must not win
        let older = aggregate(vec![("b".into(), vec![reading("2020-01-01T08:00:00Z", 9.0)])]);
        assert!(!state.complete(first, Ok(older)));
        assert_eq!(state.aggregate, newer);
        assert!(state.error.is_none());
    }

    #[test]
    fn failure_keeps_previous_result_and_reports_once() {
        let mut state = ResultState::default();
        let seq = state.begin();
        let good = aggregate(vec![("a".into(), vec![reading("2024-01-01T08:00:00Z", 5.0)])]);
        assert!(state.complete(seq, Ok(good.clone())));

        let seq = state.begin();
        assert!(state.complete(seq, Err(FetchError::Network("boom".into()))));
        assert_eq!(state.aggregate, good);
        assert!(state.error.is_some());
        assert!(!state.loading());
    }
}
