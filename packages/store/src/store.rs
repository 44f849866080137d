//! The filterable accident store.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime};
use geo::Point;
use traffic_map_accident_models::{
    AccidentRecord, AccidentSeverity, AccidentView, ClosestHospital, HospitalRecord,
    HospitalView, SeverityCount,
};
use traffic_map_projection::Transformer;
use traffic_map_source::accidents::load_accidents;
use traffic_map_source::config::DatasetConfig;
use traffic_map_source::hospitals::load_hospitals;
use traffic_map_source::{ParsedAccident, ParsedHospital};
use traffic_map_spatial::NearestHospitalFinder;

use crate::observer::{FilterChange, ViewObserver};
use crate::{DataLoadError, StoreOptions};

/// Accidents and hospitals in the plot CRS, plus the current filter state.
///
/// The raw datasets never change after construction. The date bounds are
/// both exclusive; the casualty range includes its start and excludes its
/// end. An inverted or zero-width range simply yields an empty view.
pub struct GeoFilterStore {
    accidents: Vec<AccidentRecord>,
    hospitals: Vec<HospitalRecord>,
    boundary_dates: (NaiveDateTime, NaiveDateTime),
    max_casualties: u32,
    date_range: (NaiveDateTime, NaiveDateTime),
    casualty_range: (u32, u32),
    /// Indices into `accidents` that pass both filters.
    filtered: Vec<usize>,
    severity_counts: Vec<SeverityCount>,
    version: u64,
    observers: Vec<Arc<dyn ViewObserver>>,
}

impl GeoFilterStore {
    /// Reads both dataset files named by `config` and builds the store.
    ///
    /// # Errors
    ///
    /// Returns [`DataLoadError::Source`] if a file is missing, unreadable or
    /// lacks a required column, and [`DataLoadError::NoValidRows`] if either
    /// dataset is empty after cleaning.
    pub fn load(config: &DatasetConfig) -> Result<Self, DataLoadError> {
        let accidents = load_accidents(&config.accidents.path)?;
        let hospitals = load_hospitals(&config.hospitals.path, &config.hospitals.format)?;
        Self::from_parsed(accidents, hospitals, &StoreOptions::from(config))
    }

    /// Builds the store from already-parsed rows.
    ///
    /// Rows whose position cannot be reprojected are dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`DataLoadError::NoValidRows`] if no hospital or no accident
    /// survives reprojection.
    pub fn from_parsed(
        accidents: Vec<ParsedAccident>,
        hospitals: Vec<ParsedHospital>,
        options: &StoreOptions,
    ) -> Result<Self, DataLoadError> {
        let hospitals = project_hospitals(
            hospitals,
            Transformer::new(options.hospital_crs, options.target_crs),
        );
        if hospitals.is_empty() {
            return Err(DataLoadError::NoValidRows {
                dataset: "hospital",
            });
        }

        let positions: Vec<Point<f64>> =
            hospitals.iter().map(|h| Point::new(h.x, h.y)).collect();
        let finder = NearestHospitalFinder::new(options.nearest_strategy, &positions);
        let transformer = Transformer::new(options.accident_crs, options.target_crs);

        let total = accidents.len();
        let mut records = Vec::with_capacity(total);
        for accident in accidents {
            let position = match transformer.transform(accident.longitude, accident.latitude) {
                Ok(position) => position,
                Err(e) => {
                    log::warn!("Dropping accident {}: {e}", accident.id);
                    continue;
                }
            };
            let Some(nearest) = finder.nearest(position) else {
                log::warn!("Dropping accident {}: no closest hospital", accident.id);
                continue;
            };

            records.push(AccidentRecord {
                id: accident.id,
                longitude: accident.longitude,
                latitude: accident.latitude,
                x: position.x(),
                y: position.y(),
                severity: accident.severity,
                vehicles: accident.vehicles,
                casualties: accident.casualties,
                weather: accident.weather,
                occurred_at: accident.occurred_at,
                casualty_weight: accident.casualties.saturating_mul(3),
                closest_hospital: ClosestHospital {
                    index: nearest.index,
                    name: hospitals[nearest.index].name.clone(),
                    distance_km: nearest.distance_km,
                },
            });
        }

        let Some(max_casualties) = records.iter().map(|r| r.casualties).max() else {
            return Err(DataLoadError::NoValidRows {
                dataset: "accident",
            });
        };

        let mut timestamps: Vec<NaiveDateTime> = records.iter().map(|r| r.occurred_at).collect();
        timestamps.sort_unstable();
        let last = timestamps.len() - 1;
        let boundary_dates = (
            timestamps[options.default_start_offset.min(last)],
            timestamps[last],
        );

        log::info!(
            "Store ready: {} of {total} accidents, {} hospitals, dates {} to {}",
            records.len(),
            hospitals.len(),
            boundary_dates.0,
            boundary_dates.1
        );

        let mut store = Self {
            accidents: records,
            hospitals,
            boundary_dates,
            max_casualties,
            date_range: boundary_dates,
            casualty_range: (0, max_casualties),
            filtered: Vec::new(),
            severity_counts: Vec::new(),
            version: 0,
            observers: Vec::new(),
        };
        store.recompute();
        Ok(store)
    }

    /// Sets the date bounds from Unix-epoch milliseconds, read as UTC
    /// wall-clock time. Values beyond the representable range clamp to it.
    pub fn set_date_range(&mut self, start_millis: i64, end_millis: i64) {
        self.set_date_bounds(from_millis(start_millis), from_millis(end_millis));
    }

    /// Sets the exclusive date bounds directly.
    pub fn set_date_bounds(&mut self, start: NaiveDateTime, end: NaiveDateTime) {
        self.date_range = (start, end);
        self.refresh(FilterChange::DateRange);
    }

    /// Sets the casualty range; `start` is inclusive and `end` exclusive.
    pub fn set_casualty_range(&mut self, start: u32, end: u32) {
        self.casualty_range = (start, end);
        self.refresh(FilterChange::CasualtyRange);
    }

    /// Accidents passing the current filters, in dataset order.
    #[must_use]
    pub fn filtered_view(&self) -> Vec<&AccidentRecord> {
        self.filtered.iter().map(|&i| &self.accidents[i]).collect()
    }

    /// The filtered accidents as serializable output rows.
    #[must_use]
    pub fn accident_view(&self) -> Vec<AccidentView> {
        self.filtered
            .iter()
            .map(|&i| AccidentView::from(&self.accidents[i]))
            .collect()
    }

    /// Per-severity counts over the filtered view, descending by count and
    /// then ascending by severity code. Severities with no records are
    /// omitted.
    #[must_use]
    pub fn severity_counts(&self) -> &[SeverityCount] {
        &self.severity_counts
    }

    /// Default date bounds derived from the full dataset.
    #[must_use]
    pub const fn boundary_dates(&self) -> (NaiveDateTime, NaiveDateTime) {
        self.boundary_dates
    }

    #[must_use]
    pub const fn max_casualties(&self) -> u32 {
        self.max_casualties
    }

    #[must_use]
    pub const fn date_range(&self) -> (NaiveDateTime, NaiveDateTime) {
        self.date_range
    }

    #[must_use]
    pub const fn casualty_range(&self) -> (u32, u32) {
        self.casualty_range
    }

    /// Every accident that survived cleaning, regardless of filters.
    #[must_use]
    pub fn accidents(&self) -> &[AccidentRecord] {
        &self.accidents
    }

    #[must_use]
    pub fn hospitals(&self) -> &[HospitalRecord] {
        &self.hospitals
    }

    #[must_use]
    pub fn hospital_view(&self) -> Vec<HospitalView> {
        self.hospitals.iter().map(HospitalView::from).collect()
    }

    /// Incremented after every recomputation. Starts at 0.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Registers an observer notified after every recomputation.
    pub fn subscribe(&mut self, observer: Arc<dyn ViewObserver>) {
        self.observers.push(observer);
    }

    fn refresh(&mut self, change: FilterChange) {
        self.recompute();
        self.version += 1;
        log::debug!(
            "Recomputed view v{} after {change:?}: {} of {} accidents",
            self.version,
            self.filtered.len(),
            self.accidents.len()
        );
        for observer in &self.observers {
            observer.view_changed(self.version, change, self.filtered.len());
        }
    }

    fn recompute(&mut self) {
        let (start, end) = self.date_range;
        let (low, high) = self.casualty_range;

        self.filtered = self
            .accidents
            .iter()
            .enumerate()
            .filter(|(_, r)| start < r.occurred_at && r.occurred_at < end)
            .filter(|(_, r)| low <= r.casualties && r.casualties < high)
            .map(|(i, _)| i)
            .collect();

        let mut counts = [0u64; 3];
        for &i in &self.filtered {
            counts[severity_slot(self.accidents[i].severity)] += 1;
        }

        let mut severity_counts: Vec<SeverityCount> = AccidentSeverity::all()
            .iter()
            .map(|&severity| (severity, counts[severity_slot(severity)]))
            .filter(|(_, count)| *count > 0)
            .map(|(severity, count)| SeverityCount::new(severity, count))
            .collect();
        severity_counts.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.severity.value().cmp(&b.severity.value()))
        });
        self.severity_counts = severity_counts;
    }
}

fn severity_slot(severity: AccidentSeverity) -> usize {
    usize::from(severity.value() - 1)
}

fn from_millis(millis: i64) -> NaiveDateTime {
    DateTime::from_timestamp_millis(millis).map_or_else(
        || {
            if millis < 0 {
                NaiveDateTime::MIN
            } else {
                NaiveDateTime::MAX
            }
        },
        |dt| dt.naive_utc(),
    )
}

fn project_hospitals(hospitals: Vec<ParsedHospital>, transformer: Transformer) -> Vec<HospitalRecord> {
    hospitals
        .into_iter()
        .filter_map(
            |h| match transformer.transform(h.longitude, h.latitude) {
                Ok(position) => Some(HospitalRecord {
                    x: position.x(),
                    y: position.y(),
                    name: h.name,
                    longitude: h.longitude,
                    latitude: h.latitude,
                }),
                Err(e) => {
                    log::warn!("Dropping hospital {}: {e}", h.name);
                    None
                }
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::NaiveDate;
    use traffic_map_accident_models::NearestStrategy;
    use traffic_map_projection::Crs;

    use super::*;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2005, 1, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn millis(dt: NaiveDateTime) -> i64 {
        dt.and_utc().timestamp_millis()
    }

    fn accident(
        id: &str,
        (x, y): (f64, f64),
        severity: AccidentSeverity,
        casualties: u32,
        occurred_at: NaiveDateTime,
    ) -> ParsedAccident {
        ParsedAccident {
            id: id.to_string(),
            longitude: x,
            latitude: y,
            severity,
            vehicles: 1,
            casualties,
            weather: None,
            occurred_at,
        }
    }

    fn hospital(name: &str, (x, y): (f64, f64)) -> ParsedHospital {
        ParsedHospital {
            name: name.to_string(),
            longitude: x,
            latitude: y,
        }
    }

    /// Positions are already in the plot CRS.
    fn planar(strategy: NearestStrategy) -> StoreOptions {
        StoreOptions {
            accident_crs: Crs::WebMercator,
            hospital_crs: Crs::WebMercator,
            target_crs: Crs::WebMercator,
            nearest_strategy: strategy,
            ..StoreOptions::default()
        }
    }

    fn scenario(strategy: NearestStrategy) -> GeoFilterStore {
        GeoFilterStore::from_parsed(
            vec![
                accident("a1", (0.0, 0.0), AccidentSeverity::Severe, 1, day(1)),
                accident("a2", (10.0, 10.0), AccidentSeverity::Medium, 2, day(2)),
                accident("a3", (100.0, 100.0), AccidentSeverity::Minor, 3, day(3)),
            ],
            vec![hospital("h1", (1.0, 1.0)), hospital("h2", (90.0, 90.0))],
            &planar(strategy),
        )
        .unwrap()
    }

    /// Eight accidents over eight days with casualties 0..=4.
    fn mixed() -> GeoFilterStore {
        let severities = [
            AccidentSeverity::Minor,
            AccidentSeverity::Medium,
            AccidentSeverity::Minor,
            AccidentSeverity::Severe,
            AccidentSeverity::Minor,
            AccidentSeverity::Medium,
            AccidentSeverity::Minor,
            AccidentSeverity::Medium,
        ];
        let casualties = [0, 1, 2, 4, 1, 0, 3, 2];
        let accidents = severities
            .iter()
            .zip(casualties)
            .enumerate()
            .map(|(i, (&severity, c))| {
                let n = u32::try_from(i).unwrap();
                accident(
                    &format!("a{i}"),
                    (f64::from(n) * 1000.0, 0.0),
                    severity,
                    c,
                    day(n + 1),
                )
            })
            .collect();
        GeoFilterStore::from_parsed(
            accidents,
            vec![hospital("h", (0.0, 0.0))],
            &planar(NearestStrategy::Indexed),
        )
        .unwrap()
    }

    fn ids(store: &GeoFilterStore) -> Vec<String> {
        store.filtered_view().iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn assigns_closest_hospital_in_projected_plane() {
        for strategy in [NearestStrategy::BruteForce, NearestStrategy::Indexed] {
            let store = scenario(strategy);
            let hospitals = store.hospitals();
            for record in store.accidents() {
                let candidates = hospitals.iter().map(|h| {
                    let d = ((record.x - h.x).powi(2) + (record.y - h.y).powi(2)).sqrt() / 1000.0;
                    (d * 100.0).round() / 100.0
                });
                let min = candidates.fold(f64::INFINITY, f64::min);
                assert!((record.closest_hospital.distance_km - min).abs() < 1e-12);
            }

            let third = &store.accidents()[2];
            assert_eq!(third.closest_hospital.index, 1, "{strategy}");
            assert_eq!(third.closest_hospital.name, "h2");
        }
    }

    #[test]
    fn strategies_pick_the_same_hospitals() {
        let accidents: Vec<ParsedAccident> = (0..60_u32)
            .map(|i| {
                let f = f64::from(i);
                accident(
                    &i.to_string(),
                    ((f * 7919.0) % 50_000.0, (f * 104_729.0) % 50_000.0),
                    AccidentSeverity::Minor,
                    1,
                    day(1 + i % 20),
                )
            })
            .collect();
        let hospitals: Vec<ParsedHospital> = (0..15_u32)
            .map(|i| {
                let f = f64::from(i);
                hospital(&format!("h{i}"), ((f * 3571.0) % 50_000.0, (f * 6151.0) % 50_000.0))
            })
            .collect();

        let brute = GeoFilterStore::from_parsed(
            accidents.clone(),
            hospitals.clone(),
            &planar(NearestStrategy::BruteForce),
        )
        .unwrap();
        let indexed =
            GeoFilterStore::from_parsed(accidents, hospitals, &planar(NearestStrategy::Indexed))
                .unwrap();

        let picks = |store: &GeoFilterStore| -> Vec<usize> {
            store
                .accidents()
                .iter()
                .map(|r| r.closest_hospital.index)
                .collect()
        };
        assert_eq!(picks(&brute), picks(&indexed));
    }

    #[test]
    fn derived_columns_follow_severity() {
        let store = mixed();
        store.accidents().iter().for_each(|r| {
            assert!((1..=3).contains(&r.severity.value()));
            let view = AccidentView::from(r);
            assert_eq!(view.color, r.severity.color());
            assert_eq!(view.verbal_severity, r.severity.label());
            assert_eq!(r.casualty_weight, r.casualties * 3);
        });
    }

    #[test]
    fn default_filters_use_offset_and_exclusive_bounds() {
        let store = mixed();
        assert_eq!(store.boundary_dates(), (day(2), day(8)));
        assert_eq!(store.date_range(), store.boundary_dates());
        assert_eq!(store.max_casualties(), 4);
        assert_eq!(store.casualty_range(), (0, 4));
        assert_eq!(store.version(), 0);

        // Days 3..=7, minus a3 which has the maximum casualty count.
        assert_eq!(ids(&store), vec!["a2", "a4", "a5", "a6"]);
    }

    #[test]
    fn start_offset_is_configurable_and_clamped() {
        let accidents = vec![
            accident("a", (0.0, 0.0), AccidentSeverity::Minor, 1, day(3)),
            accident("b", (0.0, 0.0), AccidentSeverity::Minor, 1, day(1)),
        ];
        let hospitals = vec![hospital("h", (0.0, 0.0))];

        let options = StoreOptions {
            default_start_offset: 0,
            ..planar(NearestStrategy::Indexed)
        };
        let store =
            GeoFilterStore::from_parsed(accidents.clone(), hospitals.clone(), &options).unwrap();
        assert_eq!(store.boundary_dates(), (day(1), day(3)));

        let options = StoreOptions {
            default_start_offset: 10,
            ..planar(NearestStrategy::Indexed)
        };
        let store = GeoFilterStore::from_parsed(accidents, hospitals, &options).unwrap();
        assert_eq!(store.boundary_dates(), (day(3), day(3)));
        assert!(store.filtered_view().is_empty());
    }

    #[test]
    fn date_range_is_idempotent() {
        let mut store = mixed();
        store.set_casualty_range(0, 10);

        store.set_date_range(millis(day(2)), millis(day(6)));
        let first = ids(&store);
        let first_counts = store.severity_counts().to_vec();
        store.set_date_range(millis(day(2)), millis(day(6)));

        assert_eq!(first, vec!["a2", "a3", "a4"]);
        assert_eq!(ids(&store), first);
        assert_eq!(store.severity_counts(), first_counts.as_slice());
        assert_eq!(store.version(), 3);
    }

    #[test]
    fn widening_casualty_range_never_shrinks_view() {
        let mut store = mixed();
        store.set_date_range(i64::MIN, i64::MAX);

        let ranges = [(2, 3), (2, 4), (1, 4), (1, 5), (0, 5), (0, 100)];
        let mut previous = 0;
        for (start, end) in ranges {
            store.set_casualty_range(start, end);
            let len = store.filtered_view().len();
            assert!(len >= previous, "[{start}, {end}) shrank to {len}");
            previous = len;
        }
        assert_eq!(previous, 8);
    }

    #[test]
    fn zero_width_and_inverted_ranges_are_empty() {
        let mut store = mixed();
        store.set_date_range(millis(day(4)), millis(day(4)));
        assert!(store.filtered_view().is_empty());
        assert!(store.severity_counts().is_empty());
        assert!(store.accident_view().is_empty());

        store.set_date_range(millis(day(8)), millis(day(1)));
        assert!(store.filtered_view().is_empty());

        store.set_date_range(i64::MIN, i64::MAX);
        store.set_casualty_range(3, 1);
        assert!(store.filtered_view().is_empty());
    }

    #[test]
    fn casualty_end_is_exclusive() {
        let mut store = mixed();
        store.set_date_range(i64::MIN, i64::MAX);

        store.set_casualty_range(0, 1);
        assert!(store.filtered_view().iter().all(|r| r.casualties < 1));
        assert_eq!(ids(&store), vec!["a0", "a5"]);

        let max = store.max_casualties();
        store.set_casualty_range(2, max + 1);
        assert!(store.filtered_view().iter().any(|r| r.casualties == max));
        assert_eq!(ids(&store), vec!["a2", "a3", "a6", "a7"]);
    }

    #[test]
    fn severity_counts_sorted_by_count_then_severity() {
        let mut store = mixed();
        store.set_date_range(i64::MIN, i64::MAX);
        store.set_casualty_range(0, 10);

        let counts: Vec<(u8, u64)> = store
            .severity_counts()
            .iter()
            .map(|c| (c.severity.value(), c.count))
            .collect();
        assert_eq!(counts, vec![(3, 4), (2, 3), (1, 1)]);

        // Minor and Medium tie at one each.
        store.set_date_range(millis(day(1)), millis(day(4)));
        let counts: Vec<(u8, u64)> = store
            .severity_counts()
            .iter()
            .map(|c| (c.severity.value(), c.count))
            .collect();
        assert_eq!(counts, vec![(2, 1), (3, 1)]);
        assert_eq!(store.severity_counts()[0].color, "saddlebrown");
    }

    #[test]
    fn boundaries_ignore_filter_state() {
        let mut store = mixed();
        let before = (store.boundary_dates(), store.max_casualties());
        store.set_casualty_range(0, 1);
        store.set_date_range(0, 1);
        assert_eq!((store.boundary_dates(), store.max_casualties()), before);
    }

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(u64, FilterChange, usize)>>,
    }

    impl ViewObserver for Recorder {
        fn view_changed(&self, version: u64, change: FilterChange, filtered: usize) {
            self.seen.lock().unwrap().push((version, change, filtered));
        }
    }

    #[test]
    fn observers_see_every_recomputation() {
        let recorder = Arc::new(Recorder::default());
        let mut store = mixed();
        store.subscribe(recorder.clone());

        store.set_date_range(i64::MIN, i64::MAX);
        store.set_casualty_range(0, 1);
        store.set_casualty_range(0, 1);

        let seen = recorder.seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                (1, FilterChange::DateRange, 7),
                (2, FilterChange::CasualtyRange, 2),
                (3, FilterChange::CasualtyRange, 2),
            ]
        );
    }

    #[test]
    fn drops_rows_that_cannot_be_projected() {
        let options = StoreOptions::default();
        let store = GeoFilterStore::from_parsed(
            vec![
                accident("ok", (-0.1278, 51.5074), AccidentSeverity::Minor, 1, day(1)),
                accident("pole", (0.0, 95.0), AccidentSeverity::Minor, 1, day(2)),
                accident("nan", (f64::NAN, 51.0), AccidentSeverity::Minor, 1, day(3)),
            ],
            vec![
                hospital("London", (-0.12, 51.5)),
                hospital("Nowhere", (0.0, -91.0)),
            ],
            &options,
        )
        .unwrap();

        assert_eq!(store.accidents().len(), 1);
        assert_eq!(store.hospitals().len(), 1);
        let record = &store.accidents()[0];
        assert!((record.x - -14_226.630_923).abs() < 1e-3);
        assert_eq!(record.closest_hospital.name, "London");
    }

    #[test]
    fn empty_datasets_are_errors() {
        let err = GeoFilterStore::from_parsed(
            vec![accident("a", (0.0, 0.0), AccidentSeverity::Minor, 1, day(1))],
            vec![],
            &planar(NearestStrategy::Indexed),
        )
        .err()
        .unwrap();
        assert!(matches!(err, DataLoadError::NoValidRows { dataset: "hospital" }));

        let err = GeoFilterStore::from_parsed(
            vec![accident("a", (0.0, 95.0), AccidentSeverity::Minor, 1, day(1))],
            vec![hospital("h", (0.0, 0.0))],
            &StoreOptions::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, DataLoadError::NoValidRows { dataset: "accident" }));
    }

    #[test]
    fn loads_from_configured_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("accidents.csv"),
            "Accident_Index,Longitude,Latitude,Accident_Severity,Number_of_Vehicles,Number_of_Casualties,Weather_Conditions,Date,Time\n\
             A1,-0.19,51.49,2,1,1,1,04/01/2005,17:42\n\
             A2,-0.21,51.52,3,2,2,1,05/01/2005,\n\
             A3,,51.52,3,2,2,1,06/01/2005,10:00\n\
             A4,-0.15,51.48,1,1,3,2,09/01/2005,08:15\n",
        )
        .unwrap();

        let mut hospitals = b"OrganisationName\xC2\xACLongitude\xC2\xACLatitude\r\n".to_vec();
        hospitals.extend_from_slice(b"St Mary\x92s\xC2\xAC-0.17\xC2\xAC51.52\r\n");
        hospitals.extend_from_slice(b"Chelsea\xC2\xAC-0.18\xC2\xAC51.48\r\n");
        std::fs::write(dir.path().join("hospitals.csv"), hospitals).unwrap();

        let config_path = dir.path().join("traffic_map.toml");
        std::fs::write(
            &config_path,
            "[accidents]\npath = \"accidents.csv\"\n\n[hospitals]\npath = \"hospitals.csv\"\n",
        )
        .unwrap();

        let config = DatasetConfig::from_file(&config_path).unwrap();
        let store = GeoFilterStore::load(&config).unwrap();

        assert_eq!(store.accidents().len(), 3);
        assert_eq!(store.hospitals().len(), 2);
        assert_eq!(store.hospitals()[0].name, "St Mary\u{2019}s");
        assert_eq!(store.max_casualties(), 3);
        assert_eq!(
            store.boundary_dates().0,
            NaiveDate::from_ymd_opt(2005, 1, 5)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert_eq!(store.accidents()[2].closest_hospital.name, "Chelsea");
    }

    #[test]
    fn missing_file_is_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DatasetConfig::from_toml_str(
            "[accidents]\npath = \"nope.csv\"\n\n[hospitals]\npath = \"nope.csv\"\n",
        )
        .unwrap();
        config.resolve_paths(dir.path());

        let err = GeoFilterStore::load(&config).err().unwrap();
        assert!(matches!(err, DataLoadError::Source(_)));
    }
}
