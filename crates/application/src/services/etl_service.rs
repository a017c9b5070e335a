//! ETL pipeline runner
//!
//! Composes weather source → aggregation → store for a configured list of
//! cities, once per invocation. Each run walks the state machine
//! `Idle → Extracting(city_i)… → Aggregating → Loading → Done`, with
//! `Failed(stage, cause)` reachable from every non-terminal state.
//!
//! The caller supplies the date range; the runner never reads the clock to
//! decide which day to extract. At most one run per logical date is assumed
//! to be active at a time; that is guaranteed by the scheduler, not here.

use std::{collections::HashSet, fmt, sync::Arc};

use chrono::{DateTime, Utc};
use domain::{CityDescriptor, DailyAverage, DateRange, HourlyReading};
use futures::{StreamExt, stream};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::{
    error::ApplicationError,
    ports::{DailyWeatherStore, UpsertSummary, WeatherSourcePort},
    services::aggregator::aggregate_daily,
};

/// What to do when extraction fails for some cities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPolicy {
    /// Abort the run on the first failing city (default)
    #[default]
    Strict,
    /// Skip failing cities and load the rest; fails only if every city fails
    TolerantPartial,
}

impl fmt::Display for ExtractionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::TolerantPartial => write!(f, "tolerant_partial"),
        }
    }
}

/// Runner settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Partial extraction policy
    #[serde(default)]
    pub extraction_policy: ExtractionPolicy,

    /// Maximum number of cities fetched concurrently (default: 1, sequential)
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
}

const fn default_max_concurrent_fetches() -> usize {
    1
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            extraction_policy: ExtractionPolicy::default(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
        }
    }
}

/// Stage a run was in when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Validating the run request, before any I/O
    Configuring,
    Extracting,
    Aggregating,
    Loading,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuring => write!(f, "configuring"),
            Self::Extracting => write!(f, "extracting"),
            Self::Aggregating => write!(f, "aggregating"),
            Self::Loading => write!(f, "loading"),
        }
    }
}

/// Pipeline run state
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    Idle,
    /// Extracting the `index`-th configured city
    Extracting { index: usize, city: String },
    Aggregating,
    Loading,
    /// Terminal: the store is consistent with everything extracted in this run
    Done,
    /// Terminal: the run stopped in `stage` because of `cause`
    Failed {
        stage: PipelineStage,
        cause: ApplicationError,
    },
}

impl PipelineState {
    /// Whether no further transition is possible
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed { .. })
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Extracting { index, city } => write!(f, "extracting({index}: {city})"),
            Self::Aggregating => write!(f, "aggregating"),
            Self::Loading => write!(f, "loading"),
            Self::Done => write!(f, "done"),
            Self::Failed { stage, cause } => write!(f, "failed({stage}: {cause})"),
        }
    }
}

/// Input of one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    /// Cities in configured order
    pub cities: Vec<CityDescriptor>,
    /// Reference date range, supplied by the scheduler
    pub range: DateRange,
}

impl RunRequest {
    pub fn new(cities: Vec<CityDescriptor>, range: DateRange) -> Self {
        Self { cities, range }
    }
}

/// A city skipped under `ExtractionPolicy::TolerantPartial`
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCity {
    pub city: String,
    pub cause: ApplicationError,
}

/// Outcome of one invocation, reported back to the scheduler
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub range: DateRange,
    /// Final state: `Done` or `Failed`
    pub state: PipelineState,
    /// Every state entered, in order, starting with `Idle`
    pub transitions: Vec<PipelineState>,
    pub cities_extracted: Vec<String>,
    pub cities_skipped: Vec<SkippedCity>,
    /// Number of hourly readings extracted
    pub readings: usize,
    /// Number of daily rows produced by aggregation
    pub daily_rows: usize,
    pub summary: Option<UpsertSummary>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Whether the run reached `Done`
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.state, PipelineState::Done)
    }

    /// Stage of a failed run
    #[must_use]
    pub const fn failed_stage(&self) -> Option<PipelineStage> {
        match &self.state {
            PipelineState::Failed { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Cause of a failed run
    #[must_use]
    pub const fn error(&self) -> Option<&ApplicationError> {
        match &self.state {
            PipelineState::Failed { cause, .. } => Some(cause),
            _ => None,
        }
    }

    /// Wall-clock duration of the run in milliseconds
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Tracks transitions for a single run
struct RunTracker {
    state: PipelineState,
    transitions: Vec<PipelineState>,
}

impl RunTracker {
    fn new() -> Self {
        Self {
            state: PipelineState::Idle,
            transitions: vec![PipelineState::Idle],
        }
    }

    fn enter(&mut self, next: PipelineState) {
        debug!(from = %self.state, to = %next, "Pipeline transition");
        self.state = next.clone();
        self.transitions.push(next);
    }

    fn fail(&mut self, stage: PipelineStage, cause: ApplicationError) {
        error!(stage = %stage, error = %cause, "Pipeline run failed");
        self.enter(PipelineState::Failed { stage, cause });
    }
}

/// Extract-aggregate-load runner
pub struct EtlPipeline {
    source: Arc<dyn WeatherSourcePort>,
    store: Arc<dyn DailyWeatherStore>,
    settings: PipelineSettings,
}

impl fmt::Debug for EtlPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EtlPipeline")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl EtlPipeline {
    /// Create a runner over the given ports
    pub fn new(
        source: Arc<dyn WeatherSourcePort>,
        store: Arc<dyn DailyWeatherStore>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            source,
            store,
            settings,
        }
    }

    /// Runner settings
    #[must_use]
    pub const fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Execute one run to completion or failure
    ///
    /// Never returns early with an error: the outcome, including the failing
    /// stage and cause, is carried by the returned report.
    pub async fn run(&self, request: &RunRequest) -> RunReport {
        let run_id = Uuid::now_v7();
        let span = info_span!(
            "etl_run",
            run_id = %run_id,
            range = %request.range,
            cities = request.cities.len(),
            policy = %self.settings.extraction_policy,
        );
        self.run_inner(run_id, request).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid, request: &RunRequest) -> RunReport {
        let started_at = Utc::now();
        let mut tracker = RunTracker::new();
        let mut report = RunReport {
            run_id,
            range: request.range,
            state: PipelineState::Idle,
            transitions: Vec::new(),
            cities_extracted: Vec::new(),
            cities_skipped: Vec::new(),
            readings: 0,
            daily_rows: 0,
            summary: None,
            started_at,
            finished_at: started_at,
        };

        info!("Starting weather ETL run");

        if let Err(e) = Self::validate_request(request) {
            tracker.fail(PipelineStage::Configuring, e);
            return Self::finish(report, tracker);
        }

        let readings = match self.extract(request, &mut tracker, &mut report).await {
            Ok(readings) => readings,
            Err(e) => {
                tracker.fail(PipelineStage::Extracting, e);
                return Self::finish(report, tracker);
            },
        };
        report.readings = readings.len();

        tracker.enter(PipelineState::Aggregating);
        let daily = match aggregate_daily(&readings) {
            Ok(daily) => daily,
            Err(e) => {
                tracker.fail(PipelineStage::Aggregating, e);
                return Self::finish(report, tracker);
            },
        };
        drop(readings);
        report.daily_rows = daily.len();

        tracker.enter(PipelineState::Loading);
        match self.load(&daily).await {
            Ok(summary) => {
                report.summary = Some(summary);
                tracker.enter(PipelineState::Done);
            },
            Err(e) => tracker.fail(PipelineStage::Loading, e),
        }

        Self::finish(report, tracker)
    }

    /// Reject requests that cannot produce a meaningful run
    fn validate_request(request: &RunRequest) -> Result<(), ApplicationError> {
        if request.cities.is_empty() {
            return Err(ApplicationError::Configuration(
                "no cities configured".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(request.cities.len());
        for city in &request.cities {
            if !seen.insert(city.name()) {
                return Err(ApplicationError::Configuration(format!(
                    "city '{}' is configured more than once",
                    city.name()
                )));
            }
        }
        Ok(())
    }

    /// Fetch readings for every city, honouring the extraction policy
    ///
    /// Fetches may overlap up to `max_concurrent_fetches`, but results are
    /// consumed in configured order so the first failure in that order is the
    /// one reported.
    async fn extract(
        &self,
        request: &RunRequest,
        tracker: &mut RunTracker,
        report: &mut RunReport,
    ) -> Result<Vec<HourlyReading>, ApplicationError> {
        let concurrency = self.settings.max_concurrent_fetches.max(1);
        let range = request.range;

        let mut results = stream::iter(request.cities.iter().enumerate())
            .map(|(index, city)| {
                let source = Arc::clone(&self.source);
                async move { (index, city, source.fetch_hourly(city, &range).await) }
            })
            .buffered(concurrency);

        let mut readings = Vec::new();
        while let Some((index, city, result)) = results.next().await {
            tracker.enter(PipelineState::Extracting {
                index,
                city: city.name().to_string(),
            });

            match result {
                Ok(city_readings) => {
                    debug!(city = %city.name(), count = city_readings.len(), "Extracted readings");
                    report.cities_extracted.push(city.name().to_string());
                    readings.extend(city_readings);
                },
                Err(e) => match self.settings.extraction_policy {
                    ExtractionPolicy::Strict => return Err(e),
                    ExtractionPolicy::TolerantPartial => {
                        warn!(city = %city.name(), error = %e, "Skipping city after extraction failure");
                        report.cities_skipped.push(SkippedCity {
                            city: city.name().to_string(),
                            cause: e,
                        });
                    },
                },
            }
        }

        if report.cities_extracted.is_empty() {
            // Only reachable under the tolerant policy: every city failed
            return Err(report
                .cities_skipped
                .last()
                .map_or_else(
                    || ApplicationError::Configuration("no cities extracted".to_string()),
                    |skipped| skipped.cause.clone(),
                ));
        }

        Ok(readings)
    }

    async fn load(&self, daily: &[DailyAverage]) -> Result<UpsertSummary, ApplicationError> {
        if daily.is_empty() {
            info!("Aggregation produced no rows; nothing to load");
        }
        let summary = self.store.upsert_batch(daily).await?;
        info!(records = summary.records, "Loaded daily averages");
        Ok(summary)
    }

    fn finish(mut report: RunReport, tracker: RunTracker) -> RunReport {
        report.state = tracker.state;
        report.transitions = tracker.transitions;
        report.finished_at = Utc::now();

        if report.is_success() {
            info!(
                readings = report.readings,
                daily_rows = report.daily_rows,
                skipped = report.cities_skipped.len(),
                duration_ms = report.duration_ms(),
                "Weather ETL run completed"
            );
        }
        report
    }
}
