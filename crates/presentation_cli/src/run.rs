//! The `run` command
//!
//! Wires configuration into the pipeline, runs it once and turns the report
//! into the exit contract the scheduler relies on.

use std::sync::Arc;

use application::{
    ApplicationError, EtlPipeline, ExtractionPolicy, PipelineStage, RunReport, RunRequest,
};
use chrono::NaiveDate;
use domain::DateRange;
use infrastructure::{AppConfig, OpenMeteoSourceAdapter, connect};
use tracing::{error, info};

/// Options taken from the command line
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub date: NaiveDate,
    pub days: u32,
    pub tolerate_partial: bool,
}

/// Process exit code for a failed stage
pub const fn exit_code_for(stage: PipelineStage) -> u8 {
    match stage {
        PipelineStage::Configuring => 2,
        PipelineStage::Extracting => 3,
        PipelineStage::Aggregating => 4,
        PipelineStage::Loading => 5,
    }
}

/// Stage a setup error belongs to
///
/// Only persistence problems get past configuration: they can only be found
/// by talking to the database.
const fn setup_stage(err: &ApplicationError) -> PipelineStage {
    match err {
        ApplicationError::Persistence { .. } => PipelineStage::Loading,
        _ => PipelineStage::Configuring,
    }
}

fn failure_line(stage: PipelineStage, cause: &str, run_id: Option<String>) -> String {
    serde_json::json!({
        "status": "failed",
        "stage": stage,
        "error": cause,
        "run_id": run_id,
    })
    .to_string()
}

fn success_line(report: &RunReport) -> String {
    serde_json::json!({
        "status": "done",
        "run_id": report.run_id.to_string(),
        "range": report.range.to_string(),
        "cities": report.cities_extracted,
        "skipped": report
            .cities_skipped
            .iter()
            .map(|s| s.city.as_str())
            .collect::<Vec<_>>(),
        "readings": report.readings,
        "rows": report.summary.map_or(0, |s| s.records),
        "duration_ms": report.duration_ms(),
    })
    .to_string()
}

fn fail(stage: PipelineStage, cause: &str, run_id: Option<String>) -> u8 {
    error!(stage = %stage, error = %cause, "Run failed");
    eprintln!("{}", failure_line(stage, cause, run_id));
    exit_code_for(stage)
}

/// Report a failure that happened before logging was set up
pub fn report_setup_failure(cause: &str) -> u8 {
    eprintln!("{}", failure_line(PipelineStage::Configuring, cause, None));
    exit_code_for(PipelineStage::Configuring)
}

/// Execute one pipeline run and map its outcome to an exit code
pub async fn execute(mut config: AppConfig, options: RunOptions) -> u8 {
    if options.tolerate_partial {
        config.pipeline.extraction_policy = ExtractionPolicy::TolerantPartial;
    }

    let range = match DateRange::starting_at(options.date, options.days) {
        Ok(range) => range,
        Err(e) => return fail(PipelineStage::Configuring, &e.to_string(), None),
    };
    let cities = match config.city_descriptors() {
        Ok(cities) => cities,
        Err(e) => return fail(PipelineStage::Configuring, &e.to_string(), None),
    };
    let source = match OpenMeteoSourceAdapter::new(
        config.weather.clone(),
        config.retry.to_retry_config(),
    ) {
        Ok(source) => source,
        Err(e) => return fail(setup_stage(&e), &e.to_string(), None),
    };

    let db = match connect(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            let e = ApplicationError::from(e);
            return fail(setup_stage(&e), &e.to_string(), None);
        },
    };
    if config.database.run_migrations
        && let Err(e) = db.migrate().await
    {
        db.close().await;
        let e = ApplicationError::from(e);
        return fail(setup_stage(&e), &e.to_string(), None);
    }

    info!(
        range = %range,
        cities = cities.len(),
        policy = %config.pipeline.extraction_policy,
        backend = %db.backend(),
        "Starting run"
    );

    let pipeline = EtlPipeline::new(Arc::new(source), db.store(), config.pipeline);
    let report = pipeline.run(&RunRequest::new(cities, range)).await;
    db.close().await;

    match (report.failed_stage(), report.error()) {
        (Some(stage), Some(cause)) => {
            fail(stage, &cause.to_string(), Some(report.run_id.to_string()))
        },
        _ => {
            println!("{}", success_line(&report));
            0
        },
    }
}
