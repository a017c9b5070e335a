//! Application services - Use case implementations

mod aggregator;
mod etl_service;

pub use aggregator::{aggregate_daily, parse_reading_time};
pub use etl_service::{
    EtlPipeline, ExtractionPolicy, PipelineSettings, PipelineStage, PipelineState, RunReport,
    RunRequest, SkippedCity,
};
