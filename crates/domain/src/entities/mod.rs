//! Domain entities - Records produced and consumed by one pipeline run

mod daily_average;
mod hourly_reading;

pub use daily_average::DailyAverage;
pub use hourly_reading::HourlyReading;
