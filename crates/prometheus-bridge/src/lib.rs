mod guards;
mod metrics;
#[cfg(test)]
mod tests;

pub use guards::exceeds_status_budget;
pub use metrics::{encode, MetricsError, ObservatoryMetrics};
