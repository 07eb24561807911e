use std::time::Duration;

/// Outcome label attached to every recorded use-case operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
    Success,
    Failure,
}

impl OperationOutcome {
    pub fn of<T, E>(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => OperationOutcome::Success,
            Err(_) => OperationOutcome::Failure,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationOutcome::Success => "success",
            OperationOutcome::Failure => "failure",
        }
    }
}

/// Observability hook injected into the use cases.
pub trait ServiceMetrics: Send + Sync + 'static {
    fn record_operation(&self, operation: &'static str, outcome: OperationOutcome, elapsed: Duration);
}

/// Metrics sink that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl ServiceMetrics for NoopMetrics {
    fn record_operation(&self, _: &'static str, _: OperationOutcome, _: Duration) {}
}
