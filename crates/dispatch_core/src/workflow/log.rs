//! Record of completed forward steps, consumed in reverse on rollback.

/// A forward step that left a side effect and therefore has a compensation.
/// Matching and pricing leave no side effects and are never recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletedStep {
    RequestCreated { request_id: String, version: u64 },
    DriverReserved { driver_id: String, version: u64 },
}

#[derive(Debug, Default)]
pub struct WorkflowLog {
    steps: Vec<CompletedStep>,
}

impl WorkflowLog {
    pub fn record(&mut self, step: CompletedStep) {
        self.steps.push(step);
    }

    /// Steps in compensation order (reverse of completion).
    pub fn into_reverse(self) -> Vec<CompletedStep> {
        let mut steps = self.steps;
        steps.reverse();
        steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compensation_order_reverses_completion_order() {
        let mut log = WorkflowLog::default();
        log.record(CompletedStep::RequestCreated {
            request_id: "r1".into(),
            version: 1,
        });
        log.record(CompletedStep::DriverReserved {
            driver_id: "d1".into(),
            version: 2,
        });

        let reversed = log.into_reverse();
        assert!(matches!(reversed[0], CompletedStep::DriverReserved { .. }));
        assert!(matches!(reversed[1], CompletedStep::RequestCreated { .. }));
    }
}
