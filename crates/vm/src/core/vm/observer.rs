//! Step observers.
//!
//! An observer is handed a [`StepSnapshot`] after every successfully executed instruction, in
//! every frame of the call tree. It only ever sees shared references, so it cannot influence
//! execution.

use super::execution::StepSnapshot;

/// Receives a snapshot after each executed instruction.
///
/// Executions run on their own thread, so observers must be [`Send`].
pub trait StepObserver: Send {
    /// Called after an instruction completes.
    fn on_step(&mut self, step: &StepSnapshot);

    /// Whether snapshots should be built at all. Snapshots copy the stack, so observers that
    /// ignore them should return `false`.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// An observer that ignores every step.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {
    fn on_step(&mut self, _step: &StepSnapshot) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

/// An observer that keeps every snapshot.
#[derive(Clone, Debug, Default)]
pub struct TraceCollector {
    steps: Vec<StepSnapshot>,
}

impl TraceCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// The snapshots collected so far, in execution order.
    pub fn steps(&self) -> &[StepSnapshot] {
        &self.steps
    }

    /// Consumes the collector, returning its snapshots.
    pub fn into_steps(self) -> Vec<StepSnapshot> {
        self.steps
    }
}

impl StepObserver for TraceCollector {
    fn on_step(&mut self, step: &StepSnapshot) {
        self.steps.push(step.clone());
    }
}

impl<F> StepObserver for F
where
    F: FnMut(&StepSnapshot) + Send,
{
    fn on_step(&mut self, step: &StepSnapshot) {
        self(step)
    }
}
