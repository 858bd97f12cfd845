/// Fixed-timestep scheduling: turns wall-clock frame time into a whole
/// number of simulation steps.

use std::time::Duration;

use crate::compute::TickReport;
use crate::entities::GameStatus;
use crate::input::InputState;
use crate::session::Session;

#[derive(Clone, Debug)]
pub struct FixedStep {
    step: Duration,
    accumulator: Duration,
    /// Most steps one frame may run; older backlog is dropped.
    max_catch_up: u32,
}

impl FixedStep {
    pub fn new(tick_ms: u64, max_catch_up: u32) -> Self {
        Self {
            step: Duration::from_millis(tick_ms.max(1)),
            accumulator: Duration::ZERO,
            max_catch_up: max_catch_up.max(1),
        }
    }

    /// Bank `elapsed` and return how many steps are now due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let due = u32::try_from(self.accumulator.as_nanos() / self.step.as_nanos())
            .unwrap_or(u32::MAX);
        if due > self.max_catch_up {
            self.accumulator = Duration::ZERO;
            return self.max_catch_up;
        }
        self.accumulator -= self.step * due;
        due
    }

    /// Forget banked time, e.g. after a pause.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}

/// Run the steps due for `elapsed` against one input snapshot.  Stops
/// early if the session leaves `Running` mid-frame.
pub fn pump(
    session: &mut Session,
    clock: &mut FixedStep,
    input: &InputState,
    elapsed: Duration,
) -> Vec<TickReport> {
    let due = clock.advance(elapsed);
    let mut reports = Vec::new();
    for _ in 0..due {
        if session.status() != GameStatus::Running {
            break;
        }
        match session.step(input) {
            Ok(report) => reports.push(report),
            Err(_) => break,
        }
    }
    reports
}
