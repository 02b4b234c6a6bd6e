//! Bounded wait for an execution to reach a terminal state.
//!
//! The loop re-checks on a fixed interval until the deadline passes. Fetch
//! errors inside the loop are logged and retried; only the final fetch after
//! the loop can fail the wait.
use crate::julep::{Execution, ExecutionStatus, JulepClient};
use anyhow::{Context, Result};
use std::time::{Duration, Instant};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Anything that can report the current state of an execution.
pub trait ExecutionSource {
    fn fetch_execution(&self, execution_id: &str) -> Result<Execution>;
}

impl ExecutionSource for JulepClient {
    fn fetch_execution(&self, execution_id: &str) -> Result<Execution> {
        self.get_execution(execution_id)
    }
}

/// Elapsed time and sleeping, separated out so the loop can run on fake time.
pub trait Clock {
    fn elapsed(&self) -> Duration;
    fn sleep(&mut self, duration: Duration);
}

pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn start() -> Self {
        SystemClock {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_INTERVAL,
        }
    }
}

/// How the wait ended, with the execution as last observed.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    Succeeded(Execution),
    /// Failed or cancelled.
    Failed(Execution),
    /// Deadline passed before a terminal state was seen.
    TimedOut(Execution),
}

impl PollOutcome {
    pub fn execution(&self) -> &Execution {
        match self {
            PollOutcome::Succeeded(execution)
            | PollOutcome::Failed(execution)
            | PollOutcome::TimedOut(execution) => execution,
        }
    }
}

/// Poll `execution_id` until it finishes or `config.timeout` elapses.
pub fn wait_for_execution<S, C>(
    source: &S,
    execution_id: &str,
    config: PollConfig,
    clock: &mut C,
) -> Result<PollOutcome>
where
    S: ExecutionSource + ?Sized,
    C: Clock,
{
    let mut polls = 0u32;
    while clock.elapsed() < config.timeout {
        polls += 1;
        match source.fetch_execution(execution_id) {
            Ok(execution) => {
                tracing::info!(
                    execution_id,
                    status = %execution.status,
                    elapsed_secs = clock.elapsed().as_secs(),
                    "execution status"
                );
                if execution.status.is_terminal() {
                    break;
                }
            }
            Err(err) => {
                tracing::warn!(
                    execution_id,
                    error = %format!("{err:#}"),
                    "status check failed; retrying"
                );
            }
        }
        clock.sleep(config.interval);
    }

    let execution = source
        .fetch_execution(execution_id)
        .with_context(|| format!("fetch final state of execution {execution_id}"))?;
    tracing::debug!(execution_id, polls, status = %execution.status, "polling finished");
    Ok(match execution.status {
        ExecutionStatus::Succeeded => PollOutcome::Succeeded(execution),
        ExecutionStatus::Failed | ExecutionStatus::Cancelled => PollOutcome::Failed(execution),
        _ => PollOutcome::TimedOut(execution),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct FakeClock {
        now: Duration,
        sleeps: Vec<Duration>,
    }

    impl FakeClock {
        fn new() -> Self {
            FakeClock {
                now: Duration::ZERO,
                sleeps: Vec::new(),
            }
        }
    }

    impl Clock for FakeClock {
        fn elapsed(&self) -> Duration {
            self.now
        }

        fn sleep(&mut self, duration: Duration) {
            self.now += duration;
            self.sleeps.push(duration);
        }
    }

    /// Replays scripted responses; the last one repeats once the script runs out.
    struct ScriptedSource {
        script: RefCell<VecDeque<Result<ExecutionStatus>>>,
        last: ExecutionStatus,
        calls: RefCell<u32>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<ExecutionStatus>>, last: ExecutionStatus) -> Self {
            ScriptedSource {
                script: RefCell::new(script.into()),
                last,
                calls: RefCell::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.borrow()
        }
    }

    impl ExecutionSource for ScriptedSource {
        fn fetch_execution(&self, execution_id: &str) -> Result<Execution> {
            *self.calls.borrow_mut() += 1;
            let status = self
                .script
                .borrow_mut()
                .pop_front()
                .unwrap_or(Ok(self.last))?;
            Ok(Execution {
                id: execution_id.to_string(),
                status,
                output: None,
                error: None,
            })
        }
    }

    #[test]
    fn stops_on_success() {
        let source = ScriptedSource::new(
            vec![Ok(ExecutionStatus::Queued), Ok(ExecutionStatus::Running)],
            ExecutionStatus::Succeeded,
        );
        let mut clock = FakeClock::new();
        let outcome =
            wait_for_execution(&source, "exec-1", PollConfig::default(), &mut clock).expect("poll");
        assert!(matches!(outcome, PollOutcome::Succeeded(_)));
        assert_eq!(outcome.execution().id, "exec-1");
        // queued, running, succeeded, then the final fetch.
        assert_eq!(source.calls(), 4);
        assert_eq!(clock.sleeps, vec![DEFAULT_INTERVAL; 2]);
    }

    #[test]
    fn transient_errors_are_retried() {
        let source = ScriptedSource::new(
            vec![
                Err(anyhow!("connection reset")),
                Err(anyhow!("502 bad gateway")),
                Ok(ExecutionStatus::Running),
            ],
            ExecutionStatus::Failed,
        );
        let mut clock = FakeClock::new();
        let outcome =
            wait_for_execution(&source, "exec-2", PollConfig::default(), &mut clock).expect("poll");
        assert!(matches!(outcome, PollOutcome::Failed(_)));
        assert_eq!(clock.sleeps.len(), 3);
    }

    #[test]
    fn cancelled_counts_as_failure() {
        let source = ScriptedSource::new(Vec::new(), ExecutionStatus::Cancelled);
        let mut clock = FakeClock::new();
        let outcome =
            wait_for_execution(&source, "exec-3", PollConfig::default(), &mut clock).expect("poll");
        assert!(matches!(outcome, PollOutcome::Failed(_)));
        assert!(clock.sleeps.is_empty());
    }

    #[test]
    fn deadline_yields_timeout() {
        let source = ScriptedSource::new(Vec::new(), ExecutionStatus::Running);
        let mut clock = FakeClock::new();
        let config = PollConfig {
            timeout: Duration::from_secs(30),
            interval: Duration::from_secs(10),
        };
        let outcome = wait_for_execution(&source, "exec-4", config, &mut clock).expect("poll");
        match outcome {
            PollOutcome::TimedOut(execution) => {
                assert_eq!(execution.status, ExecutionStatus::Running)
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        assert_eq!(clock.now, Duration::from_secs(30));
        assert_eq!(source.calls(), 4);
    }

    #[test]
    fn final_fetch_error_propagates() {
        let source = ScriptedSource::new(
            vec![Ok(ExecutionStatus::Succeeded), Err(anyhow!("gone"))],
            ExecutionStatus::Succeeded,
        );
        let mut clock = FakeClock::new();
        let err = wait_for_execution(&source, "exec-5", PollConfig::default(), &mut clock)
            .unwrap_err();
        assert!(format!("{err:#}").contains("exec-5"));
        assert!(format!("{err:#}").contains("gone"));
    }
}
