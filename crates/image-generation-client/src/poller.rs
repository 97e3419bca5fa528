//! Status polling as an explicit state machine.
//!
//! `Pending -> Done | Failed | TimedOut`. Each status query feeds one observation into
//! [`PollState::advance`]; the loop in [`Poller::poll`] only performs the query and the delay between
//! queries. Retryable transport failures are retried without spending the attempt budget, up to
//! `transport_retries` in a row.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{GenerationError, Result, TransportError};
use crate::job::{JobHandle, PollOutcome, PollResult};
use crate::providers::JobProvider;
use crate::sleeper::{Sleeper, TokioSleeper};

pub const DEFAULT_TRANSPORT_RETRIES: u32 = 3;

/// Attempt budget and pacing for one poll loop. Wall-clock bound is roughly `max_attempts * interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
    pub transport_retries: u32,
}

impl PollPolicy {
    /// `max_attempts` below one is raised to one.
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
            transport_retries: DEFAULT_TRANSPORT_RETRIES,
        }
    }

    pub fn with_transport_retries(mut self, retries: u32) -> Self {
        self.transport_retries = retries;
        self
    }
}

/// Poll loop state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    Pending {
        /// Status queries answered with a non-terminal status so far.
        attempts: u32,
        /// Retryable transport failures since the last answered query.
        transport_failures: u32,
    },
    Finished(PollOutcome),
}

impl PollState {
    pub fn start() -> Self {
        PollState::Pending {
            attempts: 0,
            transport_failures: 0,
        }
    }

    /// Applies one status query result. A finished state stays finished.
    pub fn advance(
        self,
        observed: std::result::Result<PollResult, TransportError>,
        policy: &PollPolicy,
    ) -> Result<PollState> {
        let (attempts, transport_failures) = match self {
            PollState::Pending {
                attempts,
                transport_failures,
            } => (attempts, transport_failures),
            finished => return Ok(finished),
        };

        match observed {
            Ok(PollResult::Done(artifacts)) => {
                if artifacts.is_empty() {
                    return Err(GenerationError::EmptyResult);
                }
                Ok(PollState::Finished(PollOutcome::Done(artifacts)))
            }
            Ok(PollResult::Failed(reason)) => Ok(PollState::Finished(PollOutcome::Failed(reason))),
            Ok(PollResult::Pending) => {
                let attempts = attempts + 1;
                if attempts >= policy.max_attempts {
                    Ok(PollState::Finished(PollOutcome::TimedOut { attempts }))
                } else {
                    Ok(PollState::Pending {
                        attempts,
                        transport_failures: 0,
                    })
                }
            }
            Err(e) if e.retryable && transport_failures < policy.transport_retries => {
                Ok(PollState::Pending {
                    attempts,
                    transport_failures: transport_failures + 1,
                })
            }
            Err(e) => Err(GenerationError::PollTransport(e.message)),
        }
    }
}

/// Drives [`PollState`] against a provider.
#[derive(Clone)]
pub struct Poller {
    policy: PollPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl Poller {
    pub fn new(policy: PollPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { policy, sleeper }
    }

    /// Poller backed by the tokio timer.
    pub fn with_tokio(policy: PollPolicy) -> Self {
        Self::new(policy, Arc::new(TokioSleeper))
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Queries `handle` until it reaches a terminal state. Suspends for `interval` between queries,
    /// never after the last one.
    #[instrument(skip(self, provider), fields(provider_name = provider.name(), job = %handle))]
    pub async fn poll<P: JobProvider + ?Sized>(
        &self,
        provider: &P,
        handle: &JobHandle,
    ) -> Result<PollOutcome> {
        let mut state = PollState::start();
        loop {
            let observed = provider.status(handle).await;
            if let Err(e) = &observed {
                warn!(error = %e, retryable = e.retryable, "Status query failed");
            }
            state = state.advance(observed, &self.policy)?;
            match &state {
                PollState::Pending {
                    attempts,
                    transport_failures,
                } => {
                    debug!(
                        attempts = *attempts,
                        transport_failures = *transport_failures,
                        max_attempts = self.policy.max_attempts,
                        "Job pending"
                    );
                    self.sleeper.sleep(self.policy.interval).await;
                }
                PollState::Finished(outcome) => {
                    match outcome {
                        PollOutcome::Done(artifacts) => {
                            info!(artifacts = artifacts.len(), "Job done")
                        }
                        PollOutcome::Failed(reason) => warn!(reason = %reason, "Job failed"),
                        PollOutcome::TimedOut { attempts } => {
                            warn!(attempts = *attempts, "Job timed out")
                        }
                    }
                    return Ok(outcome.clone());
                }
            }
        }
    }
}
