use crate::draw::Console;
use crate::remediate::{RemediationOutcome, Remediator};
use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};
use sysdiag_core::{
    evaluate, gate, serialize, Action, CancelToken, Config, DiagnosisClient, DiagnosisError,
    DiagnosisResult, Evaluation, HistoryBuffer, MetricSource, ReasoningService, Snapshot,
    UnavailableCause,
};

/// Longest stretch the loop sleeps without checking for cancellation
const CANCEL_POLL: Duration = Duration::from_millis(100);

/// Loop controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Sampling,
    Evaluating,
    Escalating,
    Stopped,
}

/// Counters reported when the loop stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub escalations: u64,
    pub diagnoses: u64,
}

/// How an escalation ended
#[derive(Debug, Clone, PartialEq)]
pub enum Escalation {
    Diagnosed {
        result: DiagnosisResult,
        action: Action,
        remediation: Option<RemediationOutcome>,
    },
    Unavailable,
    Malformed,
}

/// What happened in one sample-evaluate-escalate cycle
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub evaluation: Evaluation,
    pub escalation: Option<Escalation>,
}

/// Application state
pub struct App<M, S> {
    config: Config,
    source: M,
    history: HistoryBuffer,
    diagnosis: DiagnosisClient<S>,
    console: Console,
    remediator: Option<Remediator>,
    tick: Duration,
    state: LoopState,
    summary: RunSummary,
}

impl<M: MetricSource, S: ReasoningService> App<M, S> {
    pub fn new(config: Config, source: M, service: S, console: Console) -> Self {
        let history = HistoryBuffer::new(config.history_len);
        let diagnosis = DiagnosisClient::new(service, &config.reasoning);
        let tick = config.tick_interval();

        Self {
            config,
            source,
            history,
            diagnosis,
            console,
            remediator: None,
            tick,
            state: LoopState::Idle,
            summary: RunSummary::default(),
        }
    }

    /// Offer confirmed execution of proposed kills.
    pub fn with_remediator(mut self, remediator: Remediator) -> Self {
        self.remediator = Some(remediator);
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Main application loop
    ///
    /// Runs cycles until `cancel` is set. Cancellation is only observed
    /// between cycles and during the inter-cycle sleep.
    pub fn run<W: Write>(
        &mut self,
        writer: &mut W,
        cancel: &CancelToken,
    ) -> anyhow::Result<RunSummary> {
        self.start(writer)?;

        while !cancel.is_cancelled() {
            self.cycle(writer)?;
            if cancel.is_cancelled() {
                break;
            }
            self.sleep(cancel);
        }

        self.state = LoopState::Stopped;
        self.console.stopped(writer)?;
        log::info!(
            "Monitor stopped after {} cycles ({} escalations, {} diagnoses)",
            self.summary.cycles,
            self.summary.escalations,
            self.summary.diagnoses
        );
        Ok(self.summary)
    }

    /// Prime the collectors and move from `Idle` to `Sampling`.
    pub fn start<W: Write>(&mut self, writer: &mut W) -> anyhow::Result<()> {
        if let Err(e) = self.source.prime() {
            if e.is_fatal() {
                return Err(e.into());
            }
            // only the first sample is affected
            log::warn!("Failed to prime collectors: {}", e);
        }
        self.console.started(
            writer,
            self.config.thresholds.cpu_percent,
            self.config.thresholds.memory_percent,
        )?;
        self.state = LoopState::Sampling;
        Ok(())
    }

    /// One sample-evaluate-(escalate) cycle. Ends back in `Sampling`.
    pub fn cycle<W: Write>(&mut self, writer: &mut W) -> anyhow::Result<CycleReport> {
        self.state = LoopState::Sampling;
        let snapshot = self.source.sample();
        self.history.append(snapshot.clone());
        self.console.status(writer, &snapshot)?;

        self.state = LoopState::Evaluating;
        let evaluation = evaluate(&snapshot, &self.config.thresholds);

        let escalation = if evaluation.is_critical {
            self.state = LoopState::Escalating;
            Some(self.escalate(writer, &snapshot, &evaluation)?)
        } else {
            None
        };

        self.state = LoopState::Sampling;
        self.summary.cycles += 1;

        Ok(CycleReport {
            evaluation,
            escalation,
        })
    }

    fn escalate<W: Write>(
        &mut self,
        writer: &mut W,
        snapshot: &Snapshot,
        evaluation: &Evaluation,
    ) -> anyhow::Result<Escalation> {
        self.summary.escalations += 1;

        let history_text = serialize(&self.history.snapshots());
        log::info!(
            "Escalating {} snapshots ({} chars): {}",
            self.history.len(),
            history_text.len(),
            evaluation.reasons.join(", ")
        );
        self.console
            .escalating(writer, snapshot, &evaluation.reasons, history_text.len())?;

        let started = Instant::now();
        let outcome = match self.diagnosis.diagnose(&history_text, &evaluation.reasons) {
            Ok(result) => {
                log::info!(
                    "Diagnosis in {:?}: {:?} ({})",
                    started.elapsed(),
                    result.status,
                    result.root_cause
                );
                self.summary.diagnoses += 1;

                let action = gate(&result);
                self.console.diagnosis(writer, &result, &action)?;

                let remediation = match (&action, self.remediator.as_mut()) {
                    (Action::ProposeAction { fix, .. }, Some(remediator)) => {
                        Some(remediator.offer(writer, fix, snapshot)?)
                    }
                    _ => None,
                };

                Escalation::Diagnosed {
                    result,
                    action,
                    remediation,
                }
            }
            Err(DiagnosisError::Unavailable(UnavailableCause::EmptyResponse)) => {
                log::warn!("Reasoning service returned an empty response");
                self.console
                    .notice(writer, "AI is not able to diagnose the issue (empty response).")?;
                Escalation::Unavailable
            }
            Err(DiagnosisError::Unavailable(UnavailableCause::Service(e))) => {
                log::warn!("Reasoning service unavailable: {}", e);
                self.console
                    .notice(writer, "AI is not able to diagnose the issue (service unavailable).")?;
                Escalation::Unavailable
            }
            Err(DiagnosisError::Malformed(e)) => {
                log::warn!("Discarding malformed diagnosis: {}", e);
                self.console
                    .notice(writer, "AI is not able to diagnose the issue (malformed response).")?;
                Escalation::Malformed
            }
        };

        Ok(outcome)
    }

    fn sleep(&self, cancel: &CancelToken) {
        let deadline = Instant::now() + self.tick;
        while !cancel.is_cancelled() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep((deadline - now).min(CANCEL_POLL));
        }
    }
}
