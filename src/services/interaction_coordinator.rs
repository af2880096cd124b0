//! Drives one agent/operator exchange from report to next instruction.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::InteractionError;
use crate::domain::models::{HumanResponse, InteractionConfig, RenderAnnouncement, TaskStatus};
use crate::services::rendezvous_broker::{RendezvousBroker, WaitOutcome};

/// Response text recorded on tasks whose announcement was withdrawn before
/// the answer reached a waiter.
pub const SUPERSEDED: &str = "superseded: announcement withdrawn";

/// Response text recorded on tasks answered after the agent stopped waiting.
pub const ABANDONED: &str = "abandoned: agent stopped waiting";

const TIMED_OUT: &str = "timed out waiting for the operator";
const CANCELLED: &str = "interaction cancelled";

/// Exchange phases, logged as the exchange advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangePhase {
    Start,
    Published,
    AwaitingHuman,
    Resumed,
    Continue,
    Terminate,
}

impl ExchangePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Published => "published",
            Self::AwaitingHuman => "awaiting_human",
            Self::Resumed => "resumed",
            Self::Continue => "continue",
            Self::Terminate => "terminate",
        }
    }
}

impl fmt::Display for ExchangePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments of one `human_interaction` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionRequest {
    pub summary: String,
    pub difficulties: Option<String>,
    pub next_options: Vec<String>,
    /// Task the agent is reporting on, if any
    pub task_id: Option<String>,
    pub conversation_id: Option<String>,
}

/// How an exchange ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    Continue { task_id: String, instruction: String },
    Terminate { reason: String },
}

/// What the protocol layer hands back to the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionReply {
    pub outcome: InteractionOutcome,
    pub response: HumanResponse,
    /// Prompt text followed by the JSON rendering of `response`
    pub text: String,
}

impl InteractionReply {
    pub fn is_continue(&self) -> bool {
        matches!(self.outcome, InteractionOutcome::Continue { .. })
    }
}

/// Withdraws a published announcement if the exchange future is dropped
/// before it resolves.
struct AnnouncementGuard {
    broker: Arc<RendezvousBroker>,
    announcement_id: Uuid,
    armed: bool,
}

impl AnnouncementGuard {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for AnnouncementGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let broker = Arc::clone(&self.broker);
        let id = self.announcement_id;
        handle.spawn(async move {
            if broker.withdraw(id).await {
                debug!(announcement_id = %id, "announcement withdrawn after dropped exchange");
            }
        });
    }
}

/// Orchestrates exchanges against a shared broker.
///
/// Exchanges on the same response lane are serialised, so a lane never has
/// more than one live waiter.
pub struct InteractionCoordinator {
    broker: Arc<RendezvousBroker>,
    template: RwLock<String>,
    response_timeout: Option<Duration>,
    late_grace: Duration,
    rounds: AtomicU64,
    sessions: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl InteractionCoordinator {
    pub fn new(broker: Arc<RendezvousBroker>, config: &InteractionConfig) -> Self {
        Self {
            broker,
            template: RwLock::new(config.continuation_template.clone()),
            response_timeout: config.response_timeout_secs.map(Duration::from_secs),
            late_grace: Duration::from_millis(config.late_response_grace_ms),
            rounds: AtomicU64::new(0),
            sessions: StdMutex::new(HashMap::new()),
        }
    }

    pub fn broker(&self) -> &Arc<RendezvousBroker> {
        &self.broker
    }

    /// Current continuation template.
    pub async fn format(&self) -> String {
        self.template.read().await.clone()
    }

    pub async fn set_format(&self, template: &str) -> Result<(), InteractionError> {
        if template.trim().is_empty() {
            return Err(InteractionError::EmptyTemplate);
        }
        *self.template.write().await = template.to_string();
        info!("continuation template updated");
        Ok(())
    }

    /// Number of exchanges that ended with a continuation.
    pub fn rounds(&self) -> u64 {
        self.rounds.load(Ordering::Relaxed)
    }

    fn sessions(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<Mutex<()>>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn session(&self, lane: &str) -> Arc<Mutex<()>> {
        Arc::clone(self.sessions().entry(lane.to_string()).or_default())
    }

    /// Forget the session and response lane of `lane` once no exchange holds
    /// them.
    fn release(&self, lane: &str) {
        let mut sessions = self.sessions();
        if sessions
            .get(lane)
            .is_some_and(|session| Arc::strong_count(session) == 1)
        {
            sessions.remove(lane);
            drop(sessions);
            self.broker.release_lane(lane);
        }
    }

    /// Run one exchange: close the prior task, publish, wait for the
    /// operator and turn the answer into a prompt for the agent.
    #[instrument(skip(self, request, cancel), fields(task_id = ?request.task_id, conversation_id = ?request.conversation_id))]
    pub async fn interact(
        &self,
        request: InteractionRequest,
        cancel: &CancellationToken,
    ) -> InteractionReply {
        debug!(phase = %ExchangePhase::Start, summary = %request.summary, "exchange started");
        let registry = Arc::clone(self.broker.registry());

        if let Some(prior) = request.task_id.as_deref().filter(|id| !id.trim().is_empty()) {
            let outcome = registry
                .update(prior, TaskStatus::Completed, &request.summary)
                .await;
            if !outcome.is_applied() {
                warn!(task_id = %prior, ?outcome, "prior task could not be completed");
            }
        }

        let lane = self.broker.lane_for(request.conversation_id.as_deref());
        let session = self.session(&lane);
        let reply = {
            let turn = tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                turn = session.lock() => Some(turn),
            };
            match turn {
                Some(_turn) => self.exchange(request, &lane, cancel).await,
                None => self.without_answer(CANCELLED),
            }
        };
        drop(session);
        self.release(&lane);
        reply
    }

    /// Publish, wait and resolve while holding the lane's turn.
    async fn exchange(
        &self,
        request: InteractionRequest,
        lane: &str,
        cancel: &CancellationToken,
    ) -> InteractionReply {
        let registry = Arc::clone(self.broker.registry());
        let conversation_id = request.conversation_id.clone().unwrap_or_default();
        let announcement = RenderAnnouncement::new(request.summary.clone(), request.next_options)
            .with_difficulties(request.difficulties.as_deref())
            .with_conversation(request.conversation_id);
        let receipt = self.broker.publish(announcement).await;
        let own = receipt.announcement_id;
        let mut guard = AnnouncementGuard {
            broker: Arc::clone(&self.broker),
            announcement_id: own,
            armed: true,
        };
        debug!(phase = %ExchangePhase::Published, announcement_id = %own, notified = receipt.notified);

        debug!(phase = %ExchangePhase::AwaitingHuman, lane = %lane);
        let deadline = self.response_timeout.map(|limit| Instant::now() + limit);
        let response = match self.receive_own(lane, own, deadline, cancel).await {
            WaitOutcome::Responded(response) => {
                if response.announcement_id.is_none() {
                    // Manual response answered the wait; the announcement is moot.
                    self.broker.withdraw(own).await;
                }
                response
            }
            outcome => {
                let cancelled = outcome == WaitOutcome::Cancelled;
                let reason = if cancelled { CANCELLED } else { TIMED_OUT };
                if self.broker.withdraw(own).await {
                    guard.disarm();
                    return self.without_answer(reason);
                }
                guard.disarm();
                if !self.broker.was_answered(own).await {
                    debug!(announcement_id = %own, "announcement was abandoned by the operator");
                    return self.without_answer(reason);
                }

                // The operator answered while the wait was ending.
                let grace = Some(Instant::now() + self.late_grace);
                let late = self
                    .receive_own(lane, own, grace, &CancellationToken::new())
                    .await;
                match late {
                    WaitOutcome::Responded(response) if !cancelled => response,
                    WaitOutcome::Responded(response) => {
                        registry
                            .update(&response.task_id, TaskStatus::Completed, ABANDONED)
                            .await;
                        return self.without_answer(reason);
                    }
                    WaitOutcome::TimedOut | WaitOutcome::Cancelled => {
                        warn!(announcement_id = %own, "answer was consumed but never delivered");
                        return self.without_answer(reason);
                    }
                }
            }
        };
        guard.disarm();

        info!(
            phase = %ExchangePhase::Resumed,
            task_id = %response.task_id,
            continue_flag = response.continue_flag,
            "operator responded"
        );

        if response.continue_flag {
            registry
                .update(&response.task_id, TaskStatus::Processing, &request.summary)
                .await;
            let round = self.rounds.fetch_add(1, Ordering::Relaxed) + 1;
            let round_text = round.to_string();
            let prompt = render_template(
                &self.format().await,
                &[
                    ("instruction", response.custom_input.as_str()),
                    ("task_id", response.task_id.as_str()),
                    ("round", round_text.as_str()),
                    ("conversation_id", conversation_id.as_str()),
                ],
            );
            debug!(phase = %ExchangePhase::Continue, round);
            InteractionReply {
                outcome: InteractionOutcome::Continue {
                    task_id: response.task_id.clone(),
                    instruction: response.custom_input.clone(),
                },
                text: with_response_json(&prompt, &response),
                response,
            }
        } else {
            debug!(phase = %ExchangePhase::Terminate);
            termination(response)
        }
    }

    /// Wait for a response to `own`, completing and skipping any response
    /// that answers a different announcement.
    async fn receive_own(
        &self,
        lane: &str,
        own: Uuid,
        deadline: Option<Instant>,
        cancel: &CancellationToken,
    ) -> WaitOutcome {
        loop {
            let remaining = deadline.map(|at| at.saturating_duration_since(Instant::now()));
            match self.broker.await_response_until(lane, remaining, cancel).await {
                WaitOutcome::Responded(response)
                    if response.announcement_id.is_some_and(|id| id != own) =>
                {
                    warn!(task_id = %response.task_id, "response for a withdrawn announcement discarded");
                    self.broker
                        .registry()
                        .update(&response.task_id, TaskStatus::Completed, SUPERSEDED)
                        .await;
                }
                outcome => return outcome,
            }
        }
    }

    fn without_answer(&self, reason: &str) -> InteractionReply {
        info!(phase = %ExchangePhase::Terminate, %reason, "exchange ended without an operator answer");
        termination(HumanResponse::synthetic_termination(reason))
    }
}

/// Expand `{name}` placeholders in one pass. Substituted values are never
/// scanned again and unknown placeholders are left as written.
fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let matched = values.iter().find(|(name, _)| {
            tail[1..]
                .strip_prefix(name)
                .is_some_and(|after| after.starts_with('}'))
        });
        match matched {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn termination(response: HumanResponse) -> InteractionReply {
    let reason = response.custom_input.clone();
    let prompt = format!(
        "[CONVERSATION ENDED]\nThe operator ended this conversation.\nReason: {reason}\nStop working; do not call any further tools."
    );
    InteractionReply {
        outcome: InteractionOutcome::Terminate { reason },
        text: with_response_json(&prompt, &response),
        response,
    }
}

fn with_response_json(prompt: &str, response: &HumanResponse) -> String {
    let json = serde_json::to_string_pretty(response).unwrap_or_default();
    format!("{prompt}\n\n---\n\nOperator response (JSON):\n{json}")
}
