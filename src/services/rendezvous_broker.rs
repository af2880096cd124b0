//! Rendezvous between agent announcements and operator responses.
//!
//! Announcements are kept in an ordered list that the gateway reads. Each
//! publish also offers a wake signal on a bounded queue. Operator responses
//! are resolved against the list, recorded as tasks, appended to a history
//! log and offered on a bounded per-lane response queue that waiting agent
//! calls consume. Both queues are best-effort: a full queue drops the new
//! item and the durable lists stay authoritative.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::BrokerError;
use crate::domain::models::{
    AddressingMode, BrokerConfig, HumanResponse, RenderAnnouncement, Resolution, Selection,
    TaskStatus, END_OF_CONVERSATION,
};
use crate::domain::ports::TaskRegistry;
use crate::services::id_allocator::IdAllocator;

/// Lane used by the single implicit conversation.
pub const DEFAULT_LANE: &str = "default";

/// How a bounded wait for a response ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    Responded(HumanResponse),
    TimedOut,
    Cancelled,
}

/// Result of publishing an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishReceipt {
    pub announcement_id: Uuid,
    /// Whether the wake signal fit in the notification queue
    pub notified: bool,
}

/// Counters exposed to the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerStats {
    pub outstanding: usize,
    pub history: usize,
    pub tasks_issued: u64,
    pub dropped_notifications: u64,
    pub dropped_responses: u64,
    /// Response lanes currently allocated
    pub lanes: usize,
}

struct ResponseLane {
    tx: mpsc::Sender<HumanResponse>,
    rx: Mutex<mpsc::Receiver<HumanResponse>>,
}

impl ResponseLane {
    fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }
}

/// Pairs published announcements with operator responses.
pub struct RendezvousBroker {
    registry: Arc<dyn TaskRegistry>,
    addressing: AddressingMode,
    capacity: usize,
    announcements: RwLock<Vec<RenderAnnouncement>>,
    notify_tx: mpsc::Sender<RenderAnnouncement>,
    notify_rx: Mutex<mpsc::Receiver<RenderAnnouncement>>,
    lanes: StdMutex<HashMap<String, Arc<ResponseLane>>>,
    /// Serialises id allocation, task recording and enqueueing
    accept: Mutex<IdAllocator>,
    history: RwLock<Vec<HumanResponse>>,
    dropped_notifications: AtomicU64,
    dropped_responses: AtomicU64,
}

impl RendezvousBroker {
    pub fn new(registry: Arc<dyn TaskRegistry>, config: &BrokerConfig) -> Self {
        let capacity = config.queue_capacity.max(1);
        let (notify_tx, notify_rx) = mpsc::channel(capacity);
        Self {
            registry,
            addressing: config.addressing,
            capacity,
            announcements: RwLock::new(Vec::new()),
            notify_tx,
            notify_rx: Mutex::new(notify_rx),
            lanes: StdMutex::new(HashMap::new()),
            accept: Mutex::new(IdAllocator::new(config.id_prefix.clone())),
            history: RwLock::new(Vec::new()),
            dropped_notifications: AtomicU64::new(0),
            dropped_responses: AtomicU64::new(0),
        }
    }

    pub fn addressing(&self) -> AddressingMode {
        self.addressing
    }

    pub fn registry(&self) -> &Arc<dyn TaskRegistry> {
        &self.registry
    }

    /// Lane that carries responses for `conversation_id`.
    pub fn lane_for(&self, conversation_id: Option<&str>) -> String {
        match (self.addressing, conversation_id) {
            (AddressingMode::Conversation, Some(id)) if !id.trim().is_empty() => id.to_string(),
            _ => DEFAULT_LANE.to_string(),
        }
    }

    fn lanes(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<ResponseLane>>> {
        self.lanes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lane(&self, key: &str) -> Arc<ResponseLane> {
        let mut lanes = self.lanes();
        Arc::clone(
            lanes
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(ResponseLane::new(self.capacity))),
        )
    }

    // ========================================================================
    // Agent side
    // ========================================================================

    /// Record an announcement and offer a wake signal for it.
    pub async fn publish(&self, announcement: RenderAnnouncement) -> PublishReceipt {
        let announcement_id = announcement.id;
        self.announcements.write().await.push(announcement.clone());

        let notified = match self.notify_tx.try_send(announcement) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Closed(_)) => {
                let dropped = self.dropped_notifications.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(%announcement_id, dropped, "notification queue full, wake signal dropped");
                false
            }
        };

        info!(%announcement_id, notified, "render announcement published");
        PublishReceipt {
            announcement_id,
            notified,
        }
    }

    /// Block until one response is available on `lane`, then take it.
    pub async fn await_response(&self, lane: &str) -> HumanResponse {
        match self
            .await_response_until(lane, None, &CancellationToken::new())
            .await
        {
            WaitOutcome::Responded(response) => response,
            WaitOutcome::TimedOut | WaitOutcome::Cancelled => {
                HumanResponse::synthetic_termination("response lane closed")
            }
        }
    }

    /// Wait for one response on `lane`, giving up at `deadline` or when
    /// `cancel` fires. A response is never lost to a cancelled wait.
    pub async fn await_response_until(
        &self,
        lane: &str,
        deadline: Option<Duration>,
        cancel: &CancellationToken,
    ) -> WaitOutcome {
        let lane = self.lane(lane);
        let receive = async {
            let mut rx = lane.rx.lock().await;
            rx.recv().await
        };
        let bounded = async {
            match deadline {
                Some(limit) => tokio::time::timeout(limit, receive).await.ok(),
                None => Some(receive.await),
            }
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => WaitOutcome::Cancelled,
            received = bounded => match received {
                Some(Some(response)) => WaitOutcome::Responded(response),
                Some(None) => WaitOutcome::Cancelled,
                None => WaitOutcome::TimedOut,
            },
        }
    }

    /// Drop a conversation lane that nobody waits on and that holds no
    /// undelivered responses. The default lane is never released.
    pub fn release_lane(&self, key: &str) -> bool {
        if key == DEFAULT_LANE {
            return false;
        }
        let mut lanes = self.lanes();
        let idle = lanes.get(key).is_some_and(|lane| {
            Arc::strong_count(lane) == 1 && lane.rx.try_lock().is_ok_and(|rx| rx.is_empty())
        });
        if idle {
            lanes.remove(key);
            debug!(lane = %key, "response lane released");
        }
        idle
    }

    /// Remove a specific announcement. Returns whether it was still outstanding.
    pub async fn withdraw(&self, announcement_id: Uuid) -> bool {
        let mut list = self.announcements.write().await;
        match list.iter().position(|a| a.id == announcement_id) {
            Some(index) => {
                list.remove(index);
                debug!(%announcement_id, "announcement withdrawn");
                true
            }
            None => false,
        }
    }

    pub async fn is_outstanding(&self, announcement_id: Uuid) -> bool {
        self.announcements
            .read()
            .await
            .iter()
            .any(|a| a.id == announcement_id)
    }

    // ========================================================================
    // Operator side
    // ========================================================================

    /// Snapshot of outstanding announcements, oldest first.
    pub async fn announcements(&self) -> Vec<RenderAnnouncement> {
        self.announcements.read().await.clone()
    }

    /// Resolve `selection` against its target announcement, record the task
    /// and queue the response. The announcement is consumed.
    pub async fn submit_response(&self, selection: Selection) -> Result<HumanResponse, BrokerError> {
        let mut ids = self.accept.lock().await;
        let announcement = {
            let mut list = self.announcements.write().await;
            let index = self.target_index(&list, selection.conversation_id.as_deref())?;
            list.remove(index)
        };

        let resolution = selection.resolve(&announcement);
        Ok(self
            .deliver(&mut ids, resolution, Some(&announcement), None)
            .await)
    }

    /// Whether an operator response for `announcement_id` was accepted.
    ///
    /// Waits for any in-progress accept to finish, so a response whose
    /// announcement was already removed is always visible here.
    pub async fn was_answered(&self, announcement_id: Uuid) -> bool {
        let _accept = self.accept.lock().await;
        self.history
            .read()
            .await
            .iter()
            .any(|r| r.announcement_id == Some(announcement_id))
    }

    /// Queue a manually authored response that answers no announcement.
    ///
    /// Under conversation addressing the response goes to the named
    /// conversation, which must have an outstanding announcement, or to the
    /// conversation of the oldest announcement when none is named.
    pub async fn push_manual(
        &self,
        custom_input: &str,
        continue_flag: bool,
        conversation_id: Option<String>,
    ) -> Result<HumanResponse, BrokerError> {
        if custom_input.trim().is_empty() {
            return Err(BrokerError::EmptyInput);
        }
        let mut ids = self.accept.lock().await;
        let conversation_id = match self.addressing {
            AddressingMode::Fifo => conversation_id,
            AddressingMode::Conversation => {
                let list = self.announcements.read().await;
                match conversation_id.filter(|id| !id.trim().is_empty()) {
                    Some(id) if list.iter().any(|a| a.conversation_id.as_deref() == Some(id.as_str())) => {
                        Some(id)
                    }
                    Some(id) => return Err(BrokerError::ConversationNotFound(id)),
                    None => list.first().and_then(|a| a.conversation_id.clone()),
                }
            }
        };
        let resolution = Resolution::manual(custom_input, continue_flag);
        Ok(self
            .deliver(&mut ids, resolution, None, conversation_id)
            .await)
    }

    /// Discard the target announcement without producing a response.
    pub async fn abandon(&self, conversation_id: Option<&str>) -> Result<RenderAnnouncement, BrokerError> {
        let mut list = self.announcements.write().await;
        let index = self.target_index(&list, conversation_id)?;
        let abandoned = list.remove(index);
        info!(announcement_id = %abandoned.id, summary = %abandoned.summary, "render announcement abandoned");
        Ok(abandoned)
    }

    /// Discard the oldest announcement, if any.
    pub async fn remove_oldest_announcement(&self) -> Option<RenderAnnouncement> {
        let mut list = self.announcements.write().await;
        if list.is_empty() {
            None
        } else {
            Some(list.remove(0))
        }
    }

    /// Take the next wake signal whose announcement is still outstanding.
    pub async fn next_notification(&self, timeout: Duration) -> Option<RenderAnnouncement> {
        let deadline = Instant::now() + timeout;
        let mut rx = tokio::time::timeout_at(deadline, self.notify_rx.lock())
            .await
            .ok()?;
        loop {
            let announcement = tokio::time::timeout_at(deadline, rx.recv()).await.ok()??;
            if self.is_outstanding(announcement.id).await {
                return Some(announcement);
            }
        }
    }

    /// Every response accepted so far, including ones dropped from the queue.
    pub async fn history(&self) -> Vec<HumanResponse> {
        self.history.read().await.clone()
    }

    pub async fn stats(&self) -> BrokerStats {
        BrokerStats {
            outstanding: self.announcements.read().await.len(),
            history: self.history.read().await.len(),
            tasks_issued: self.accept.lock().await.issued(),
            dropped_notifications: self.dropped_notifications.load(Ordering::Relaxed),
            dropped_responses: self.dropped_responses.load(Ordering::Relaxed),
            lanes: self.lanes().len(),
        }
    }

    fn target_index(
        &self,
        list: &[RenderAnnouncement],
        conversation_id: Option<&str>,
    ) -> Result<usize, BrokerError> {
        let target = conversation_id.filter(|id| !id.trim().is_empty());
        if let (AddressingMode::Conversation, Some(target)) = (self.addressing, target) {
            return list
                .iter()
                .position(|a| a.conversation_id.as_deref() == Some(target))
                .ok_or_else(|| BrokerError::ConversationNotFound(target.to_string()));
        }
        if list.is_empty() {
            Err(BrokerError::NothingToAnswer)
        } else {
            Ok(0)
        }
    }

    /// Accept path: allocate the id, record the task, log and enqueue.
    #[instrument(skip_all, fields(continue_flag = resolution.continue_flag))]
    async fn deliver(
        &self,
        ids: &mut IdAllocator,
        resolution: Resolution,
        answering: Option<&RenderAnnouncement>,
        conversation_id: Option<String>,
    ) -> HumanResponse {
        let task_id = ids.next();
        let response = match answering {
            Some(announcement) => HumanResponse::new(&task_id, resolution).answering(announcement),
            None => HumanResponse::new(&task_id, resolution).in_conversation(conversation_id),
        };

        self.registry.add(&task_id, &response.custom_input).await;
        if !response.continue_flag {
            self.registry
                .update(&task_id, TaskStatus::Completed, END_OF_CONVERSATION)
                .await;
        }
        self.history.write().await.push(response.clone());

        let lane_key = self.lane_for(response.conversation_id.as_deref());
        match self.lane(&lane_key).tx.try_send(response.clone()) {
            Ok(()) => {
                info!(task_id = %task_id, lane = %lane_key, input = %response.custom_input, "response queued");
            }
            Err(TrySendError::Full(_) | TrySendError::Closed(_)) => {
                let dropped = self.dropped_responses.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(task_id = %task_id, lane = %lane_key, dropped, "response queue full, response kept in history only");
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTaskRegistry;

    fn broker_with(capacity: usize, addressing: AddressingMode) -> RendezvousBroker {
        let config = BrokerConfig {
            queue_capacity: capacity,
            addressing,
            ..Default::default()
        };
        RendezvousBroker::new(Arc::new(InMemoryTaskRegistry::new()), &config)
    }

    fn broker() -> RendezvousBroker {
        broker_with(10, AddressingMode::Fifo)
    }

    fn announcement(summary: &str) -> RenderAnnouncement {
        RenderAnnouncement::new(summary, vec!["test".into(), "deploy".into()])
    }

    #[tokio::test]
    async fn test_publish_records_announcement() {
        let broker = broker();
        let receipt = broker.publish(announcement("built feature X")).await;
        assert!(receipt.notified);

        let list = broker.announcements().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, receipt.announcement_id);
    }

    #[tokio::test]
    async fn test_submit_selects_option_and_records_task() {
        let broker = broker();
        broker.publish(announcement("built feature X")).await;

        let response = broker.submit_response(Selection::option(1)).await.unwrap();
        assert_eq!(response.custom_input, "deploy");
        assert_eq!(response.task_id, "id-1");
        assert!(response.continue_flag);

        let task = broker.registry().get("id-1").await.unwrap();
        assert_eq!(task.request, "deploy");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(broker.announcements().await.is_empty());
    }

    #[tokio::test]
    async fn test_submit_without_announcement() {
        let broker = broker();
        let err = broker.submit_response(Selection::option(0)).await.unwrap_err();
        assert_eq!(err, BrokerError::NothingToAnswer);
        assert!(broker.registry().list_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_termination_completes_task_immediately() {
        let broker = broker();
        broker.publish(announcement("done")).await;

        let response = broker
            .submit_response(Selection::end_conversation())
            .await
            .unwrap();
        assert!(!response.continue_flag);
        assert_eq!(response.custom_input, END_OF_CONVERSATION);

        let task = broker.registry().get(&response.task_id).await.unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_await_receives_submitted_response() {
        let broker = broker();
        broker.publish(announcement("x")).await;
        let submitted = broker.submit_response(Selection::option(0)).await.unwrap();

        let received = broker.await_response(DEFAULT_LANE).await;
        assert_eq!(received, submitted);
    }

    #[tokio::test]
    async fn test_bounded_wait_times_out() {
        let broker = broker();
        let outcome = broker
            .await_response_until(
                DEFAULT_LANE,
                Some(Duration::from_millis(20)),
                &CancellationToken::new(),
            )
            .await;
        assert_eq!(outcome, WaitOutcome::TimedOut);
    }

    #[tokio::test]
    async fn test_cancelled_wait() {
        let broker = broker();
        let token = CancellationToken::new();
        token.cancel();
        let outcome = broker.await_response_until(DEFAULT_LANE, None, &token).await;
        assert_eq!(outcome, WaitOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_full_notification_queue_keeps_announcement() {
        let broker = broker_with(1, AddressingMode::Fifo);
        let first = broker.publish(announcement("one")).await;
        let second = broker.publish(announcement("two")).await;

        assert!(first.notified);
        assert!(!second.notified);
        assert_eq!(broker.announcements().await.len(), 2);
        assert_eq!(broker.stats().await.dropped_notifications, 1);
    }

    #[tokio::test]
    async fn test_full_response_queue_keeps_history() {
        let broker = broker_with(1, AddressingMode::Fifo);
        broker.push_manual("first", true, None).await.unwrap();
        broker.push_manual("second", true, None).await.unwrap();

        let stats = broker.stats().await;
        assert_eq!(stats.dropped_responses, 1);
        assert_eq!(stats.history, 2);
        assert_eq!(broker.registry().list_all().await.len(), 2);

        let received = broker.await_response(DEFAULT_LANE).await;
        assert_eq!(received.custom_input, "first");
    }

    #[tokio::test]
    async fn test_push_manual_requires_input() {
        let broker = broker();
        let err = broker.push_manual("  ", true, None).await.unwrap_err();
        assert_eq!(err, BrokerError::EmptyInput);
    }

    #[tokio::test]
    async fn test_manual_response_has_no_announcement() {
        let broker = broker();
        let response = broker.push_manual("refactor", true, None).await.unwrap();
        assert!(response.announcement_id.is_none());
        assert_eq!(response.selected_index, -1);
    }

    #[tokio::test]
    async fn test_abandon_removes_oldest() {
        let broker = broker();
        broker.publish(announcement("first")).await;
        broker.publish(announcement("second")).await;

        let abandoned = broker.abandon(None).await.unwrap();
        assert_eq!(abandoned.summary, "first");
        assert_eq!(broker.announcements().await[0].summary, "second");
        assert!(broker.registry().list_all().await.is_empty());

        broker.abandon(None).await.unwrap();
        assert_eq!(broker.abandon(None).await.unwrap_err(), BrokerError::NothingToAnswer);
        assert!(broker.remove_oldest_announcement().await.is_none());
    }

    #[tokio::test]
    async fn test_withdraw() {
        let broker = broker();
        let receipt = broker.publish(announcement("x")).await;
        assert!(broker.withdraw(receipt.announcement_id).await);
        assert!(!broker.withdraw(receipt.announcement_id).await);
    }

    #[tokio::test]
    async fn test_conversation_addressing_targets_match() {
        let broker = broker_with(10, AddressingMode::Conversation);
        broker
            .publish(announcement("alpha").with_conversation(Some("a".into())))
            .await;
        broker
            .publish(announcement("beta").with_conversation(Some("b".into())))
            .await;

        let response = broker
            .submit_response(Selection::option(0).for_conversation("b"))
            .await
            .unwrap();
        assert_eq!(response.conversation_id.as_deref(), Some("b"));

        let remaining = broker.announcements().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].summary, "alpha");

        let received = broker.await_response("b").await;
        assert_eq!(received.task_id, response.task_id);

        let err = broker
            .submit_response(Selection::option(0).for_conversation("zzz"))
            .await
            .unwrap_err();
        assert_eq!(err, BrokerError::ConversationNotFound("zzz".into()));
    }

    #[tokio::test]
    async fn test_blank_conversation_id_targets_oldest() {
        let broker = broker_with(10, AddressingMode::Conversation);
        broker
            .publish(announcement("alpha").with_conversation(Some("a".into())))
            .await;
        broker
            .publish(announcement("beta").with_conversation(Some("b".into())))
            .await;

        let response = broker
            .submit_response(Selection::option(0).for_conversation(""))
            .await
            .unwrap();
        assert_eq!(response.conversation_id.as_deref(), Some("a"));

        let abandoned = broker.abandon(Some("  ")).await.unwrap();
        assert_eq!(abandoned.summary, "beta");
    }

    #[tokio::test]
    async fn test_manual_response_follows_oldest_conversation() {
        let broker = broker_with(10, AddressingMode::Conversation);
        broker
            .publish(announcement("alpha").with_conversation(Some("conv-1".into())))
            .await;

        let response = broker.push_manual("do the thing", true, None).await.unwrap();
        assert_eq!(response.conversation_id.as_deref(), Some("conv-1"));
        assert_eq!(broker.await_response("conv-1").await.task_id, response.task_id);

        let named = broker
            .push_manual("and this", true, Some("conv-1".into()))
            .await
            .unwrap();
        assert_eq!(named.conversation_id.as_deref(), Some("conv-1"));
    }

    #[tokio::test]
    async fn test_manual_response_rejects_unknown_conversation() {
        let broker = broker_with(10, AddressingMode::Conversation);
        broker
            .publish(announcement("alpha").with_conversation(Some("conv-1".into())))
            .await;

        let err = broker
            .push_manual("hello", true, Some("ghost".into()))
            .await
            .unwrap_err();
        assert_eq!(err, BrokerError::ConversationNotFound("ghost".into()));
        assert!(broker.registry().list_all().await.is_empty());
        assert_eq!(broker.stats().await.lanes, 0);
    }

    #[tokio::test]
    async fn test_release_lane_keeps_undelivered_responses() {
        let broker = broker_with(10, AddressingMode::Conversation);
        broker
            .publish(announcement("alpha").with_conversation(Some("a".into())))
            .await;
        broker
            .submit_response(Selection::option(0).for_conversation("a"))
            .await
            .unwrap();

        assert!(!broker.release_lane("a"));
        broker.await_response("a").await;
        assert!(broker.release_lane("a"));
        assert_eq!(broker.stats().await.lanes, 0);

        broker.await_response_until(DEFAULT_LANE, Some(Duration::ZERO), &CancellationToken::new()).await;
        assert!(!broker.release_lane(DEFAULT_LANE));
    }

    #[tokio::test]
    async fn test_was_answered() {
        let broker = broker();
        let answered = broker.publish(announcement("answered")).await;
        let abandoned = broker.publish(announcement("abandoned")).await;

        broker.submit_response(Selection::option(0)).await.unwrap();
        broker.abandon(None).await.unwrap();

        assert!(broker.was_answered(answered.announcement_id).await);
        assert!(!broker.was_answered(abandoned.announcement_id).await);
    }

    #[tokio::test]
    async fn test_fifo_ignores_conversation_target() {
        let broker = broker();
        broker
            .publish(announcement("alpha").with_conversation(Some("a".into())))
            .await;
        broker
            .publish(announcement("beta").with_conversation(Some("b".into())))
            .await;

        let response = broker
            .submit_response(Selection::option(0).for_conversation("b"))
            .await
            .unwrap();
        assert_eq!(response.conversation_id.as_deref(), Some("a"));
        assert_eq!(broker.lane_for(Some("b")), DEFAULT_LANE);
    }

    #[tokio::test]
    async fn test_next_notification_skips_answered() {
        let broker = broker();
        broker.publish(announcement("first")).await;
        let second = broker.publish(announcement("second")).await;
        broker.submit_response(Selection::option(0)).await.unwrap();

        let woken = broker
            .next_notification(Duration::from_millis(50))
            .await
            .unwrap();
        assert_eq!(woken.id, second.announcement_id);
        assert!(broker
            .next_notification(Duration::from_millis(20))
            .await
            .is_none());
    }
}
