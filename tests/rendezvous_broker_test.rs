//! Integration tests for the rendezvous broker's blocking handoff.

mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use human_in_mcp::domain::models::{AddressingMode, RenderAnnouncement, Selection, TaskStatus};
use human_in_mcp::services::DEFAULT_LANE;
use human_in_mcp::TaskRegistry;
use tokio::time::timeout;

fn announcement(summary: &str) -> RenderAnnouncement {
    RenderAnnouncement::new(summary, vec!["test".into(), "deploy".into()])
}

#[tokio::test]
async fn test_await_blocks_until_submission() {
    common::setup_test_logging();
    let broker = common::broker(10, AddressingMode::Fifo);

    let waiter = {
        let broker = Arc::clone(&broker);
        tokio::spawn(async move { broker.await_response(DEFAULT_LANE).await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!waiter.is_finished(), "waiter returned before any submission");

    broker.publish(announcement("built feature X")).await;
    let submitted = broker.submit_response(Selection::option(1)).await.unwrap();

    let received = timeout(Duration::from_secs(2), waiter)
        .await
        .expect("waiter never woke")
        .unwrap();
    assert_eq!(received, submitted);
    assert_eq!(received.custom_input, "deploy");
}

#[tokio::test]
async fn test_second_waiter_needs_second_submission() {
    let broker = common::broker(10, AddressingMode::Fifo);
    broker.publish(announcement("one")).await;
    broker.publish(announcement("two")).await;
    let first = broker.submit_response(Selection::option(0)).await.unwrap();

    assert_eq!(broker.await_response(DEFAULT_LANE).await, first);

    let second_waiter = {
        let broker = Arc::clone(&broker);
        tokio::spawn(async move { broker.await_response(DEFAULT_LANE).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!second_waiter.is_finished());

    let second = broker
        .submit_response(Selection::free_text("write docs"))
        .await
        .unwrap();
    let received = timeout(Duration::from_secs(2), second_waiter)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(received, second);
}

#[tokio::test]
async fn test_responses_delivered_in_submission_order() {
    let broker = common::broker(10, AddressingMode::Fifo);
    for text in ["first", "second", "third"] {
        broker.push_manual(text, true, None).await.unwrap();
    }

    let mut received = Vec::new();
    for _ in 0..3 {
        received.push(broker.await_response(DEFAULT_LANE).await.custom_input);
    }
    assert_eq!(received, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_capacity_one_keeps_every_announcement_listed() {
    let broker = common::broker(1, AddressingMode::Fifo);
    broker.publish(announcement("first")).await;
    let second = broker.publish(announcement("second")).await;

    assert!(!second.notified);
    let listed: Vec<_> = broker
        .announcements()
        .await
        .into_iter()
        .map(|a| a.summary)
        .collect();
    assert_eq!(listed, vec!["first", "second"]);

    // The dropped wake signal does not make the announcement unanswerable.
    broker.submit_response(Selection::option(0)).await.unwrap();
    let response = broker.submit_response(Selection::option(1)).await.unwrap();
    assert_eq!(response.announcement_id, Some(second.announcement_id));
}

#[tokio::test]
async fn test_out_of_range_index_with_text() {
    let broker = common::broker(10, AddressingMode::Fifo);
    broker.publish(announcement("x")).await;

    let selection = Selection {
        selected_index: Some(7),
        custom_input: Some("add a benchmark".into()),
        continue_flag: true,
        conversation_id: None,
    };
    let response = broker.submit_response(selection).await.unwrap();
    assert!(response.continue_flag);
    assert_eq!(response.custom_input, "add a benchmark");
    assert_eq!(response.selected_index, -1);
}

#[tokio::test]
async fn test_concurrent_submitters_get_unique_ordered_ids() {
    let broker = common::broker(64, AddressingMode::Fifo);
    for i in 0..32 {
        broker.publish(announcement(&format!("report {i}"))).await;
    }

    let mut handles = Vec::new();
    for _ in 0..32 {
        let broker = Arc::clone(&broker);
        handles.push(tokio::spawn(async move {
            broker.submit_response(Selection::option(0)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert!(broker.announcements().await.is_empty());
    let tasks = broker.registry().list_all().await;
    let ids: HashSet<_> = tasks.iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids.len(), 32);

    // Queue order matches allocation order.
    let mut previous = 0u64;
    for _ in 0..32 {
        let response = broker.await_response(DEFAULT_LANE).await;
        let n: u64 = response.task_id.trim_start_matches("id-").parse().unwrap();
        assert!(n > previous);
        previous = n;
    }
}

#[tokio::test]
async fn test_conversation_lanes_are_independent() {
    let broker = common::broker(10, AddressingMode::Conversation);
    broker
        .publish(announcement("alpha").with_conversation(Some("a".into())))
        .await;
    broker
        .publish(announcement("beta").with_conversation(Some("b".into())))
        .await;

    let lane_a = {
        let broker = Arc::clone(&broker);
        tokio::spawn(async move { broker.await_response("a").await })
    };

    broker
        .submit_response(Selection::option(1).for_conversation("b"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!lane_a.is_finished(), "lane a consumed lane b's response");

    broker
        .submit_response(Selection::option(0).for_conversation("a"))
        .await
        .unwrap();
    let received = timeout(Duration::from_secs(2), lane_a).await.unwrap().unwrap();
    assert_eq!(received.conversation_id.as_deref(), Some("a"));
    assert_eq!(received.custom_input, "test");

    let b = broker.await_response("b").await;
    assert_eq!(b.custom_input, "deploy");
}

#[tokio::test]
async fn test_termination_task_completed() {
    let broker = common::broker(10, AddressingMode::Fifo);
    broker.publish(announcement("done")).await;
    let response = broker
        .submit_response(Selection::end_conversation())
        .await
        .unwrap();

    assert!(!response.custom_input.is_empty());
    let task = broker.registry().get(&response.task_id).await.unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
}
