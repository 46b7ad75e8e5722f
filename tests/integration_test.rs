//! Integration tests for crewlink
//!
//! These tests run against the in-process bus and a temporary SQLite file;
//! no broker is required.

use crewlink::{CommunicationLog, Error, HandlerError, InMemoryMessageBus, MessageBus, Orchestrator, Settings};
use std::sync::Arc;
use tempfile::tempdir;

#[tokio::test]
async fn test_in_memory_bus_and_log() {
    let dir = tempdir().unwrap();
    let bus = InMemoryMessageBus::new();
    let log = CommunicationLog::open(dir.path().join("comm.db")).unwrap();

    bus.publish("queue", "hello").await.unwrap();
    bus.consume("queue", &|msg: &str| -> Result<(), HandlerError> {
        log.log("queue", msg)?;
        Ok(())
    })
    .await
    .unwrap();

    let rows = log.fetch_all().unwrap();
    assert_eq!(rows[0].queue, "queue");
    assert_eq!(rows[0].message, "hello");
    log.close().unwrap();
}

#[tokio::test]
async fn test_orchestrator_send_and_monitor() {
    let dir = tempdir().unwrap();
    let bus = Arc::new(InMemoryMessageBus::new());
    let log = Arc::new(CommunicationLog::open(dir.path().join("comm.db")).unwrap());
    let mut orch = Orchestrator::new(bus.clone(), log.clone());

    orch.register_agent("agent1", "q1");
    orch.send("agent1", "hello").await.unwrap();
    bus.publish("q1", "reply").await.unwrap();
    orch.monitor("agent1").await.unwrap();

    let rows = log.fetch_all().unwrap();
    let q1: Vec<&str> = rows
        .iter()
        .filter(|r| r.queue == "q1")
        .map(|r| r.message.as_str())
        .collect();
    let hello = q1.iter().position(|m| *m == "hello").unwrap();
    let reply = q1.iter().position(|m| *m == "reply").unwrap();
    assert!(hello < reply);

    orch.close().await.unwrap();
    assert!(matches!(bus.publish("q1", "late").await, Err(Error::Closed(_))));
    assert!(log.is_closed());
}

#[tokio::test]
async fn test_orchestrator_from_settings() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("settings.db");
    let settings = Settings::from_toml(&format!(
        r#"
        [log]
        db_path = "{}"

        [[agents]]
        name = "Writer"
        queue = "drafts"
        "#,
        db_path.display()
    ))
    .unwrap();

    let orch = Orchestrator::from_settings(&settings).await.unwrap();
    assert_eq!(orch.queue_for("Writer").unwrap(), "drafts");

    orch.send("Writer", "outline").await.unwrap();
    assert_eq!(orch.monitor("Writer").await.unwrap(), 1);

    let messages: Vec<String> = orch
        .log()
        .fetch_queue("drafts")
        .unwrap()
        .into_iter()
        .map(|r| r.message)
        .collect();
    assert_eq!(messages, vec!["outline", "outline"]);
    orch.close().await.unwrap();

    // Records outlive the orchestrator
    let reopened = CommunicationLog::open(&db_path).unwrap();
    assert_eq!(reopened.fetch_all().unwrap().len(), 2);
}

#[tokio::test]
async fn test_failed_monitor_retries_on_next_pass() {
    let bus = Arc::new(InMemoryMessageBus::new());
    let log = Arc::new(CommunicationLog::open_in_memory().unwrap());

    bus.publish("jobs", "first").await.unwrap();
    bus.publish("jobs", "second").await.unwrap();

    let err = bus
        .consume("jobs", &|msg: &str| -> Result<(), HandlerError> {
            if msg == "first" {
                return Err("not ready".into());
            }
            Ok(())
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Handler(_)));

    let mut orch = Orchestrator::new(bus.clone(), log.clone());
    orch.register_agent("worker", "jobs");
    assert_eq!(orch.monitor("worker").await.unwrap(), 2);

    let messages: Vec<String> = log.fetch_all().unwrap().into_iter().map(|r| r.message).collect();
    assert_eq!(messages, vec!["first", "second"]);
}
