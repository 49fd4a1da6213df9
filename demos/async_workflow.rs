//! Async Document Workflow
//!
//! This example demonstrates transition functions that do real work.
//!
//! Key concepts:
//! - Async transition functions with caller-defined metadata
//! - Successors computed from metadata at call time
//! - Serialized mode queueing concurrent requests
//! - Transition history
//!
//! Run with: RUST_LOG=statewire=debug cargo run --example async_workflow

use serde::{Deserialize, Serialize};
use statewire::core::{BoxError, EnterEvent, MachineConfig, StateDefinition};
use statewire::emitter::handler;
use statewire::MachineBuilder;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Review {
    reviewer: String,
    approved: bool,
}

async fn run_checks(_: Option<Review>) -> Result<Option<String>, BoxError> {
    tokio::time::sleep(Duration::from_millis(20)).await;
    Ok(Some("review".to_string()))
}

async fn decide(review: Option<Review>) -> Result<Option<String>, BoxError> {
    let review = review.ok_or("a review decision needs a reviewer")?;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let next = if review.approved { "published" } else { "draft" };
    Ok(Some(next.to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Async Document Workflow ===\n");

    let config: MachineConfig<Review> = MachineConfig::new()
        .state("draft", StateDefinition::new().on("submit", run_checks))
        .state("review", StateDefinition::new().on("decide", decide))
        .state("published", StateDefinition::new());

    let machine = MachineBuilder::new(config)
        .initial_state("draft")
        .serialized(true)
        .track_history(true)
        .build()?;

    machine.on_enter(handler(|event: EnterEvent<Review>| async move {
        let by = event.meta.map(|m| m.reviewer).unwrap_or_default();
        println!("  {} -> {} via {} {}", event.last, event.current, event.action, by);
        Ok(())
    }));

    println!("Submitting and deciding concurrently (serialized):");
    let reviewer = Review {
        reviewer: "ada".to_string(),
        approved: false,
    };
    let (submitted, decided) = tokio::join!(
        machine.transition("submit", None),
        machine.transition("decide", Some(reviewer))
    );
    println!("  submit -> {:?}, decide -> {:?}\n", submitted?, decided?);

    println!("Second round:");
    machine.transition("submit", None).await?;
    let approval = Review {
        reviewer: "grace".to_string(),
        approved: true,
    };
    machine.transition("decide", Some(approval)).await?;

    println!("\nFinal state: {}", machine.state());
    if let Some(history) = machine.history() {
        println!("Path: {}", history.get_path().join(" -> "));
        println!("History JSON: {}", serde_json::to_string_pretty(&history)?);
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
