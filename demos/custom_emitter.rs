//! Custom Emitter
//!
//! This example demonstrates injecting a notification capability.
//!
//! Key concepts:
//! - Implementing the `Emitter` trait
//! - Wrapping the default `ChannelEmitter`
//! - Observing every channel the machine publishes on
//!
//! Run with: cargo run --example custom_emitter

use async_trait::async_trait;
use statewire::core::{MachineConfig, MachineEvent, StateDefinition};
use statewire::emitter::{ChannelEmitter, Emitter, Handler, HandlerError, SubscriptionId};
use statewire::MachineBuilder;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Emitter that counts publishes and prints each event as JSON.
struct AuditEmitter {
    inner: ChannelEmitter<MachineEvent>,
    published: AtomicUsize,
}

#[async_trait]
impl Emitter<MachineEvent> for AuditEmitter {
    fn subscribe(&self, channel: &str, handler: Handler<MachineEvent>) -> SubscriptionId {
        self.inner.subscribe(channel, handler)
    }

    fn unsubscribe(&self, channel: &str, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(channel, id)
    }

    async fn publish(&self, channel: &str, payload: MachineEvent) -> Result<(), HandlerError> {
        self.published.fetch_add(1, Ordering::Relaxed);
        let json = serde_json::to_string(&payload).map_err(HandlerError::new)?;
        println!("  [{channel}] {json}");
        self.inner.publish(channel, payload).await
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    println!("=== Custom Emitter ===\n");

    let audit = Arc::new(AuditEmitter {
        inner: ChannelEmitter::new(),
        published: AtomicUsize::new(0),
    });

    let config: MachineConfig = MachineConfig::new()
        .state("closed", StateDefinition::new().goto("open", "opened"))
        .state("opened", StateDefinition::new().goto("close", "closed"));

    let machine = MachineBuilder::new(config)
        .initial_state("closed")
        .emitter(audit.clone())
        .build()?;

    machine
        .dispatch("open", Some(serde_json::json!({ "by": "door sensor" })))
        .await?;
    machine.dispatch("open", None).await?;
    machine.dispatch("close", None).await?;

    println!(
        "\nPublishes observed: {}",
        audit.published.load(Ordering::Relaxed)
    );
    println!("\n=== Example Complete ===");
    Ok(())
}
