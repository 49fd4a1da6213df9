//! Light Switch
//!
//! This example demonstrates the smallest useful machine.
//!
//! Key concepts:
//! - Declaring states and actions as a table
//! - Calling actions through the dispatch table
//! - Machine-wide and per-state notifications
//! - Illegal actions are no-ops, not errors
//!
//! Run with: cargo run --example light_switch

use statewire::core::{EnterEvent, ExitEvent, MachineConfig, StateDefinition};
use statewire::emitter::handler;
use statewire::MachineBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Light Switch ===\n");

    let config: MachineConfig = MachineConfig::new()
        .state("off", StateDefinition::new().goto("switchOn", "on"))
        .state("on", StateDefinition::new().goto("switchOff", "off"));

    let machine = MachineBuilder::new(config).initial_state("off").build()?;

    println!("Initial state: {}", machine.state());
    println!(
        "Actions: {:?}",
        machine.actions().names().collect::<Vec<_>>()
    );
    println!(
        "Subscriptions: {:?}\n",
        machine.notifiers().names().collect::<Vec<_>>()
    );

    machine.on_exit(handler(|event: ExitEvent| async move {
        println!("  exit  {} (action: {})", event.current, event.action);
        Ok(())
    }));
    machine.on_enter(handler(|event: EnterEvent| async move {
        println!("  enter {} -> {}", event.last, event.current);
        Ok(())
    }));
    let lamp = machine
        .notifier("onOn")
        .expect("every state has a notifier")
        .subscribe(handler(|_: EnterEvent| async move {
            println!("  the lamp is glowing");
            Ok(())
        }));

    println!("switchOn():");
    let state = machine.dispatch("switchOn", None).await?;
    println!("  -> {state:?}\n");

    println!("switchOn() again (not declared under \"on\"):");
    let state = machine.dispatch("switchOn", None).await?;
    println!("  -> {state:?}\n");

    lamp.unsubscribe();

    println!("switchOff():");
    let state = machine.dispatch("switchOff", None).await?;
    println!("  -> {state:?}\n");

    println!("Final state: {}", machine.state());
    println!("\n=== Example Complete ===");
    Ok(())
}
