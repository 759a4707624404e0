//! Form Walkthrough
//!
//! This example drives the form machine through a full submit cycle.
//!
//! Key concepts:
//! - Sections derive their mode from text and consent input
//! - The form derives its mode from the sections it is bound to
//! - A submit schedules a delayed follow-up event
//! - Completing the submit resets every section
//!
//! Run with: RUST_LOG=modeflow=debug cargo run --example form_walkthrough

use modeflow::form::{FormConfig, FormMachine};
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    println!("=== Form Walkthrough ===\n");

    let config = FormConfig::from_json(r#"{ "submit_delay_ms": 300 }"#)?;
    let form = FormMachine::new(&config)?;
    settle().await;
    println!("Form: {:?}", form.snapshot().state);

    println!("\nTyping an invalid name:");
    form.user_info().handle_text_change("Alice42");
    println!("  user info: {:?}", form.user_info().snapshot().state);

    println!("\nFixing the name and giving consent:");
    form.user_info().handle_text_change("Alice");
    form.user_info().handle_consent_change(true);
    println!("  user info: {:?}", form.user_info().snapshot().state);

    println!("\nEntering card details and giving consent:");
    form.payment_details().handle_text_change("1234567812345678");
    form.payment_details().handle_consent_change(true);
    println!("  payment:   {:?}", form.payment_details().snapshot().state);
    settle().await;
    println!("Form: {:?} (submit enabled: {})", form.snapshot().state, form.can_submit());

    if let Some(follow_up) = form.submit() {
        println!("\nSubmitting...");
        println!("Form: {:?} (submit enabled: {})", form.snapshot().state, form.can_submit());
        follow_up.await?;
        settle().await;
    }

    println!("\nAfter submit:");
    println!("Form: {:?}", form.snapshot().state);
    println!("  user info: {:?}", form.user_info().snapshot());
    println!("  payment:   {:?}", form.payment_details().snapshot());

    println!("\n=== Example Complete ===");
    Ok(())
}
