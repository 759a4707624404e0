//! End-to-end behavior of the form over its two sections.

use modeflow::form::{FormConfig, FormEvent, FormMachine, FormState, SectionSnapshot, SectionState};
use modeflow::DispatchOutcome;
use std::time::Duration;
use tokio_stream::StreamExt;

async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

fn complete_both(form: &FormMachine) {
    form.user_info().handle_text_change("Alice");
    form.user_info().handle_consent_change(true);
    form.payment_details().handle_text_change("1234567812345678");
    form.payment_details().handle_consent_change(true);
}

#[tokio::test(start_paused = true)]
async fn form_starts_not_ready() {
    let form = FormMachine::new(&FormConfig::default()).unwrap();
    settle().await;

    assert_eq!(form.snapshot().state, FormState::NotReady);
    assert_eq!(form.user_info().snapshot().state, SectionState::Incomplete);
    assert_eq!(
        form.payment_details().snapshot().state,
        SectionState::Incomplete
    );
    assert!(!form.can_submit());
}

#[tokio::test(start_paused = true)]
async fn completing_both_sections_enables_submit() {
    let form = FormMachine::new(&FormConfig::default()).unwrap();
    settle().await;

    form.user_info().handle_text_change("Alice");
    form.user_info().handle_consent_change(true);
    settle().await;
    assert_eq!(form.snapshot().state, FormState::NotReady);

    form.payment_details().handle_text_change("1234567812345678");
    form.payment_details().handle_consent_change(true);
    settle().await;

    assert_eq!(form.snapshot().state, FormState::ReadyToSubmit);
    assert!(form.can_submit());
}

#[tokio::test(start_paused = true)]
async fn invalid_entry_takes_form_back_to_not_ready() {
    let form = FormMachine::new(&FormConfig::default()).unwrap();
    complete_both(&form);
    settle().await;
    assert!(form.can_submit());

    form.payment_details().handle_text_change("1234");
    settle().await;

    assert_eq!(
        form.payment_details().snapshot().state,
        SectionState::Invalid
    );
    assert!(!form.payment_details().snapshot().consent);
    assert_eq!(form.snapshot().state, FormState::NotReady);
}

#[tokio::test(start_paused = true)]
async fn submit_cycle_resets_sections() {
    let config = FormConfig::default();
    let form = FormMachine::new(&config).unwrap();
    complete_both(&form);
    settle().await;

    let follow_up = form.submit().expect("form is ready");
    assert_eq!(form.snapshot().state, FormState::Submitting);
    assert!(!form.can_submit());
    assert!(form.is_submitting());
    assert!(form.submit().is_none());

    tokio::time::sleep(config.submit_delay() - Duration::from_millis(1)).await;
    assert_eq!(form.snapshot().state, FormState::Submitting);

    let outcome = follow_up.await.unwrap();
    settle().await;

    assert_eq!(
        outcome,
        DispatchOutcome::Transitioned {
            from: FormState::Submitting,
            to: FormState::NotReady,
        }
    );
    assert_eq!(form.snapshot().state, FormState::NotReady);
    for section in [form.user_info(), form.payment_details()] {
        assert_eq!(
            section.snapshot(),
            SectionSnapshot {
                text: String::new(),
                consent: false,
                state: SectionState::Incomplete,
            }
        );
    }
}

#[tokio::test(start_paused = true)]
async fn form_stream_reports_every_mode() {
    let form = FormMachine::new(&FormConfig {
        submit_delay_ms: 100,
        ..FormConfig::default()
    })
    .unwrap();
    let mut modes = form.container().stream().map(|snapshot| snapshot.state);
    assert_eq!(modes.next().await, Some(FormState::NotReady));

    complete_both(&form);
    assert_eq!(modes.next().await, Some(FormState::ReadyToSubmit));

    let follow_up = form.submit().unwrap();
    assert_eq!(modes.next().await, Some(FormState::Submitting));

    follow_up.await.unwrap();
    assert_eq!(modes.next().await, Some(FormState::NotReady));
}

#[tokio::test(start_paused = true)]
async fn replacing_sections_rebinds_the_form() {
    let form = FormMachine::new(&FormConfig::default()).unwrap();
    settle().await;

    form.user_info().handle_text_change("Alice");
    form.user_info().handle_consent_change(true);
    form.sections()
        .replace(vec![form.user_info().container().clone()]);
    form.payment_details().handle_text_change("1234567812345678");
    settle().await;

    assert_eq!(form.binding().generation(), 1);
    assert_eq!(form.snapshot().state, FormState::ReadyToSubmit);

    form.payment_details().handle_text_change("");
    settle().await;
    assert_eq!(form.snapshot().state, FormState::ReadyToSubmit);

    let outcome = form.container().dispatch(FormEvent::HasUncompletedSections);
    assert!(outcome.is_transition());
}
