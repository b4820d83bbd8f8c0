//! E2E tests for the contact form and its notifications

use crate::common::fixtures::{PageFixture, SUBMIT_LABEL};
use crate::common::mock_github::offline;
use portfolio::contact::{
    FormData, MessageSender, SendError, SubmitOutcome, ERROR_LABEL, ERROR_MESSAGE, PENDING_LABEL,
    SENT_LABEL, SENT_MESSAGE,
};
use portfolio::dom::DomEvent;
use portfolio::events::names;
use portfolio::services::time_source::RealTimeSource;
use portfolio::{Config, Portfolio};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn portfolio(page: &PageFixture) -> Portfolio {
    Portfolio::new(
        page.document.clone(),
        Config::default(),
        RealTimeSource::shared(),
        offline(),
    )
}

fn fill(page: &PageFixture) {
    page.name_field.set_value("Ada");
    page.email_field.set_value("ada@example.com");
    page.message_field.set_value("Hello there");
}

struct BouncingSender;

#[async_trait::async_trait]
impl MessageSender for BouncingSender {
    async fn send(&self, _data: &FormData) -> Result<(), SendError> {
        Err(SendError::Rejected("mailbox full".to_string()))
    }
}

#[tokio::test(start_paused = true)]
async fn test_submit_sequence() {
    let page = PageFixture::new();
    let mut portfolio = portfolio(&page);
    fill(&page);
    let start = Instant::now();

    let mut event = DomEvent::new();
    let task = portfolio.submit_contact(&mut event).unwrap();

    assert!(event.default_prevented());
    assert_eq!(page.submit_button.html(), PENDING_LABEL);
    assert!(page.submit_button.is_disabled());

    // A second submit while pending does nothing.
    assert!(portfolio.submit_contact(&mut DomEvent::new()).is_none());

    sleep_until(start + ms(1999)).await;
    assert_eq!(page.submit_button.html(), PENDING_LABEL);
    assert_eq!(page.name_field.value(), "Ada");

    sleep_until(start + ms(2001)).await;
    assert_eq!(page.submit_button.html(), SENT_LABEL);
    assert!(page.submit_button.is_disabled());
    assert_eq!(page.name_field.value(), "");
    assert_eq!(page.message_field.value(), "");
    assert_eq!(page.notifications(), vec![SENT_MESSAGE.to_string()]);

    sleep_until(start + ms(5001)).await;
    assert_eq!(page.submit_button.html(), SUBMIT_LABEL);
    assert!(!page.submit_button.is_disabled());
    assert_eq!(task.await.unwrap(), SubmitOutcome::Sent);

    // Shown at 2000, five seconds on screen, 300 ms exit.
    sleep_until(start + ms(7299)).await;
    assert_eq!(page.notifications().len(), 1);
    sleep_until(start + ms(7301)).await;
    assert!(page.notifications().is_empty());

    let events = portfolio.events();
    assert_eq!(events.count(names::CONTACT_PENDING), 1);
    assert_eq!(events.count(names::CONTACT_SENT), 1);
    assert_eq!(events.count(names::CONTACT_RESTORED), 1);
    assert!(events.has_match(
        names::NOTIFICATION_SHOWN,
        &serde_json::json!({ "kind": "success" })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_form_can_be_sent_again_after_restore() {
    let page = PageFixture::new();
    let mut portfolio = portfolio(&page);
    let start = Instant::now();

    fill(&page);
    portfolio.submit_contact(&mut DomEvent::new()).unwrap();
    sleep_until(start + ms(5001)).await;

    fill(&page);
    let second = portfolio.submit_contact(&mut DomEvent::new()).unwrap();
    assert_eq!(second.await.unwrap(), SubmitOutcome::Sent);
    assert_eq!(portfolio.events().count(names::CONTACT_SENT), 2);
}

#[tokio::test(start_paused = true)]
async fn test_failed_delivery_keeps_the_message() {
    let page = PageFixture::new();
    let mut portfolio = portfolio(&page).with_sender(Arc::new(BouncingSender));
    fill(&page);
    let start = Instant::now();

    let task = portfolio.submit_contact(&mut DomEvent::new()).unwrap();

    sleep_until(start + ms(1)).await;
    assert_eq!(page.submit_button.html(), ERROR_LABEL);
    assert_eq!(page.message_field.value(), "Hello there");
    assert_eq!(page.notifications(), vec![ERROR_MESSAGE.to_string()]);

    assert_eq!(task.await.unwrap(), SubmitOutcome::Failed);
    assert_eq!(page.submit_button.html(), SUBMIT_LABEL);
    assert!(!page.submit_button.is_disabled());
    assert!(portfolio.events().has_match(
        names::CONTACT_FAILED,
        &serde_json::json!({ "error": "message rejected: mailbox full" })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_close_button_dismisses_early() {
    let page = PageFixture::new();
    let mut portfolio = portfolio(&page);
    fill(&page);
    let start = Instant::now();

    portfolio.submit_contact(&mut DomEvent::new()).unwrap();
    sleep_until(start + ms(2200)).await;

    let close = page
        .document
        .select_first(".notification-close")
        .unwrap()
        .children()[0]
        .clone();
    portfolio.on_click(&close, &mut DomEvent::new());

    sleep_until(start + ms(2200 + 301)).await;
    assert!(page.notifications().is_empty());
    assert!(portfolio.events().has_match(
        names::NOTIFICATION_REMOVED,
        &serde_json::json!({ "dismissed": true })
    ));
}

#[tokio::test]
async fn test_focus_styling_follows_value() {
    let page = PageFixture::new();
    let portfolio = portfolio(&page);
    let group = page.document.parent_of(&page.email_field).unwrap();

    portfolio.focus_field(&page.email_field);
    assert!(group.has_class("focused"));

    portfolio.blur_field(&page.email_field);
    assert!(!group.has_class("focused"));

    portfolio.focus_field(&page.email_field);
    page.email_field.set_value("ada@example.com");
    portfolio.blur_field(&page.email_field);
    assert!(group.has_class("focused"));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_freezes_form_and_notification() {
    let page = PageFixture::new();
    let mut portfolio = portfolio(&page);
    fill(&page);
    let start = Instant::now();

    let task = portfolio.submit_contact(&mut DomEvent::new()).unwrap();
    sleep_until(start + ms(2100)).await;
    assert_eq!(page.notifications(), vec![SENT_MESSAGE.to_string()]);

    portfolio.shutdown().await;
    sleep_until(start + ms(12_000)).await;

    assert_eq!(page.notifications(), vec![SENT_MESSAGE.to_string()]);
    assert_eq!(page.submit_button.html(), SENT_LABEL);
    assert!(page.submit_button.is_disabled());
    assert!(task.await.unwrap_err().is_cancelled());
    assert_eq!(portfolio.events().count(names::CONTACT_RESTORED), 0);
    assert_eq!(portfolio.events().count(names::NOTIFICATION_REMOVED), 0);
}
