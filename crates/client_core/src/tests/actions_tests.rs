use std::time::Duration;

use shared::domain::EntryId;

use super::*;
use crate::{
    error::GatewayError,
    events::RecordEvents,
    notify::NoticeLevel,
    resource::Entries,
    test_support::*,
};

async fn wait_for_searches(gateway: &FakeGateway<People>, expected: usize) {
    for _ in 0..200 {
        if gateway.searches().await.len() >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("expected {expected} searches");
}

fn people_list() -> (
    Arc<FakeGateway<People>>,
    Arc<RecordingNotifier>,
    Arc<QueryController<People>>,
) {
    let gateway = Arc::new(FakeGateway::<People>::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let list = QueryController::<People>::new(gateway.clone(), notifier.clone());
    (gateway, notifier, list)
}

#[tokio::test]
async fn confirmed_delete_calls_once_and_refreshes_once() {
    let gateway = Arc::new(FakeGateway::<Entries>::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let list = QueryController::<Entries>::new(gateway.clone(), notifier.clone());
    let prompt = RecordingPrompt::answering(true);

    let outcome = list.delete(EntryId(5), &prompt).await.expect("delete");

    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert_eq!(prompt.times_asked(), 1);
    assert_eq!(gateway.deletes().await, vec![EntryId(5)]);
    assert_eq!(gateway.searches().await.len(), 1);
    assert_eq!(notifier.successes(), vec!["Entry deleted."]);
}

#[tokio::test]
async fn declined_delete_makes_no_calls() {
    let (gateway, notifier, list) = people_list();
    let prompt = RecordingPrompt::answering(false);

    let outcome = list.delete(PersonId(5), &prompt).await.expect("declined");

    assert_eq!(outcome, DeleteOutcome::Declined);
    assert_eq!(gateway.network_calls().await, 0);
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn rejected_delete_shows_server_message() {
    let (gateway, notifier, list) = people_list();
    gateway
        .fail_delete(server_error(
            400,
            "Operação não permitida: pessoa possui lançamentos",
        ))
        .await;

    let err = list
        .delete(PersonId(5), &RecordingPrompt::answering(true))
        .await
        .expect_err("delete refused");

    assert!(matches!(err, ClientError::Gateway(GatewayError::Server(_))));
    assert_eq!(
        notifier.failures(),
        vec!["Operação não permitida: pessoa possui lançamentos"]
    );
    assert!(gateway.searches().await.is_empty());
}

#[tokio::test]
async fn delete_without_server_message_uses_fallback() {
    let (gateway, notifier, list) = people_list();
    gateway.fail_delete(transport_error()).await;

    list.delete(PersonId(5), &RecordingPrompt::answering(true))
        .await
        .expect_err("delete fails");

    assert_eq!(notifier.failures(), vec!["Could not delete person."]);
}

#[tokio::test]
async fn toggle_requests_the_opposite_status_and_refreshes() {
    let (gateway, notifier, list) = people_list();
    let toggle = StatusToggle::new(gateway.clone(), list.clone());

    let active = toggle
        .toggle(&person(3, "Josué Mariano", true))
        .await
        .expect("toggle");

    assert!(!active);
    assert_eq!(gateway.status_calls().await, vec![(PersonId(3), false)]);
    assert_eq!(gateway.searches().await.len(), 1);
    assert_eq!(notifier.successes(), vec!["Person deactivated."]);
}

#[tokio::test]
async fn failed_toggle_keeps_list_and_notifies_once() {
    let (gateway, notifier, list) = people_list();
    gateway
        .reply_search(Ok(page(vec![person(3, "Josué Mariano", true)], 1, 0)))
        .await;
    list.refresh().await.expect("initial load");
    gateway.fail_status(transport_error()).await;
    let toggle = StatusToggle::new(gateway.clone(), list.clone());
    let shown = list.result().await.content[0].clone();

    toggle.toggle(&shown).await.expect_err("toggle fails");

    assert_eq!(gateway.status_calls().await, vec![(PersonId(3), false)]);
    assert!(list.result().await.content[0].active);
    assert_eq!(gateway.searches().await.len(), 1);
    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Failure);
    assert_eq!(notices[0].message, "Could not change person status.");
}

#[tokio::test]
async fn toggle_needs_a_saved_person() {
    let (gateway, _notifier, list) = people_list();
    let toggle = StatusToggle::new(gateway.clone(), list);
    let mut unsaved = person(1, "Maria Abadia", true);
    unsaved.id = None;

    let err = toggle.toggle(&unsaved).await.expect_err("no identity");

    assert!(matches!(err, ClientError::MissingIdentity));
    assert!(gateway.status_calls().await.is_empty());
}

#[tokio::test]
async fn followed_list_publishes_status_change_and_refreshes_once() {
    let (gateway, notifier, list) = people_list();
    let events = RecordEvents::new();
    let mut rx = events.subscribe();
    let task = list.follow(&events);
    let toggle = StatusToggle::new(gateway.clone(), list.clone());

    toggle
        .set_active(PersonId(3), false)
        .await
        .expect("toggle");

    let event = rx.recv().await.expect("status event");
    assert_eq!(event.kind, RecordKind::Person);
    assert_eq!(event.id, Some(3));
    assert_eq!(event.change, ChangeKind::StatusChanged);
    wait_for_searches(&gateway, 1).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(gateway.searches().await.len(), 1);
    assert_eq!(notifier.successes(), vec!["Person deactivated."]);
    task.abort();
}

#[tokio::test]
async fn followed_list_publishes_delete_and_refreshes_once() {
    let (gateway, _notifier, list) = people_list();
    let events = RecordEvents::new();
    let mut rx = events.subscribe();
    let task = list.follow(&events);

    list.delete(PersonId(5), &RecordingPrompt::answering(true))
        .await
        .expect("delete");

    let event = rx.recv().await.expect("delete event");
    assert_eq!(event.id, Some(5));
    assert_eq!(event.change, ChangeKind::Deleted);
    wait_for_searches(&gateway, 1).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(gateway.searches().await.len(), 1);
    task.abort();
}
