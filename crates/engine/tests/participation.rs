mod common;

use std::sync::Arc;

use engine::{EngineError, JoinEventCmd, PaymentMethod};

use common::{
    drain, engine_with_db, engine_with_notifications, engine_with_pool, open_event, team_event,
    user,
};

#[tokio::test]
async fn host_is_seated_on_team_one() {
    let (engine, _db) = engine_with_db().await;
    let host = user(&engine, "hana").await;

    let event = engine.create_event(team_event(host.id, 2, 2)).await.unwrap();
    let detail = engine.event_with_participants(event.id).await.unwrap();

    assert_eq!(detail.participants.len(), 1);
    let seat = &detail.participants[0];
    assert_eq!(seat.user_id, host.id);
    assert!(seat.paid);
    assert_eq!(seat.payment_method, Some(PaymentMethod::Direct));
    assert_eq!(seat.team_color.as_deref(), Some("red"));
}

#[tokio::test]
async fn one_by_one_scenario_fills_then_frees_team_two() {
    let (engine, _db) = engine_with_db().await;
    let host = user(&engine, "hana").await;
    let guest_a = user(&engine, "ayo").await;
    let guest_b = user(&engine, "bea").await;
    let event = engine.create_event(team_event(host.id, 1, 1)).await.unwrap();

    let a = engine
        .join_event(JoinEventCmd::new(event.id, guest_a.id, PaymentMethod::Direct))
        .await
        .unwrap();
    assert_eq!(a.team_color.as_deref(), Some("blue"));
    assert!(a.paid);

    let err = engine
        .join_event(JoinEventCmd::new(event.id, guest_b.id, PaymentMethod::Card))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::CapacityExceeded("teams are already full".to_string()));

    engine.leave_event(event.id, guest_a.id).await.unwrap();
    let b = engine
        .join_event(JoinEventCmd::new(event.id, guest_b.id, PaymentMethod::Card))
        .await
        .unwrap();
    assert_eq!(b.team_color.as_deref(), Some("blue"));
    assert!(!b.paid);
    assert_eq!(engine.participant_count(event.id).await.unwrap(), 2);
}

#[tokio::test]
async fn joining_twice_is_a_conflict() {
    let (engine, _db) = engine_with_db().await;
    let host = user(&engine, "hana").await;
    let guest = user(&engine, "gus").await;
    let event = engine.create_event(open_event(host.id, 10)).await.unwrap();

    let cmd = JoinEventCmd::new(event.id, guest.id, PaymentMethod::Direct);
    engine.join_event(cmd.clone()).await.unwrap();
    let err = engine.join_event(cmd).await.unwrap_err();

    assert!(matches!(err, EngineError::Conflict(_)));
    assert_eq!(engine.participant_count(event.id).await.unwrap(), 2);
}

#[tokio::test]
async fn host_joining_own_event_is_a_conflict() {
    let (engine, _db) = engine_with_db().await;
    let host = user(&engine, "hana").await;
    let event = engine.create_event(open_event(host.id, 10)).await.unwrap();

    let err = engine
        .join_event(JoinEventCmd::new(event.id, host.id, PaymentMethod::Direct))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn join_rejects_unknown_event_and_user() {
    let (engine, _db) = engine_with_db().await;
    let host = user(&engine, "hana").await;
    let event = engine.create_event(open_event(host.id, 10)).await.unwrap();

    let err = engine
        .join_event(JoinEventCmd::new(event.id + 100, host.id, PaymentMethod::Direct))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("event".to_string()));

    let err = engine
        .join_event(JoinEventCmd::new(event.id, 9_999, PaymentMethod::Direct))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("user".to_string()));
}

#[tokio::test]
async fn open_event_caps_total_players() {
    let (engine, _db) = engine_with_db().await;
    let host = user(&engine, "hana").await;
    let guest = user(&engine, "gus").await;
    let late = user(&engine, "lou").await;
    let event = engine.create_event(open_event(host.id, 2)).await.unwrap();

    let seat = engine
        .join_event(JoinEventCmd::new(event.id, guest.id, PaymentMethod::Direct))
        .await
        .unwrap();
    assert_eq!(seat.team_color, None);

    let err = engine
        .join_event(JoinEventCmd::new(event.id, late.id, PaymentMethod::Direct))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::CapacityExceeded(_)));
}

#[tokio::test]
async fn cancelled_event_refuses_joins() {
    let (engine, _db) = engine_with_db().await;
    let host = user(&engine, "hana").await;
    let guest = user(&engine, "gus").await;
    let event = engine.create_event(open_event(host.id, 10)).await.unwrap();
    engine.cancel_event(event.id).await.unwrap();

    let err = engine
        .join_event(JoinEventCmd::new(event.id, guest.id, PaymentMethod::Direct))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ValidationFailed("event is cancelled".to_string()));
}

#[tokio::test]
async fn leave_then_rejoin_takes_a_fresh_seat() {
    let (engine, _db) = engine_with_db().await;
    let host = user(&engine, "hana").await;
    let a = user(&engine, "ayo").await;
    let b = user(&engine, "bea").await;
    let event = engine.create_event(team_event(host.id, 2, 2)).await.unwrap();

    let first = engine
        .join_event(JoinEventCmd::new(event.id, a.id, PaymentMethod::Direct))
        .await
        .unwrap();
    assert_eq!(first.team_color.as_deref(), Some("red"));
    engine
        .join_event(JoinEventCmd::new(event.id, b.id, PaymentMethod::Direct))
        .await
        .unwrap();

    engine.leave_event(event.id, a.id).await.unwrap();
    let again = engine
        .join_event(JoinEventCmd::new(event.id, a.id, PaymentMethod::Card))
        .await
        .unwrap();
    // Team one has a free seat again after the leave.
    assert_eq!(again.team_color.as_deref(), Some("red"));
    assert_ne!(again.id, first.id);
}

#[tokio::test]
async fn leave_errors() {
    let (engine, _db) = engine_with_db().await;
    let host = user(&engine, "hana").await;
    let guest = user(&engine, "gus").await;
    let event = engine.create_event(open_event(host.id, 10)).await.unwrap();

    let err = engine.leave_event(event.id, guest.id).await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("participant".to_string()));

    let err = engine.leave_event(event.id, host.id).await.unwrap_err();
    assert!(matches!(err, EngineError::ValidationFailed(_)));
}

#[tokio::test]
async fn swap_twice_restores_colors() {
    let (engine, _db) = engine_with_db().await;
    let host = user(&engine, "hana").await;
    let guest = user(&engine, "gus").await;
    let event = engine.create_event(team_event(host.id, 1, 1)).await.unwrap();
    engine
        .join_event(JoinEventCmd::new(event.id, guest.id, PaymentMethod::Direct))
        .await
        .unwrap();

    let (h, g) = engine
        .swap_participant_colors(event.id, host.id, guest.id)
        .await
        .unwrap();
    assert_eq!(h.team_color.as_deref(), Some("blue"));
    assert_eq!(g.team_color.as_deref(), Some("red"));

    engine
        .swap_participant_colors(event.id, guest.id, host.id)
        .await
        .unwrap();
    let detail = engine.event_with_participants(event.id).await.unwrap();
    let colors: Vec<_> = detail
        .participants
        .iter()
        .map(|p| (p.user_id, p.team_color.clone()))
        .collect();
    assert_eq!(
        colors,
        vec![
            (host.id, Some("red".to_string())),
            (guest.id, Some("blue".to_string()))
        ]
    );
}

#[tokio::test]
async fn swap_with_missing_participant_changes_nothing() {
    let (engine, _db) = engine_with_db().await;
    let host = user(&engine, "hana").await;
    let stranger = user(&engine, "sam").await;
    let event = engine.create_event(team_event(host.id, 1, 1)).await.unwrap();

    let err = engine
        .swap_participant_colors(event.id, host.id, stranger.id)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("participant".to_string()));

    let err = engine
        .swap_participant_colors(event.id, host.id, host.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ValidationFailed(_)));

    let detail = engine.event_with_participants(event.id).await.unwrap();
    assert_eq!(detail.participants[0].team_color.as_deref(), Some("red"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_joins_never_overfill_teams() {
    // Several pooled connections, so only the event lock keeps the
    // count-then-insert of overlapping joins apart.
    let (engine, _dir) = engine_with_pool(8).await;
    let host = user(&engine, "hana").await;
    let mut guests = Vec::new();
    for i in 0..12 {
        guests.push(user(&engine, &format!("guest{i}")).await);
    }
    let event = engine.create_event(team_event(host.id, 3, 2)).await.unwrap();
    let engine = Arc::new(engine);

    let mut handles = Vec::new();
    for guest in guests {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine
                .join_event(JoinEventCmd::new(event.id, guest.id, PaymentMethod::Direct))
                .await
        }));
    }

    let mut seated = 0;
    let mut full = 0;
    let mut other = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => seated += 1,
            Err(EngineError::CapacityExceeded(_)) => full += 1,
            Err(err) => other.push(err.to_string()),
        }
    }
    assert!(other.is_empty(), "unexpected errors: {other:?}");
    // Host holds one of the three red seats.
    assert_eq!(seated, 4);
    assert_eq!(full, 8);

    let detail = engine.event_with_participants(event.id).await.unwrap();
    assert_eq!(detail.participants.len(), 5);
    let red = detail
        .participants
        .iter()
        .filter(|p| p.team_color.as_deref() == Some("red"))
        .count();
    let blue = detail
        .participants
        .iter()
        .filter(|p| p.team_color.as_deref() == Some("blue"))
        .count();
    assert_eq!((red, blue), (3, 2));
}

#[tokio::test]
async fn host_hears_about_joins_and_leaves() {
    let (engine, worker) = engine_with_notifications().await;
    let host = user(&engine, "hana").await;
    engine
        .update_push_token(host.id, Some("ExponentPushToken[host]"))
        .await
        .unwrap();
    let guest = user(&engine, "gus").await;
    let event = engine.create_event(open_event(host.id, 10)).await.unwrap();

    engine
        .join_event(JoinEventCmd::new(event.id, guest.id, PaymentMethod::Direct))
        .await
        .unwrap();
    engine.leave_event(event.id, guest.id).await.unwrap();
    drop(engine);

    let delivered = drain(worker).await;
    assert_eq!(delivered.len(), 2);
    assert!(delivered.iter().all(|n| n.address == "ExponentPushToken[host]"));
    assert!(delivered[0].body.contains("joined"));
    assert!(delivered[1].body.contains("left"));
}
