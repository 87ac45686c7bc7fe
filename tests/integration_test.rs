// Integration tests for the coordinator running on a file-backed SQLite store
mod fixtures;

use fixtures::{dates, records};
use leave_planner::error::PlannerError;
use leave_planner::interaction::{PickTarget, PlannerSession, SessionEffect};
use leave_planner::models::activity::{PlacementDetails, SYSTEM_HOLIDAY_ACTIVITY_ID};
use leave_planner::models::event::EventDraft;
use leave_planner::models::leave::LeaveKind;
use leave_planner::services::coordinator::Coordinator;
use leave_planner::services::store::SqliteStore;
use leave_planner::utils::date::DateRange;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> SqliteStore {
    let path = dir.path().join("planner.db");
    SqliteStore::open(path.to_str().unwrap()).expect("Failed to open store")
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let dir = TempDir::new().unwrap();

    // First session
    {
        let coordinator = Coordinator::new(open_store(&dir));
        coordinator.load_year(2024).await.unwrap();

        coordinator.add_activity(records::remote_work()).await.unwrap();
        coordinator
            .place_activity("remote", DateRange::normalized(dates::june(3), dates::june(5)))
            .await
            .unwrap();
        coordinator.add_event(records::dentist()).await.unwrap();
        coordinator
            .set_leave(dates::mar_1_2024(), LeaveKind::Full)
            .await
            .unwrap();
        coordinator
            .set_leave(dates::mar_2_2024(), LeaveKind::Morning)
            .await
            .unwrap();
        coordinator.set_total_leaves(27).await.unwrap();
    }

    // Second session reads everything back
    let coordinator = Coordinator::new(open_store(&dir));
    coordinator.load_year(2024).await.unwrap();

    let state = coordinator.state();
    assert_eq!(state.activities.len(), 2);
    assert!(state.activity(SYSTEM_HOLIDAY_ACTIVITY_ID).is_some());
    assert_eq!(state.placement_index.len(), 3);
    assert_eq!(state.events[0].location.as_deref(), Some("Rue de la Paix"));
    assert_eq!(state.settings.total_leaves(), 27);
    drop(state);

    assert_eq!(coordinator.leave_count(), 1.5);
    assert_eq!(coordinator.leave_balance(), 25.5);
}

#[tokio::test]
async fn test_range_crossing_new_year_visible_in_both_years() {
    let dir = TempDir::new().unwrap();
    let coordinator = Coordinator::new(open_store(&dir));
    coordinator.load_year(2024).await.unwrap();

    let range = DateRange::normalized(dates::dec_30_2024(), dates::jan_2_2025());
    let event = coordinator
        .add_event(EventDraft::new("Ski trip", dates::dec_30_2024()).with_range(range))
        .await
        .unwrap();

    coordinator.next_year().await.unwrap();
    let state = coordinator.state();
    assert_eq!(state.year, 2025);
    assert!(state.event_index.contains(dates::jan_2_2025(), &event.id));
    assert!(state.event_index.contains(dates::dec_30_2024(), &event.id));
}

#[tokio::test]
async fn test_delete_activity_cascades_in_database() {
    let dir = TempDir::new().unwrap();
    let coordinator = Coordinator::new(open_store(&dir));
    coordinator.load_year(2024).await.unwrap();

    coordinator.add_activity(records::remote_work()).await.unwrap();
    coordinator.add_activity(records::gym()).await.unwrap();
    coordinator
        .place_activity("remote", DateRange::normalized(dates::june(3), dates::june(7)))
        .await
        .unwrap();
    let gym = coordinator
        .place_activity("gym", DateRange::single(dates::june(4)))
        .await
        .unwrap();

    coordinator.delete_activity("remote").await.unwrap();
    {
        let state = coordinator.state();
        assert_eq!(state.placed_activities, vec![gym.clone()]);
        assert_eq!(state.placement_index.dates().collect::<Vec<_>>(), vec![dates::june(4)]);
    }

    // A reload agrees with the local cascade.
    coordinator.load_year(2024).await.unwrap();
    assert_eq!(coordinator.state().placed_activities, vec![gym]);
}

#[tokio::test]
async fn test_missing_record_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let coordinator = Coordinator::new(open_store(&dir));
    coordinator.load_year(2024).await.unwrap();

    let result = coordinator
        .update_placement(404, PlacementDetails::default())
        .await;
    assert!(matches!(result, Err(PlannerError::NotFound(_))));
    assert!(matches!(
        coordinator.clear_leave(dates::leap_day_2024()).await,
        Err(PlannerError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_session_picks_range_then_saves_event() {
    let dir = TempDir::new().unwrap();
    let coordinator = Coordinator::new(open_store(&dir));
    coordinator.load_year(2024).await.unwrap();
    let event = coordinator.add_event(records::dentist()).await.unwrap();
    let session = PlannerSession::new(coordinator);

    session.begin_picking(PickTarget::Event(event.id));
    session.pointer_down(dates::june(12));
    session.pointer_enter(dates::june(10));
    let effect = session.pointer_up().await.unwrap();

    let range = match effect {
        SessionEffect::RangePicked { target, range } => {
            assert_eq!(target, PickTarget::Event(event.id));
            range
        }
        other => panic!("unexpected effect {:?}", other),
    };
    assert_eq!(session.day_click(dates::june(10)).await.unwrap(), SessionEffect::None);

    session
        .coordinator()
        .update_event(event.id, event.to_draft().with_range(range))
        .await
        .unwrap();

    let state = session.coordinator().state();
    assert!(!state.event_index.contains(dates::june(5), &event.id));
    for day in 10..=12 {
        assert!(state.event_index.contains(dates::june(day), &event.id));
    }
}
