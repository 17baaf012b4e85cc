use meeting_planner::adapters::persistence::{JsonRepo, SqliteRepo};
use meeting_planner::domain::{
    AgendaItemUpdate, Meeting, MeetingState, SlotCommand, SlotList, SlotRequest,
};
use meeting_planner::ports::MeetingRepoPort;

const T: i64 = 1_704_103_200_000;

/// Meeting with every piece of state a reload must keep: positions, numbers,
/// proposed and spacer flags, accumulated timer time and votes in both slot lists.
fn populated_meeting() -> Meeting {
    let mut m = Meeting::new("m1", "Weekly", "owner");
    m.set_start_time(T);
    m.reminder_advance = 15;
    m.update_agenda(&[
        AgendaItemUpdate::new_item("Intro"),
        AgendaItemUpdate {
            spacer: Some(true),
            ..AgendaItemUpdate::new_item("Break")
        },
        AgendaItemUpdate::new_item("Budget"),
        AgendaItemUpdate {
            proposed: Some(true),
            ..AgendaItemUpdate::new_item("Maybe")
        },
    ])
    .unwrap();

    let budget = m
        .agenda_items()
        .iter()
        .find(|a| a.subject == "Budget")
        .map(|a| a.id.clone())
        .unwrap();
    m.start_timer(&budget, T).unwrap();
    m.stop_timer(T + 90_000);

    for list in [SlotList::Current, SlotList::Future] {
        m.act_on_proposed_time(&SlotRequest::new(list, SlotCommand::AddTime { time: T }))
            .unwrap();
        m.act_on_proposed_time(&SlotRequest::new(
            list,
            SlotCommand::SetValue {
                time: T,
                user: "alice".into(),
                value: 2,
            },
        ))
        .unwrap();
    }
    m.set_state(MeetingState::Completed);
    m
}

fn assert_same_graph(loaded: &Meeting, original: &Meeting) {
    assert_eq!(loaded, original);
    let shape: Vec<(i32, i32, bool, i64)> = loaded
        .agenda_items()
        .iter()
        .map(|a| (a.position, a.number, a.proposed, a.timer_elapsed()))
        .collect();
    assert_eq!(
        shape,
        vec![(1, 1, false, 0), (2, -1, false, 0), (3, 2, false, 90_000), (4, 3, true, 0)]
    );
    for list in [SlotList::Current, SlotList::Future] {
        assert_eq!(
            loaded.find_slot(list, T).and_then(|s| s.person_value("alice")),
            Some(2)
        );
    }
}

#[tokio::test]
async fn test_sqlite_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let original = populated_meeting();
    {
        let repo = SqliteRepo::connect(dir.path()).await.unwrap();
        repo.save_meeting(&original).await.unwrap();
    }
    let repo = SqliteRepo::connect(dir.path()).await.unwrap();
    let loaded = repo.load_meeting("m1").await.unwrap().unwrap();
    assert_same_graph(&loaded, &original);
}

#[tokio::test]
async fn test_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let original = populated_meeting();
    JsonRepo::open(dir.path())
        .await
        .unwrap()
        .save_meeting(&original)
        .await
        .unwrap();
    let repo = JsonRepo::open(dir.path()).await.unwrap();
    let loaded = repo.load_meeting("m1").await.unwrap().unwrap();
    assert_same_graph(&loaded, &original);
}
