//! Cross-module flows: notes → tasks, fan-out → task pipeline, and the
//! task-visibility scenarios.

use anyhow::Result;
use chrono::Utc;
use finroots::model::{
    Branch, BranchId, LeadSourceRef, Member, MemberId, MemberTier, NoteId, Role, TaskLink,
    TaskStatus, User, UserId, VoiceNote,
};
use finroots::pipeline::{
    self,
    task::{TaskFilters, TaskSortKey, TaskView},
    SortDirection,
};
use finroots::scope::Viewer;
use finroots::service::{self, AssignTarget, TaskDraft, TaskService};
use finroots::store::CrmStore;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn seeded_store() -> CrmStore {
    let mut store = CrmStore::new();
    store.insert_branch(Branch::new(BranchId::new("b1"), "Pune East"));
    store.insert_user(User::advisor(
        UserId::new("adv1"),
        "Arun",
        Some(BranchId::new("b1")),
    ));
    store.insert_user(User::advisor(UserId::new("adv2"), "Bina", None));
    store.insert_user(User::admin(UserId::new("root"), "Ops"));

    let mut note = VoiceNote::new(
        NoteId::new("n1"),
        "Visited Asha, she wants a top-up",
        "…",
        Utc::now(),
    );
    note.action_items = vec!["prepare top-up quote".to_string()];
    store.insert_member(Member {
        id: MemberId::new("m1"),
        member_code: "FR-0001".to_string(),
        name: "Asha".to_string(),
        mobile: String::new(),
        dob: None,
        address: None,
        city: None,
        state: None,
        tier: MemberTier::Gold,
        active: true,
        assigned_to: vec![UserId::new("adv1")],
        created_by: UserId::new("adv1"),
        created_at: Utc::now(),
        location: None,
        digipin: None,
        lead_source: LeadSourceRef::default(),
        policies: Vec::new(),
        voice_notes: vec![note],
        is_spoc: false,
        spoc_id: None,
    });
    store
}

#[test]
fn test_personal_task_appears_only_in_personal_view() {
    let mut store = seeded_store();
    let admin = Viewer::new(UserId::new("root"), Role::Admin);

    // Personal task for adv1, no member/lead linkage
    TaskService::create_bulk(
        &mut store,
        &admin,
        &TaskDraft::new("file expense report", TaskLink::Personal),
        &AssignTarget::Advisors(vec![UserId::new("adv1")]),
        Utc::now(),
    )
    .unwrap();

    let adv1 = Viewer::new(UserId::new("adv1"), Role::Advisor);
    let personal = pipeline::task::run(
        &store,
        &adv1,
        &TaskFilters {
            view: TaskView::Personal,
            ..Default::default()
        },
        TaskSortKey::default(),
        SortDirection::Ascending,
        1,
    );
    assert_eq!(personal.total, 1);

    let customer = pipeline::task::run(
        &store,
        &adv1,
        &TaskFilters {
            view: TaskView::Customer,
            ..Default::default()
        },
        TaskSortKey::default(),
        SortDirection::Ascending,
        1,
    );
    assert_eq!(customer.total, 0);
}

#[test]
fn test_converted_action_item_flows_into_task_pipeline() -> Result<()> {
    init_tracing();
    let mut store = seeded_store();
    let advisor = Viewer::new(UserId::new("adv1"), Role::Advisor);
    let owner = pipeline::notes::NoteClient::Member(MemberId::new("m1"));

    let task_id = service::convert_action_item(
        &mut store,
        &owner,
        &NoteId::new("n1"),
        "prepare top-up quote",
        &advisor,
        Utc::now(),
    )?
    .expect("created");

    // The note no longer carries the item
    let member = store.member(&MemberId::new("m1")).unwrap();
    assert!(member.voice_notes[0].action_items.is_empty());

    // The task shows up in the advisor's customer view
    let page = pipeline::task::run(
        &store,
        &advisor,
        &TaskFilters {
            view: TaskView::Customer,
            ..Default::default()
        },
        TaskSortKey::default(),
        SortDirection::Ascending,
        1,
    );
    assert_eq!(page.total, 1);
    assert_eq!(page.rows[0].task_id, task_id);
    assert_eq!(page.rows[0].description, "prepare top-up quote");

    // Converting the same item again is a no-op
    let again = service::convert_action_item(
        &mut store,
        &owner,
        &NoteId::new("n1"),
        "prepare top-up quote",
        &advisor,
        Utc::now(),
    )?;
    assert!(again.is_none());
    assert_eq!(store.task_count(), 1);
    Ok(())
}

#[test]
fn test_reassignment_moves_visibility() {
    let mut store = seeded_store();
    let admin = Viewer::new(UserId::new("root"), Role::Admin);

    let ids = TaskService::create_bulk(
        &mut store,
        &admin,
        &TaskDraft::new("call Asha", TaskLink::Member(MemberId::new("m1"))),
        &AssignTarget::Advisors(vec![UserId::new("adv1")]),
        Utc::now(),
    )
    .unwrap();

    let adv1 = Viewer::new(UserId::new("adv1"), Role::Advisor);
    let adv2 = Viewer::new(UserId::new("adv2"), Role::Advisor);
    let all = TaskFilters::default();

    let visible = |store: &CrmStore, viewer: &Viewer| {
        pipeline::task::run(store, viewer, &all, TaskSortKey::default(), SortDirection::Ascending, 1).total
    };
    assert_eq!(visible(&store, &adv1), 1);
    assert_eq!(visible(&store, &adv2), 0);

    TaskService::reassign(&mut store, &ids[0], &UserId::new("adv2"), &admin, Utc::now()).unwrap();

    assert_eq!(visible(&store, &adv1), 0);
    assert_eq!(visible(&store, &adv2), 1);
}

#[test]
fn test_status_update_and_filter() {
    let mut store = seeded_store();
    let admin = Viewer::new(UserId::new("root"), Role::Admin);

    let ids = TaskService::create_bulk(
        &mut store,
        &admin,
        &TaskDraft::new("call Asha", TaskLink::Member(MemberId::new("m1"))),
        &AssignTarget::Advisors(vec![UserId::new("adv1")]),
        Utc::now(),
    )
    .unwrap();
    TaskService::update_status(&mut store, &ids[0], TaskStatus::Completed).unwrap();

    let page = pipeline::task::run(
        &store,
        &admin,
        &TaskFilters {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        },
        TaskSortKey::default(),
        SortDirection::Ascending,
        1,
    );
    assert_eq!(page.total, 1);

    let page = pipeline::task::run(
        &store,
        &admin,
        &TaskFilters {
            branch: Some(BranchId::new("b1")),
            ..Default::default()
        },
        TaskSortKey::default(),
        SortDirection::Ascending,
        1,
    );
    // adv1 sits in b1, so the branch filter matches via the assignee
    assert_eq!(page.total, 1);
}
