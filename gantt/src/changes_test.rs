use super::*;
use crate::wire::ChangeOp;
use time::macros::date;
use uuid::Uuid;

fn uid(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

fn mv(alloc: u128, lane: u128) -> ChangeOp {
    ChangeOp::Move {
        allocation_id: uid(alloc),
        target_lane_id: uid(lane),
        new_start: date!(2024 - 06 - 01),
    }
}

#[test]
fn starts_empty() {
    let set = PendingChangeSet::new();
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);
}

#[test]
fn record_preserves_order() {
    let mut set = PendingChangeSet::new();
    set.record(mv(1, 10));
    set.record(mv(2, 10));
    set.record(mv(3, 11));
    let ids: Vec<Uuid> = set.ops().iter().map(ChangeOp::allocation_id).collect();
    assert_eq!(ids, vec![uid(1), uid(2), uid(3)]);
}

#[test]
fn second_change_to_same_allocation_supersedes() {
    let mut set = PendingChangeSet::new();
    set.record(mv(1, 10));
    set.record(mv(2, 10));
    set.record(mv(1, 99));
    assert_eq!(set.len(), 2);
    assert_eq!(
        set.ops()[0],
        ChangeOp::Move {
            allocation_id: uid(1),
            target_lane_id: uid(99),
            new_start: date!(2024 - 06 - 01),
        }
    );
}

#[test]
fn remove_supersedes_move_for_same_allocation() {
    let mut set = PendingChangeSet::new();
    set.record(mv(1, 10));
    set.record(ChangeOp::Remove { allocation_id: uid(1) });
    assert_eq!(set.len(), 1);
    assert_eq!(set.ops()[0], ChangeOp::Remove { allocation_id: uid(1) });
}

#[test]
fn take_all_drains_the_set() {
    let mut set = PendingChangeSet::new();
    set.record(mv(1, 10));
    set.record(mv(2, 11));
    let drained = set.take_all();
    assert_eq!(drained.len(), 2);
    assert!(set.is_empty());
}

#[test]
fn clear_discards_everything() {
    let mut set = PendingChangeSet::new();
    set.record(mv(1, 10));
    set.clear();
    assert!(set.is_empty());
}
