use gantt::model::{Allocation, AllocationOutcome, CropRef};
use gantt::wire::{ChangeOp, PushMessage, PushStatus};
use time::macros::date;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::*;
use crate::state::test_helpers::{test_schedule, test_state_with_plan};

fn uid(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

fn carrot_in_north(start: time::Date, end: time::Date) -> Allocation {
    Allocation {
        id: uid(2),
        lane_id: uid(100),
        crop: CropRef { id: uid(202), kind: "Carrot".into(), variety: None },
        start,
        end,
        outcome: AllocationOutcome::default(),
    }
}

async fn subscribe(state: &AppState, plan_id: Uuid) -> mpsc::Receiver<PushMessage> {
    let (tx, rx) = mpsc::channel(16);
    state
        .plans
        .write()
        .await
        .get_mut(&plan_id)
        .unwrap()
        .subscribers
        .insert(Uuid::new_v4(), tx);
    rx
}

// --- solve ---

#[tokio::test]
async fn move_applies_and_preserves_duration() {
    let schedule = test_schedule();
    let ops = vec![ChangeOp::Move {
        allocation_id: uid(1),
        target_lane_id: uid(101),
        new_start: date!(2024 - 06 - 01),
    }];
    let next = NaiveSolver.solve(&schedule, &ops).await.unwrap();
    let alloc = next.allocation(uid(1)).unwrap();
    assert_eq!(alloc.lane_id, uid(101));
    assert_eq!(alloc.start, date!(2024 - 06 - 01));
    // lettuce is 40 days long
    assert_eq!(alloc.end, date!(2024 - 07 - 11));
}

#[tokio::test]
async fn remove_applies() {
    let schedule = test_schedule();
    let ops = vec![ChangeOp::Remove { allocation_id: uid(1) }];
    let next = NaiveSolver.solve(&schedule, &ops).await.unwrap();
    assert!(next.allocations.is_empty());
}

#[tokio::test]
async fn unknown_allocation_is_an_error() {
    let schedule = test_schedule();
    let ops = vec![ChangeOp::Remove { allocation_id: uid(999) }];
    let err = NaiveSolver.solve(&schedule, &ops).await.unwrap_err();
    assert_eq!(err, SolveError::UnknownAllocation(uid(999)));
}

#[tokio::test]
async fn move_past_plan_end_is_infeasible() {
    let schedule = test_schedule();
    let ops = vec![ChangeOp::Move {
        allocation_id: uid(1),
        target_lane_id: uid(100),
        new_start: date!(2025 - 03 - 01),
    }];
    let err = NaiveSolver.solve(&schedule, &ops).await.unwrap_err();
    assert!(matches!(err, SolveError::Infeasible(_)));
}

// --- verify ---

#[test]
fn fallow_gap_of_exactly_the_minimum_passes() {
    let mut schedule = test_schedule();
    // lettuce ends May 21; 28 days later is Jun 18
    schedule
        .allocations
        .push(carrot_in_north(date!(2024 - 06 - 18), date!(2024 - 08 - 18)));
    assert!(verify(&schedule).is_ok());
}

#[test]
fn fallow_gap_one_day_short_fails() {
    let mut schedule = test_schedule();
    schedule
        .allocations
        .push(carrot_in_north(date!(2024 - 06 - 17), date!(2024 - 08 - 17)));
    let err = verify(&schedule).unwrap_err();
    assert!(matches!(err, SolveError::Infeasible(_)));
    assert!(err.to_string().contains("North bed"));
}

#[test]
fn estimate_outcome_profit_is_revenue_minus_cost() {
    let outcome = estimate_outcome(20.0, 60);
    assert!(outcome.revenue > outcome.cost);
    assert!((outcome.profit - (outcome.revenue - outcome.cost)).abs() < f64::EPSILON);
}

// --- jobs ---

#[tokio::test]
async fn run_adjust_broadcasts_lifecycle_and_commits() {
    let (state, plan_id) = test_state_with_plan().await;
    let mut rx = subscribe(&state, plan_id).await;
    let ops = vec![ChangeOp::Move {
        allocation_id: uid(1),
        target_lane_id: uid(101),
        new_start: date!(2024 - 06 - 01),
    }];

    run_adjust(state.clone(), plan_id, ops).await;

    assert_eq!(rx.recv().await.unwrap().status, PushStatus::Queued);
    assert_eq!(rx.recv().await.unwrap().status, PushStatus::Processing);
    let done = rx.recv().await.unwrap();
    assert_eq!(done.status, PushStatus::Completed);
    let pushed = done.schedule.unwrap();
    assert_eq!(pushed.allocation(uid(1)).unwrap().lane_id, uid(101));

    let plans = state.plans.read().await;
    assert_eq!(plans[&plan_id].schedule, pushed);
}

#[tokio::test]
async fn run_adjust_failure_broadcasts_failed_and_keeps_state() {
    let (state, plan_id) = test_state_with_plan().await;
    let before = state.plans.read().await[&plan_id].schedule.clone();
    let mut rx = subscribe(&state, plan_id).await;
    let ops = vec![ChangeOp::Move {
        allocation_id: uid(1),
        target_lane_id: uid(100),
        new_start: date!(2025 - 03 - 20),
    }];

    run_adjust(state.clone(), plan_id, ops).await;

    assert_eq!(rx.recv().await.unwrap().status, PushStatus::Queued);
    assert_eq!(rx.recv().await.unwrap().status, PushStatus::Processing);
    let failed = rx.recv().await.unwrap();
    assert_eq!(failed.status, PushStatus::Failed);
    assert!(failed.message.unwrap().contains("no feasible arrangement"));

    let plans = state.plans.read().await;
    assert_eq!(plans[&plan_id].schedule, before);
}

#[tokio::test]
async fn run_create_appends_planting_with_default_duration() {
    let (state, plan_id) = test_state_with_plan().await;
    let mut rx = subscribe(&state, plan_id).await;
    let request = gantt::wire::CreateAllocationRequest {
        catalog_item_id: uid(202),
        lane_id: uid(101),
        date: date!(2024 - 07 - 01),
    };

    run_create(state.clone(), plan_id, request).await;

    assert_eq!(rx.recv().await.unwrap().status, PushStatus::Queued);
    assert_eq!(rx.recv().await.unwrap().status, PushStatus::Processing);
    let done = rx.recv().await.unwrap();
    assert_eq!(done.status, PushStatus::Completed);
    let pushed = done.schedule.unwrap();
    assert_eq!(pushed.allocations.len(), 2);
    let created = pushed
        .allocations
        .iter()
        .find(|a| a.crop.kind == "Carrot")
        .unwrap();
    assert_eq!(created.lane_id, uid(101));
    assert_eq!(created.duration_days(), DEFAULT_GROW_DAYS);
}

#[tokio::test]
async fn run_create_with_unknown_item_fails() {
    let (state, plan_id) = test_state_with_plan().await;
    let mut rx = subscribe(&state, plan_id).await;
    let request = gantt::wire::CreateAllocationRequest {
        catalog_item_id: uid(999),
        lane_id: uid(101),
        date: date!(2024 - 07 - 01),
    };

    run_create(state.clone(), plan_id, request).await;

    assert_eq!(rx.recv().await.unwrap().status, PushStatus::Queued);
    assert_eq!(rx.recv().await.unwrap().status, PushStatus::Processing);
    let failed = rx.recv().await.unwrap();
    assert_eq!(failed.status, PushStatus::Failed);
    assert_eq!(failed.message.as_deref(), Some("unknown catalog item"));
}
