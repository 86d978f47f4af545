//! Demo plan seeded at startup. There is no persistence layer; the server
//! starts from this fixture every run.

use gantt::model::{Allocation, CropRef, Lane, Schedule};
use gantt::palette::CatalogItem;
use time::macros::date;
use uuid::Uuid;

use crate::services::solver::estimate_outcome;
use crate::state::{AppState, PlanState};

/// Insert the demo plan: one season, three beds, four plantings.
pub async fn demo_plan(state: &AppState) {
    let plan_id = Uuid::new_v4();

    let north = Lane { id: Uuid::new_v4(), name: "North bed".into(), area_sq_m: 24.0 };
    let south = Lane { id: Uuid::new_v4(), name: "South bed".into(), area_sq_m: 18.0 };
    let east = Lane { id: Uuid::new_v4(), name: "East bed".into(), area_sq_m: 30.0 };

    let catalog = vec![
        CatalogItem { id: Uuid::new_v4(), kind: "Lettuce".into(), variety: Some("Butterhead".into()) },
        CatalogItem { id: Uuid::new_v4(), kind: "Lettuce".into(), variety: Some("Oakleaf".into()) },
        CatalogItem { id: Uuid::new_v4(), kind: "Carrot".into(), variety: None },
        CatalogItem { id: Uuid::new_v4(), kind: "Tomato".into(), variety: Some("Roma".into()) },
        CatalogItem { id: Uuid::new_v4(), kind: "Kale".into(), variety: None },
        CatalogItem { id: Uuid::new_v4(), kind: "Squash".into(), variety: Some("Butternut".into()) },
    ];

    let plantings = [
        (&north, &catalog[0], date!(2024 - 04 - 11), date!(2024 - 05 - 21)),
        (&north, &catalog[2], date!(2024 - 06 - 25), date!(2024 - 09 - 01)),
        (&south, &catalog[3], date!(2024 - 05 - 01), date!(2024 - 08 - 15)),
        (&south, &catalog[4], date!(2024 - 09 - 20), date!(2024 - 11 - 30)),
    ];
    let allocations = plantings
        .into_iter()
        .map(|(lane, item, start, end)| Allocation {
            id: Uuid::new_v4(),
            lane_id: lane.id,
            crop: CropRef {
                id: item.id,
                kind: item.kind.clone(),
                variety: item.variety.clone(),
            },
            start,
            end,
            outcome: estimate_outcome(lane.area_sq_m, (end - start).whole_days()),
        })
        .collect();

    let schedule = Schedule {
        id: Uuid::new_v4(),
        plan_start: date!(2024 - 04 - 01),
        plan_end: date!(2025 - 03 - 27),
        lanes: vec![north, south, east],
        allocations,
    };

    state
        .plans
        .write()
        .await
        .insert(plan_id, PlanState::new("Market garden 2024", schedule, catalog));
    tracing::info!(%plan_id, "seeded demo plan");
}
