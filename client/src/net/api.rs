//! REST API helpers for the schedule endpoints.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning `None`/error, since these endpoints
//! are only called from the browser.

#![allow(clippy::unused_async)]

use gantt::model::{Allocation, Schedule};
use gantt::palette::CatalogItem;
use gantt::wire::{
    AcceptResponse, AdjustRequest, CreateAllocationRequest, CreateLaneRequest, CreateLaneResponse,
    PlanSummary,
};
use uuid::Uuid;

#[cfg(feature = "hydrate")]
async fn post_json<B, R>(url: &str, body: &B) -> Result<R, String>
where
    B: serde::Serialize,
    R: serde::de::DeserializeOwned,
{
    let resp = gloo_net::http::Request::post(url)
        .json(body)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(format!("request failed: {}", resp.status()));
    }
    resp.json::<R>().await.map_err(|e| e.to_string())
}

/// Fetch the plan list from `GET /api/plans`.
pub async fn fetch_plans() -> Option<Vec<PlanSummary>> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/plans").send().await.ok()?;
        if !resp.ok() {
            return None;
        }
        resp.json::<Vec<PlanSummary>>().await.ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// Fetch the authoritative schedule snapshot.
pub async fn fetch_schedule(plan_id: Uuid) -> Option<Schedule> {
    #[cfg(feature = "hydrate")]
    {
        let url = format!("/api/plans/{plan_id}/schedule");
        let resp = gloo_net::http::Request::get(&url).send().await.ok()?;
        if !resp.ok() {
            return None;
        }
        resp.json::<Schedule>().await.ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = plan_id;
        None
    }
}

/// Fetch the crop catalog for the palette panel.
pub async fn fetch_catalog(plan_id: Uuid) -> Option<Vec<CatalogItem>> {
    #[cfg(feature = "hydrate")]
    {
        let url = format!("/api/plans/{plan_id}/catalog");
        let resp = gloo_net::http::Request::get(&url).send().await.ok()?;
        if !resp.ok() {
            return None;
        }
        resp.json::<Vec<CatalogItem>>().await.ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = plan_id;
        None
    }
}

/// Fetch one allocation's detail.
pub async fn fetch_allocation(plan_id: Uuid, allocation_id: Uuid) -> Option<Allocation> {
    #[cfg(feature = "hydrate")]
    {
        let url = format!("/api/plans/{plan_id}/allocations/{allocation_id}");
        let resp = gloo_net::http::Request::get(&url).send().await.ok()?;
        if !resp.ok() {
            return None;
        }
        resp.json::<Allocation>().await.ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (plan_id, allocation_id);
        None
    }
}

/// Submit a change set to `POST /api/plans/{id}/adjust`.
///
/// # Errors
///
/// Returns the transport or HTTP error as a string; an accepted-but-rejected
/// change comes back as `Ok` with `accepted: false`.
pub async fn post_adjust(plan_id: Uuid, request: &AdjustRequest) -> Result<AcceptResponse, String> {
    #[cfg(feature = "hydrate")]
    {
        post_json(&format!("/api/plans/{plan_id}/adjust"), request).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (plan_id, request);
        Err("not available on server".to_owned())
    }
}

/// Create an allocation from a palette drop.
///
/// # Errors
///
/// Same contract as [`post_adjust`].
pub async fn post_allocation(
    plan_id: Uuid,
    request: &CreateAllocationRequest,
) -> Result<AcceptResponse, String> {
    #[cfg(feature = "hydrate")]
    {
        post_json(&format!("/api/plans/{plan_id}/allocations"), request).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (plan_id, request);
        Err("not available on server".to_owned())
    }
}

/// Create a lane. An accepted response carries the created lane's id.
///
/// # Errors
///
/// Same contract as [`post_adjust`].
pub async fn post_lane(
    plan_id: Uuid,
    request: &CreateLaneRequest,
) -> Result<CreateLaneResponse, String> {
    #[cfg(feature = "hydrate")]
    {
        post_json(&format!("/api/plans/{plan_id}/lanes"), request).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (plan_id, request);
        Err("not available on server".to_owned())
    }
}

/// Remove an empty lane.
///
/// # Errors
///
/// Same contract as [`post_adjust`].
pub async fn delete_lane(plan_id: Uuid, lane_id: Uuid) -> Result<AcceptResponse, String> {
    #[cfg(feature = "hydrate")]
    {
        let url = format!("/api/plans/{plan_id}/lanes/{lane_id}");
        let resp = gloo_net::http::Request::delete(&url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(format!("request failed: {}", resp.status()));
        }
        resp.json::<AcceptResponse>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (plan_id, lane_id);
        Err("not available on server".to_owned())
    }
}
