//! Home page — the plan list.

use gantt::wire::PlanSummary;
use leptos::prelude::*;

/// Lists the available plans with links into the schedule board.
#[component]
pub fn HomePage() -> impl IntoView {
    let plans = RwSignal::new(None::<Vec<PlanSummary>>);

    #[cfg(feature = "hydrate")]
    {
        use leptos::task::spawn_local;

        Effect::new(move || {
            spawn_local(async move {
                plans.set(Some(crate::net::api::fetch_plans().await.unwrap_or_default()));
            });
        });
    }

    view! {
        <main class="home-page">
            <h1>"Furrow"</h1>
            <p class="home-page__tagline">"Cultivation schedules, one bed at a time."</p>
            {move || match plans.get() {
                None => view! { <p class="home-page__loading">"Loading plans…"</p> }.into_any(),
                Some(list) if list.is_empty() => {
                    view! { <p class="home-page__empty">"No plans yet."</p> }.into_any()
                }
                Some(list) => view! {
                    <ul class="home-page__plans">
                        {list
                            .into_iter()
                            .map(|plan| {
                                let href = format!("/plan/{}", plan.id);
                                view! {
                                    <li>
                                        <a href=href>{plan.name}</a>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                }
                .into_any(),
            }}
        </main>
    }
}
