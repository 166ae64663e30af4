use crate::auth::use_auth;
use crate::components::icons::{BarChart3, DollarSign, Package, TrendingUp, Users};
use crate::notify::use_notify;
use bidash::ViewLifetime;
use bidash::views::kpis::{
    DATASETS_CHANNEL, KpiDisplay, KpisState, SNAPSHOT_CHANNEL, load_datasets, load_snapshot,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

fn card_icon(index: usize) -> AnyView {
    match index {
        0 => view! { <DollarSign attr:class="h-4 w-4" /> }.into_any(),
        1 => view! { <Package attr:class="h-4 w-4" /> }.into_any(),
        2 => view! { <TrendingUp attr:class="h-4 w-4" /> }.into_any(),
        _ => view! { <Users attr:class="h-4 w-4" /> }.into_any(),
    }
}

#[component]
pub fn KpisPage() -> impl IntoView {
    let auth = use_auth();
    let notify = use_notify();
    let state = RwSignal::new(KpisState::default());
    let lifetime = StoredValue::new_local(ViewLifetime::new());

    on_cleanup(move || {
        lifetime.try_with_value(|l| l.end());
    });

    {
        let api = auth.api();
        let ticket = lifetime.with_value(|l| l.ticket(DATASETS_CHANNEL));
        spawn_local(async move {
            if let Some(result) = load_datasets(&api, ticket).await {
                notify.push_opt(state.try_update(|s| s.apply_datasets(result)).flatten());
            }
        });
    }

    let on_select = move |ev: leptos::ev::Event| {
        let id = event_target_value(&ev);
        if !state.try_update(|s| s.select(&id)).unwrap_or(false) {
            return;
        }
        let api = auth.api();
        // 新票据使上一次未完成的查询失效
        let ticket = lifetime.with_value(|l| l.ticket(SNAPSHOT_CHANNEL));
        spawn_local(async move {
            if let Some(result) = load_snapshot(&api, ticket, &id).await {
                notify.push_opt(state.try_update(|s| s.apply_snapshot(result)).flatten());
            }
        });
    };

    let options = move || {
        state.with(|s| {
            s.datasets()
                .iter()
                .map(|d| (d.id.clone(), d.name.clone()))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="space-y-6">
            <div class="flex flex-col md:flex-row md:items-end md:justify-between gap-4">
                <div>
                    <h2 class="text-3xl font-bold">"KPIs"</h2>
                    <p class="text-base-content/70">"Key performance indicators for your data"</p>
                </div>
                <select
                    class="select select-bordered w-full md:w-72"
                    on:change=on_select
                    prop:value=move || state.with(|s| s.selected().unwrap_or_default().to_string())
                >
                    <option value="" disabled selected=move || state.with(|s| s.selected().is_none())>
                        "Select a dataset"
                    </option>
                    <For
                        each=options
                        key=|(id, _)| id.clone()
                        children=|(id, name)| view! { <option value=id>{name}</option> }
                    />
                </select>
            </div>

            {move || match state.with(|s| s.display()) {
                KpiDisplay::NoSelection => view! {
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body items-center text-center py-12 text-base-content/60">
                            <BarChart3 attr:class="h-12 w-12 mb-4 opacity-50" />
                            <h3 class="font-semibold">"Select a dataset"</h3>
                            <p class="text-sm">"Choose a dataset to view its KPIs and analytics"</p>
                        </div>
                    </div>
                }.into_any(),
                KpiDisplay::Loading => view! {
                    <div class="flex justify-center py-12">
                        <span class="loading loading-spinner loading-lg"></span>
                    </div>
                }.into_any(),
                KpiDisplay::Empty => view! {
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body items-center text-center py-12 text-base-content/60">
                            <h3 class="font-semibold">"No KPI data available"</h3>
                            <p class="text-sm">"Please try again later"</p>
                        </div>
                    </div>
                }.into_any(),
                KpiDisplay::Ready => {
                    let (cards, products) = state.with(|s| {
                        s.snapshot()
                            .map(|snap| (snap.cards(), snap.ranked_products()))
                            .unwrap_or_default()
                    });
                    view! {
                        <div class="space-y-6">
                            <div class="grid gap-4 md:grid-cols-2 lg:grid-cols-4">
                                {cards.into_iter().enumerate().map(|(i, card)| view! {
                                    <div class="card bg-base-100 shadow">
                                        <div class="card-body p-5">
                                            <div class="flex items-center justify-between text-base-content/70">
                                                <span class="text-sm font-medium">{card.title}</span>
                                                {card_icon(i)}
                                            </div>
                                            <div class="text-2xl font-bold">{card.value}</div>
                                            <p class="text-xs text-base-content/60">{card.caption}</p>
                                        </div>
                                    </div>
                                }).collect_view()}
                            </div>

                            <div class="card bg-base-100 shadow-xl">
                                <div class="card-body">
                                    <h3 class="card-title">"Top Products"</h3>
                                    <p class="text-sm text-base-content/70">"Best performing products by sales"</p>
                                    <div class="space-y-4 mt-2">
                                        {products.into_iter().map(|p| view! {
                                            <div class="flex items-center gap-4">
                                                <div class="badge badge-primary badge-lg">{p.rank}</div>
                                                <div class="flex-1">
                                                    <div class="flex justify-between">
                                                        <span class="font-medium">{p.name}</span>
                                                        <span class="font-semibold">{p.sales}</span>
                                                    </div>
                                                    <p class="text-xs text-base-content/60">{p.units}</p>
                                                    <progress
                                                        class="progress progress-primary w-full"
                                                        value=format!("{:.0}", p.share)
                                                        max="100"
                                                    ></progress>
                                                </div>
                                            </div>
                                        }).collect_view()}
                                    </div>
                                </div>
                            </div>
                        </div>
                    }.into_any()
                }
            }}
        </div>
    }
}
