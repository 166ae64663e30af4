use crate::auth::use_auth;
use crate::components::icons::{Database, FileIcon};
use crate::notify::use_notify;
use bidash::ViewLifetime;
use bidash::views::datasets::{
    DETAIL_CHANNEL, DatasetsState, LIST_CHANNEL, ListDisplay, load_datasets, load_detail,
};
use bidash::format::format_count;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn DatasetsPage() -> impl IntoView {
    let auth = use_auth();
    let notify = use_notify();
    let state = RwSignal::new(DatasetsState::default());
    let lifetime = StoredValue::new_local(ViewLifetime::new());

    on_cleanup(move || {
        lifetime.try_with_value(|l| l.end());
    });

    // 挂载时加载列表
    {
        let api = auth.api();
        let ticket = lifetime.with_value(|l| l.ticket(LIST_CHANNEL));
        state.update(|s| s.begin_load());
        spawn_local(async move {
            if let Some(result) = load_datasets(&api, ticket).await {
                notify.push_opt(state.try_update(|s| s.apply_list(result)).flatten());
            }
        });
    }

    let view_detail = move |id: String| {
        let api = auth.api();
        let ticket = lifetime.with_value(|l| l.ticket(DETAIL_CHANNEL));
        state.update(|s| s.begin_detail(&id));
        spawn_local(async move {
            if let Some(result) = load_detail(&api, ticket, &id).await {
                notify.push_opt(state.try_update(|s| s.apply_detail(result)).flatten());
            }
        });
    };

    let display = move || state.with(|s| s.display());
    let detail_loading = move || state.with(|s| s.is_detail_loading());

    view! {
        <div class="space-y-6">
            <div>
                <h2 class="text-3xl font-bold">"Datasets"</h2>
                <p class="text-base-content/70">"Manage and explore your uploaded data"</p>
            </div>

            <div class="grid gap-6 lg:grid-cols-3">
                <div class="card bg-base-100 shadow-xl lg:col-span-2">
                    <div class="card-body p-0">
                        <div class="p-6 pb-2">
                            <h3 class="card-title">"Your Datasets"</h3>
                            <p class="text-base-content/70 text-sm">{move || state.with(|s| s.count_label())}</p>
                        </div>

                        {move || match display() {
                            ListDisplay::Loading => view! {
                                <div class="flex justify-center py-12">
                                    <span class="loading loading-spinner loading-md"></span>
                                </div>
                            }.into_any(),
                            ListDisplay::Empty => view! {
                                <div class="flex flex-col items-center py-12 text-base-content/60">
                                    <Database attr:class="h-12 w-12 mb-4 opacity-50" />
                                    <h4 class="font-semibold">"No datasets"</h4>
                                    <p class="text-sm">"Upload your first dataset to get started"</p>
                                </div>
                            }.into_any(),
                            ListDisplay::Table => view! {
                                <div class="overflow-x-auto w-full">
                                    <table class="table table-zebra w-full">
                                        <thead>
                                            <tr>
                                                <th>"Name"</th>
                                                <th>"Rows"</th>
                                                <th>"Columns"</th>
                                                <th class="hidden md:table-cell">"Size"</th>
                                                <th class="hidden md:table-cell">"Uploaded"</th>
                                                <th></th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            <For
                                                each=move || state.with(|s| s.rows())
                                                key=|row| row.id.clone()
                                                children=move |row| {
                                                    let id = row.id.clone();
                                                    view! {
                                                        <tr>
                                                            <td>
                                                                <div class="flex items-center gap-2 font-medium">
                                                                    <FileIcon attr:class="h-4 w-4 opacity-50" />
                                                                    {row.name}
                                                                </div>
                                                            </td>
                                                            <td>{row.rows}</td>
                                                            <td><span class="badge badge-outline">{row.columns}</span></td>
                                                            <td class="hidden md:table-cell">{row.size}</td>
                                                            <td class="hidden md:table-cell">{row.uploaded}</td>
                                                            <td>
                                                                <button
                                                                    class="btn btn-ghost btn-sm"
                                                                    disabled=detail_loading
                                                                    on:click=move |_| view_detail(id.clone())
                                                                >
                                                                    "View"
                                                                </button>
                                                            </td>
                                                        </tr>
                                                    }
                                                }
                                            />
                                        </tbody>
                                    </table>
                                </div>
                            }.into_any(),
                        }}
                    </div>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title">"Dataset Details"</h3>
                        {move || {
                            if detail_loading() {
                                return view! {
                                    <div class="flex justify-center py-8">
                                        <span class="loading loading-spinner loading-md"></span>
                                    </div>
                                }.into_any();
                            }
                            match state.with(|s| s.detail().cloned()) {
                                None => view! {
                                    <p class="text-base-content/60 text-sm py-8 text-center">
                                        "Select a dataset to view details"
                                    </p>
                                }.into_any(),
                                Some(detail) => {
                                    let summary = detail.summary_lines();
                                    view! {
                                        <div class="space-y-4 text-sm">
                                            <div>
                                                <h4 class="font-semibold">{detail.name.clone()}</h4>
                                                <p class="text-base-content/70">
                                                    {format!("{} rows", format_count(detail.rows))}
                                                </p>
                                            </div>
                                            <div>
                                                <h5 class="font-medium mb-2">"Columns"</h5>
                                                <div class="flex flex-wrap gap-1">
                                                    {detail.columns.iter().map(|c| view! {
                                                        <span class="badge badge-ghost">{c.clone()}</span>
                                                    }).collect_view()}
                                                </div>
                                            </div>
                                            <Show when={
                                                let empty = summary.is_empty();
                                                move || !empty
                                            }>
                                                <div>
                                                    <h5 class="font-medium mb-2">"Summary"</h5>
                                                    <ul class="space-y-1">
                                                        {summary.iter().map(|(k, v)| view! {
                                                            <li class="flex justify-between gap-2">
                                                                <span class="text-base-content/70">{format!("{}:", k)}</span>
                                                                <span class="font-mono">{v.clone()}</span>
                                                            </li>
                                                        }).collect_view()}
                                                    </ul>
                                                </div>
                                            </Show>
                                        </div>
                                    }.into_any()
                                }
                            }
                        }}
                    </div>
                </div>
            </div>
        </div>
    }
}
