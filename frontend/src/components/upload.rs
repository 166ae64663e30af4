use crate::auth::use_auth;
use crate::components::icons::{CheckCircle, FileIcon, UploadIcon};
use crate::notify::use_notify;
use crate::web::file;
use bidash::ViewLifetime;
use bidash::views::upload::{UPLOAD_CHANNEL, UploadState, submit_upload};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn UploadPage() -> impl IntoView {
    let auth = use_auth();
    let notify = use_notify();
    let state = RwSignal::new(UploadState::default());
    let lifetime = StoredValue::new_local(ViewLifetime::new());
    // 浏览器 File 句柄，与状态中的 SelectedFile 同步
    let picked = StoredValue::new_local(None::<web_sys::File>);
    let input_ref = NodeRef::<leptos::html::Input>::new();

    on_cleanup(move || {
        lifetime.try_with_value(|l| l.end());
    });

    let on_change = move |ev: leptos::ev::Event| {
        let Some(f) = file::first_file(&ev) else {
            return;
        };
        let rejected = state.try_update(|s| s.select(file::describe(&f))).flatten();
        match rejected {
            Some(toast) => {
                file::reset_input(&ev);
                notify.push(toast);
            }
            None => picked.set_value(Some(f)),
        }
    };

    let on_submit = move |_: leptos::ev::MouseEvent| {
        let Some(f) = picked.get_value() else {
            return;
        };
        let Some(selected) = state.with_untracked(|s| s.selected().cloned()) else {
            return;
        };
        if !state.try_update(|s| s.begin_upload()).unwrap_or(false) {
            return;
        }

        let api = auth.api();
        let ticket = lifetime.with_value(|l| l.ticket(UPLOAD_CHANNEL));
        spawn_local(async move {
            let result = match file::read_bytes(&f).await {
                Ok(bytes) => submit_upload(&api, ticket, &selected, bytes).await,
                Err(e) => ticket.accept(Err(e)),
            };
            if let Some(result) = result {
                let succeeded = result.is_ok();
                notify.push_opt(state.try_update(|s| s.apply_result(result)).flatten());
                if succeeded {
                    picked.try_update_value(|p| *p = None);
                    if let Some(input) = input_ref.try_get_untracked().flatten() {
                        file::clear_input(&input);
                    }
                }
            }
        });
    };

    view! {
        <div class="space-y-6">
            <div>
                <h2 class="text-3xl font-bold">"Upload Data"</h2>
                <p class="text-base-content/70">"Upload CSV or Excel files to analyze your business data"</p>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body space-y-4">
                    <h3 class="card-title">"File Upload"</h3>
                    <p class="text-sm text-base-content/70">
                        "Supported formats: CSV, Excel (.xlsx, .xls)"
                    </p>

                    <label class="flex flex-col items-center justify-center border-2 border-dashed border-base-300 rounded-lg p-8 cursor-pointer hover:bg-base-200">
                        <UploadIcon attr:class="h-10 w-10 mb-3 opacity-60" />
                        <span class="font-medium">"Click to select a file"</span>
                        <input
                            node_ref=input_ref
                            type="file"
                            class="hidden"
                            accept=".csv,.xlsx,.xls"
                            on:change=on_change
                        />
                    </label>

                    {move || state.with(|s| s.selected().cloned()).map(|f| view! {
                        <div class="flex items-center gap-3 p-3 bg-base-200 rounded-lg">
                            <FileIcon attr:class="h-5 w-5 opacity-60" />
                            <span class="font-medium">{f.name.clone()}</span>
                            <span class="text-sm text-base-content/60">{f.size_label()}</span>
                        </div>
                    })}

                    <button
                        class="btn btn-primary w-full"
                        disabled=move || !state.with(|s| s.can_submit())
                        on:click=on_submit
                    >
                        {move || if state.with(|s| s.is_uploading()) {
                            view! { <span class="loading loading-spinner"></span> "Uploading..." }.into_any()
                        } else {
                            "Upload File".into_any()
                        }}
                    </button>
                </div>
            </div>

            {move || state.with(|s| s.uploaded()).map(|summary| view! {
                <div class="card bg-base-100 shadow-xl border border-success/30">
                    <div class="card-body">
                        <div class="flex items-center gap-2 text-success">
                            <CheckCircle attr:class="h-5 w-5" />
                            <h3 class="card-title">"Upload Complete"</h3>
                        </div>
                        <div class="grid grid-cols-3 gap-4 text-sm mt-2">
                            <div>
                                <p class="text-base-content/60">"File Name"</p>
                                <p class="font-medium">{summary.name}</p>
                            </div>
                            <div>
                                <p class="text-base-content/60">"Rows"</p>
                                <p class="font-medium">{summary.rows}</p>
                            </div>
                            <div>
                                <p class="text-base-content/60">"Columns"</p>
                                <p class="font-medium">{summary.columns}</p>
                            </div>
                        </div>
                    </div>
                </div>
            })}
        </div>
    }
}
