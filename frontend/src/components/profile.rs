use crate::auth::use_auth;
use crate::components::icons::UserIcon;
use bidash::views::profile::profile_fields;
use leptos::prelude::*;

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let fields = move || auth.user.with(|u| profile_fields(u.as_ref()));

    view! {
        <div class="space-y-6">
            <div>
                <h2 class="text-3xl font-bold">"Profile"</h2>
                <p class="text-base-content/70">"Your account information"</p>
            </div>

            <div class="card bg-base-100 shadow-xl max-w-2xl">
                <div class="card-body">
                    <div class="flex items-center gap-3 mb-4">
                        <div class="p-3 bg-primary/10 rounded-full text-primary">
                            <UserIcon attr:class="h-6 w-6" />
                        </div>
                        <h3 class="card-title">"Account Details"</h3>
                    </div>
                    <dl class="divide-y divide-base-200">
                        {move || fields().into_iter().map(|f| view! {
                            <div class="flex justify-between py-3">
                                <dt class="text-base-content/70">{f.label}</dt>
                                <dd class="font-medium">{f.value}</dd>
                            </div>
                        }).collect_view()}
                    </dl>
                </div>
            </div>
        </div>
    }
}
