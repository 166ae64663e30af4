use crate::components::icons::*;
use crate::web::router::Link;
use bidash::AppRoute;
use leptos::prelude::*;

const FEATURES: [(&str, &str); 6] = [
    (
        "Automated Data Pipelines",
        "Upload CSV or Excel files and get clean, analysis-ready datasets in seconds",
    ),
    (
        "KPI Dashboards",
        "Track sales, orders and top products with real-time key performance indicators",
    ),
    (
        "Predictive Analytics",
        "Spot trends early with forecasts built on your historical data",
    ),
    (
        "Conversational AI",
        "Ask questions about your business in plain language",
    ),
    (
        "Cloud Deployment",
        "Access your dashboards from anywhere without managing infrastructure",
    ),
    (
        "Enterprise Security",
        "Token-based authentication keeps every dataset scoped to its owner",
    ),
];

#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200">
            <div class="navbar bg-base-100 border-b border-base-300 px-6">
                <div class="flex-1 gap-2">
                    <div class="p-2 bg-primary rounded-lg text-primary-content">
                        <BarChart3 attr:class="h-5 w-5" />
                    </div>
                    <span class="text-xl font-bold">"AI-BI"</span>
                </div>
                <div class="flex-none gap-2">
                    <Link to=AppRoute::Login class="btn btn-ghost btn-sm">"Sign in"</Link>
                    <Link to=AppRoute::Register class="btn btn-primary btn-sm">"Get started"</Link>
                </div>
            </div>

            <section class="hero py-20">
                <div class="hero-content text-center">
                    <div class="max-w-2xl">
                        <div class="badge badge-primary badge-outline gap-1 mb-4">
                            <Sparkles attr:class="h-3 w-3" /> "AI-powered business intelligence"
                        </div>
                        <h1 class="text-5xl font-bold">"Turn your data into decisions"</h1>
                        <p class="py-6 text-base-content/70">
                            "Upload your business data, explore datasets and monitor the KPIs that matter."
                        </p>
                        <Link to=AppRoute::Register class="btn btn-primary">"Get started"</Link>
                    </div>
                </div>
            </section>

            <section class="max-w-6xl mx-auto px-6 pb-20">
                <div class="grid gap-6 md:grid-cols-2 lg:grid-cols-3">
                    {FEATURES.iter().map(|(title, text)| view! {
                        <div class="card bg-base-100 shadow">
                            <div class="card-body">
                                <h3 class="card-title text-lg">{*title}</h3>
                                <p class="text-sm text-base-content/70">{*text}</p>
                            </div>
                        </div>
                    }).collect_view()}
                </div>
            </section>
        </div>
    }
}
