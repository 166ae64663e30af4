use super::failure_toast;
use crate::api::ApiClient;
use crate::error::DashResult;
use crate::format::{format_count, format_currency, format_percent};
use crate::lifetime::Ticket;
use crate::notify::Toast;
use crate::request::HttpClient;
use crate::storage::TokenStorage;
use bidash_shared::{Dataset, SalesSummary, TopProduct};

pub const DATASETS_CHANNEL: &str = "kpis.datasets";
pub const SNAPSHOT_CHANNEL: &str = "kpis.snapshot";

/// 转化率估算中订单对应的访问系数
const VISITS_PER_ORDER: f64 = 1.3;

/// 一次 KPI 查询的完整结果，两个请求要么都成功要么整体失败
#[derive(Debug, Clone, PartialEq)]
pub struct KpiSnapshot {
    pub summary: SalesSummary,
    pub products: Vec<TopProduct>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiCard {
    pub title: &'static str,
    pub value: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedProduct {
    pub rank: usize,
    pub name: String,
    pub sales: String,
    pub units: String,
    /// 相对最高销售额的比例，0..=100
    pub share: f64,
}

/// `orders / (orders * 1.3)`，没有订单时为 0
pub fn conversion_rate(total_orders: u64) -> f64 {
    if total_orders == 0 {
        return 0.0;
    }
    let orders = total_orders as f64;
    orders / (orders * VISITS_PER_ORDER) * 100.0
}

impl KpiSnapshot {
    pub fn cards(&self) -> Vec<KpiCard> {
        let s = &self.summary;
        vec![
            KpiCard {
                title: "Total Sales",
                value: format_currency(s.total_sales),
                caption: format!("Period: {}", s.period),
            },
            KpiCard {
                title: "Total Orders",
                value: format_count(s.total_orders),
                caption: "Orders placed".to_string(),
            },
            KpiCard {
                title: "Average Order Value",
                value: format_currency(s.average_order_value),
                caption: "Per order".to_string(),
            },
            KpiCard {
                title: "Conversion Rate",
                value: format_percent(conversion_rate(s.total_orders)),
                caption: "Estimated".to_string(),
            },
        ]
    }

    /// 保持后端给出的顺序
    pub fn ranked_products(&self) -> Vec<RankedProduct> {
        let max = self
            .products
            .iter()
            .map(|p| p.sales)
            .fold(0.0_f64, f64::max);

        self.products
            .iter()
            .enumerate()
            .map(|(i, p)| RankedProduct {
                rank: i + 1,
                name: p.product_name.clone(),
                sales: format_currency(p.sales),
                units: format!("{} units sold", format_count(p.units_sold)),
                share: if max > 0.0 { p.sales / max * 100.0 } else { 0.0 },
            })
            .collect()
    }
}

/// KPI 页面显示什么
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KpiDisplay {
    NoSelection,
    Loading,
    Empty,
    Ready,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpisState {
    datasets: Vec<Dataset>,
    selected: Option<String>,
    snapshot: Option<KpiSnapshot>,
    loading: bool,
}

impl KpisState {
    pub fn apply_datasets(&mut self, result: DashResult<Vec<Dataset>>) -> Option<Toast> {
        match result {
            Ok(datasets) => {
                self.datasets = datasets;
                None
            }
            Err(e) => failure_toast(&e, "Error", "Failed to load datasets"),
        }
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    /// 选中数据集；返回是否需要发起新查询
    pub fn select(&mut self, dataset_id: &str) -> bool {
        if dataset_id.is_empty() {
            return false;
        }
        self.selected = Some(dataset_id.to_string());
        self.loading = true;
        true
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// 失败时保留上一次的结果
    pub fn apply_snapshot(&mut self, result: DashResult<KpiSnapshot>) -> Option<Toast> {
        self.loading = false;
        match result {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                None
            }
            Err(e) => failure_toast(&e, "Error", "Failed to load KPIs data"),
        }
    }

    pub fn snapshot(&self) -> Option<&KpiSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn display(&self) -> KpiDisplay {
        if self.loading {
            return KpiDisplay::Loading;
        }
        // 成功的查询总会带回汇总，即使数值全为 0 也照常展示
        match (&self.selected, &self.snapshot) {
            (None, _) => KpiDisplay::NoSelection,
            (Some(_), Some(_)) => KpiDisplay::Ready,
            (Some(_), None) => KpiDisplay::Empty,
        }
    }
}

/// 并发请求销售汇总与热销商品
pub async fn load_snapshot<C: HttpClient, S: TokenStorage>(
    api: &ApiClient<C, S>,
    ticket: Ticket,
    dataset_id: &str,
) -> Option<DashResult<KpiSnapshot>> {
    let result = futures::try_join!(api.sales_summary(dataset_id), api.top_products(dataset_id))
        .map(|(summary, products)| KpiSnapshot { summary, products });
    ticket.accept(result)
}

pub async fn load_datasets<C: HttpClient, S: TokenStorage>(
    api: &ApiClient<C, S>,
    ticket: Ticket,
) -> Option<DashResult<Vec<Dataset>>> {
    let result = api.list_datasets().await;
    ticket.accept(result)
}
