//! 展示用格式化：货币、计数、大小、百分比

use num_format::{Locale, ToFormattedString};

/// `$1,234.50`，负数为 `-$3.00`
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0.00".to_string();
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{}${}.{:02}",
        sign,
        (cents / 100).to_formatted_string(&Locale::en),
        cents % 100
    )
}

/// 千分位计数 `12,345`
pub fn format_count(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

/// 数据集大小，一位小数
pub fn format_size_mb(size_mb: f64) -> String {
    format!("{:.1} MB", size_mb)
}

/// 本地文件大小（字节），两位小数
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// 百分比，一位小数
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// 列表计数标签，"1 dataset" / "3 datasets"
pub fn pluralize(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", format_count(n as u64), plural)
    }
}
