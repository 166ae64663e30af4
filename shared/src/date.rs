//! 时间处理模块
//!
//! 后端返回的 `upload_date` 格式不统一（RFC 3339、无时区的 ISO 时间、纯日期），
//! 这里统一解析为 `NaiveDate` 并格式化为 `M/D/YYYY` 用于展示。

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// 解析上传时间，无法识别时返回 `None`
pub fn parse_upload_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// 格式化为 `M/D/YYYY`；无法解析时原样返回
pub fn format_upload_date(raw: &str) -> String {
    match parse_upload_date(raw) {
        Some(date) => format!("{}/{}/{}", date.month(), date.day(), date.year()),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_variants() {
        assert_eq!(format_upload_date("2024-03-05T10:20:30Z"), "3/5/2024");
        assert_eq!(format_upload_date("2024-03-05T10:20:30.123456"), "3/5/2024");
        assert_eq!(format_upload_date("2024-12-31 23:59:59"), "12/31/2024");
        assert_eq!(format_upload_date("2024-01-09"), "1/9/2024");
    }

    #[test]
    fn test_unparseable_is_verbatim() {
        assert_eq!(format_upload_date("yesterday"), "yesterday");
        assert!(parse_upload_date("").is_none());
    }
}
