use crate::models::ReportPeriod;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// 文件名中的 4 位年份 + 2 位月份, 例如 "智能审核202409"
static PERIOD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})(\d{2})").unwrap());

/// 汇总表年月紧跟在该标记之后
const PERIOD_MARKER: &str = "智能审核";

/// 从文件名解析年月 (第一处 6 位数字)
pub fn parse_period(file_name: &str) -> Option<ReportPeriod> {
    let caps = PERIOD_PATTERN.captures(file_name)?;
    Some(ReportPeriod {
        year: caps[1].to_string(),
        month: caps[2].to_string(),
    })
}

/// 汇总表年月: 优先取 "智能审核" 之后紧邻的 6 位数字, 否则退回 [`parse_period`]
pub fn parse_summary_period(file_name: &str) -> Option<ReportPeriod> {
    file_name
        .split_once(PERIOD_MARKER)
        .and_then(|(_, rest)| {
            let digits: String = rest.chars().take(6).collect();
            if digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_digit()) {
                parse_period(&digits)
            } else {
                None
            }
        })
        .or_else(|| parse_period(file_name))
}

/// 取路径中的文件名部分
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// 明细表标题, 月份去掉前导零
pub fn detail_title(region: &str, period: Option<&ReportPeriod>) -> String {
    match period {
        Some(p) => format!(
            "{}智能审核{}年{}月扣款明细统计表",
            region,
            p.year,
            p.month.trim_start_matches('0')
        ),
        None => format!("{}智能审核扣款明细统计表", region),
    }
}

fn summary_stem(region: &str, period: Option<&ReportPeriod>) -> String {
    match period {
        Some(p) => format!("{}智能审核{}年{}月扣款统计表", region, p.year, p.month),
        None => format!("{}智能审核扣款统计表", region),
    }
}

/// 汇总表标题
pub fn summary_title(region: &str, period: Option<&ReportPeriod>, insurance_type: &str) -> String {
    format!("{}（{}）", summary_stem(region, period), insurance_type)
}

/// 汇总表文件名
pub fn summary_file_name(
    region: &str,
    period: Option<&ReportPeriod>,
    insurance_type: &str,
) -> String {
    sanitize_file_name(&format!("{}{}.xlsx", summary_stem(region, period), insurance_type))
}

/// 明细表文件名
pub fn detail_file_name(institution_name: &str, institution_code: &str) -> String {
    let stem = if institution_name.is_empty() {
        institution_code
    } else {
        institution_name
    };
    sanitize_file_name(&format!("{}.xlsx", stem))
}

/// 替换文件名中的非法字符
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGION: &str = "淮安经济技术开发区";

    #[test]
    fn period_parsed_from_file_name() {
        let p = parse_period("淮安经济技术开发区智能审核202409省平台总表.xlsx").unwrap();
        assert_eq!(p.year, "2024");
        assert_eq!(p.month, "09");
        assert!(parse_period("总表.xlsx").is_none());
    }

    #[test]
    fn summary_period_follows_marker() {
        let name = "20241209淮安经济技术开发区智能审核202411省平台总表.xlsx";
        let p = parse_summary_period(name).unwrap();
        assert_eq!((p.year.as_str(), p.month.as_str()), ("2024", "11"));
        // 明细表仍取第一处
        assert_eq!(parse_period(name).unwrap().month, "12");

        let p = parse_summary_period("省平台总表202410.xlsx").unwrap();
        assert_eq!(p.month, "10");
        assert!(parse_summary_period("智能审核总表.xlsx").is_none());
    }

    #[test]
    fn titles_with_and_without_period() {
        let p = parse_period("202409").unwrap();
        assert_eq!(
            detail_title(REGION, Some(&p)),
            "淮安经济技术开发区智能审核2024年9月扣款明细统计表"
        );
        assert_eq!(detail_title(REGION, None), "淮安经济技术开发区智能审核扣款明细统计表");
        assert_eq!(
            summary_title(REGION, Some(&p), "职工基本医疗保险"),
            "淮安经济技术开发区智能审核2024年09月扣款统计表（职工基本医疗保险）"
        );
        assert_eq!(
            summary_file_name(REGION, Some(&p), "居民"),
            "淮安经济技术开发区智能审核2024年09月扣款统计表居民.xlsx"
        );
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(detail_file_name("A/B医院", "H1"), "A_B医院.xlsx");
        assert_eq!(detail_file_name("", "H1"), "H1.xlsx");
    }
}
