use crate::error::{ReportError, Result};
use crate::models::columns;
use crate::models::{Cell, FilteredTable, RawTable, Record};
use bigdecimal::{BigDecimal, RoundingMode, Zero};
use std::str::FromStr;

/// 金额保留两位小数, 四舍五入
pub fn round_amount(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}

/// 数值强制转换, 无法识别的值视为缺失
pub fn coerce_decimal(cell: &Cell) -> Option<BigDecimal> {
    match cell {
        Cell::Empty => None,
        // f64 的 Display 是最短十进制表示, 避免 10.005 变成 10.00499...
        Cell::Number(v) if v.is_finite() => BigDecimal::from_str(&v.to_string()).ok(),
        Cell::Number(_) => None,
        Cell::Text(s) => BigDecimal::from_str(s.trim()).ok(),
    }
}

/// 单行人次上限, 超出或为负视为无效
const MAX_VISITS: f64 = u32::MAX as f64;

fn coerce_visits(cell: Option<&Cell>) -> i64 {
    let value = match cell {
        Some(Cell::Number(v)) => *v,
        Some(Cell::Text(s)) => match s.trim().parse::<f64>() {
            Ok(v) => v,
            Err(_) => return 1,
        },
        _ => return 1,
    };
    let rounded = value.round();
    if rounded.is_finite() && (0.0..=MAX_VISITS).contains(&rounded) {
        rounded as i64
    } else {
        tracing::warn!("人次 {} 超出范围, 按 1 计", value);
        1
    }
}

fn require(table: &RawTable, name: &str) -> Result<usize> {
    table
        .column_index(name)
        .ok_or_else(|| ReportError::MissingColumn(name.to_string()))
}

/// 过滤扣款金额为 0 或缺失的行
///
/// 必需列: 医疗机构编码、医疗机构名称、扣款金额; 险种类型与人次可缺省。
pub fn filter_rows(table: &RawTable) -> Result<FilteredTable> {
    let deduction_idx = require(table, columns::DEDUCTION)?;
    let code_idx = require(table, columns::INSTITUTION_CODE)?;
    let name_idx = require(table, columns::INSTITUTION_NAME)?;
    let insurance_idx = table.column_index(columns::INSURANCE_TYPE);
    let visits_idx = table.column_index(columns::VISITS);

    let mut records = Vec::with_capacity(table.rows.len());
    let mut dropped = 0usize;

    for row in &table.rows {
        let deduction = match row.get(deduction_idx).and_then(coerce_decimal) {
            Some(v) => round_amount(&v),
            None => {
                dropped += 1;
                continue;
            }
        };
        if deduction.is_zero() {
            dropped += 1;
            continue;
        }

        let text_at = |idx: usize| row.get(idx).map(Cell::as_text).unwrap_or_default();

        records.push(Record {
            institution_code: text_at(code_idx),
            institution_name: text_at(name_idx),
            insurance_type: insurance_idx.map(text_at),
            deduction,
            visits: coerce_visits(visits_idx.and_then(|idx| row.get(idx))),
            cells: row.clone(),
        });
    }

    tracing::info!("过滤扣款金额: 保留 {} 行, 剔除 {} 行", records.len(), dropped);

    Ok(FilteredTable {
        headers: table.headers.clone(),
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: Vec<Vec<Cell>>) -> RawTable {
        let mut t = RawTable::new(vec![
            columns::INSTITUTION_CODE.to_string(),
            columns::INSTITUTION_NAME.to_string(),
            columns::DEDUCTION.to_string(),
        ]);
        for r in rows {
            t.push_row(r);
        }
        t
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn zero_and_non_numeric_rows_are_dropped() {
        let t = table(vec![
            vec![text("H001"), text("A Hospital"), Cell::Number(0.0)],
            vec![text("H002"), text("B Hospital"), text("n/a")],
            vec![text("H003"), text("C Hospital"), Cell::Empty],
            vec![text("H004"), text("D Hospital"), Cell::Number(12.345)],
            vec![text("H005"), text("E Hospital"), text(" 3.1 ")],
        ]);

        let filtered = filter_rows(&t).unwrap();
        let codes: Vec<_> = filtered.records.iter().map(|r| r.institution_code.as_str()).collect();
        assert_eq!(codes, vec!["H004", "H005"]);
        assert_eq!(filtered.records[0].deduction, BigDecimal::from_str("12.35").unwrap());
        assert_eq!(filtered.records[1].deduction, BigDecimal::from_str("3.10").unwrap());
        assert_eq!(filtered.records[0].visits, 1);
        assert_eq!(filtered.records[0].insurance_type, None);
    }

    #[test]
    fn amounts_that_round_to_zero_are_dropped() {
        let t = table(vec![vec![text("H001"), text("A"), Cell::Number(0.004)]]);
        assert!(filter_rows(&t).unwrap().is_empty());
    }

    #[test]
    fn half_up_rounding_uses_decimal_text() {
        let v = coerce_decimal(&Cell::Number(10.005)).unwrap();
        assert_eq!(round_amount(&v), BigDecimal::from_str("10.01").unwrap());
        let v = coerce_decimal(&Cell::Number(-2.675)).unwrap();
        assert_eq!(round_amount(&v), BigDecimal::from_str("-2.68").unwrap());
    }

    #[test]
    fn missing_deduction_column_is_reported() {
        let t = RawTable::new(vec![
            columns::INSTITUTION_CODE.to_string(),
            columns::INSTITUTION_NAME.to_string(),
        ]);
        match filter_rows(&t) {
            Err(ReportError::MissingColumn(name)) => assert_eq!(name, columns::DEDUCTION),
            other => panic!("unexpected: {:?}", other.map(|f| f.records.len())),
        }
    }

    #[test]
    fn visits_default_to_one() {
        assert_eq!(coerce_visits(None), 1);
        assert_eq!(coerce_visits(Some(&Cell::Empty)), 1);
        assert_eq!(coerce_visits(Some(&text("x"))), 1);
        assert_eq!(coerce_visits(Some(&Cell::Number(3.0))), 3);
        assert_eq!(coerce_visits(Some(&text("2"))), 2);
    }

    #[test]
    fn out_of_range_visits_count_as_one() {
        assert_eq!(coerce_visits(Some(&Cell::Number(-3.0))), 1);
        assert_eq!(coerce_visits(Some(&Cell::Number(9e18))), 1);
        assert_eq!(coerce_visits(Some(&Cell::Number(f64::INFINITY))), 1);
        assert_eq!(coerce_visits(Some(&text("1e30"))), 1);
        assert_eq!(coerce_visits(Some(&Cell::Number(0.0))), 0);
    }
}
