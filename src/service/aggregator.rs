use super::filter::round_amount;
use super::grouper::group_by_institution;
use crate::config::{NameAlias, NamePolicy};
use crate::error::{ReportError, Result};
use crate::models::{Record, SummaryRow};
use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexSet;

/// 按规则从组内名称中选出一个机构名称
pub fn pick_name<'a, I>(names: I, policy: NamePolicy) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let distinct: IndexSet<&str> = names.into_iter().filter(|n| !n.is_empty()).collect();

    match policy {
        NamePolicy::SecondDistinct => distinct
            .get_index(1)
            .or_else(|| distinct.first())
            .map(|n| n.to_string())
            .unwrap_or_default(),
        NamePolicy::Longest => {
            let mut best: Option<&str> = None;
            for name in distinct {
                // 等长保留先出现的
                if best.map_or(true, |b| name.chars().count() > b.chars().count()) {
                    best = Some(name);
                }
            }
            best.unwrap_or_default().to_string()
        }
    }
}

/// 组内扣款金额合计 (两位小数)
pub fn deduction_total(records: &[Record]) -> BigDecimal {
    let sum = records
        .iter()
        .fold(BigDecimal::zero(), |acc, r| acc + &r.deduction);
    round_amount(&sum)
}

/// 应用机构名称替换
pub fn apply_aliases(name: &str, aliases: &[NameAlias]) -> String {
    aliases
        .iter()
        .find(|a| a.from == name)
        .map(|a| a.to.clone())
        .unwrap_or_else(|| name.to_string())
}

/// 汇总结果: 已排序的行及合计
#[derive(Debug, Clone)]
pub struct RollUp {
    pub rows: Vec<SummaryRow>,
    pub total_visits: i64,
    pub total_deduction: BigDecimal,
}

/// 人次求和, 溢出时返回错误
fn sum_visits<I>(visits: I, code: &str) -> Result<i64>
where
    I: IntoIterator<Item = i64>,
{
    visits.into_iter().try_fold(0i64, |acc, v| {
        acc.checked_add(v)
            .ok_or_else(|| ReportError::VisitsOverflow(code.to_string()))
    })
}

/// 将同一险种的记录按医疗机构编码汇总为一行
///
/// 排序: 优先列表中的编码按列表顺序在前, 其余按编码升序。
pub fn roll_up(records: &[Record], priority: &[String], aliases: &[NameAlias]) -> Result<RollUp> {
    let groups = group_by_institution(records);

    let mut prioritized: Vec<(usize, SummaryRow)> = Vec::new();
    let mut remaining: Vec<SummaryRow> = Vec::new();

    for (code, group) in groups {
        let names: Vec<String> = group
            .iter()
            .map(|r| apply_aliases(&r.institution_name, aliases))
            .collect();
        let row = SummaryRow {
            seq: 0,
            institution_name: pick_name(names.iter().map(String::as_str), NamePolicy::Longest),
            visits: sum_visits(group.iter().map(|r| r.visits), &code)?,
            deduction: deduction_total(&group),
            institution_code: code,
        };

        match priority.iter().position(|p| *p == row.institution_code) {
            Some(rank) => prioritized.push((rank, row)),
            None => remaining.push(row),
        }
    }

    prioritized.sort_by_key(|(rank, _)| *rank);
    remaining.sort_by(|a, b| a.institution_code.cmp(&b.institution_code));

    let mut rows: Vec<SummaryRow> = prioritized
        .into_iter()
        .map(|(_, row)| row)
        .chain(remaining)
        .collect();
    for (idx, row) in rows.iter_mut().enumerate() {
        row.seq = idx + 1;
    }

    let total_visits = sum_visits(rows.iter().map(|r| r.visits), "合计")?;
    let total_deduction = round_amount(
        &rows
            .iter()
            .fold(BigDecimal::zero(), |acc, r| acc + &r.deduction),
    );

    Ok(RollUp {
        rows,
        total_visits,
        total_deduction,
    })
}
