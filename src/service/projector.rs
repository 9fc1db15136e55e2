use crate::error::{ReportError, Result};
use crate::models::columns;
use crate::models::{Cell, ProjectedTable, Record, SummaryRow};
use bigdecimal::BigDecimal;

/// 输出列的取值来源
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSource {
    /// 按列名取原始行
    Source(&'static str),
    /// 过滤后的扣款金额
    Deduction,
    /// 固定文本
    Literal(String),
    /// 空白
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedColumn {
    pub name: &'static str,
    pub source: ColumnSource,
}

/// 明细表原样保留的列
const DETAIL_SOURCE_COLUMNS: [&str; 15] = [
    columns::INSTITUTION_CODE,
    columns::INSTITUTION_NAME,
    "患者姓名",
    "患者性别",
    columns::INSURANCE_TYPE,
    "结算日期",
    "医保目录名称",
    "规则名称",
    "疑似违规内容",
    "疑似违规金额",
    "初审意见",
    "申诉意见",
    "复审意见",
    "终审结论",
    "终审意见",
];

/// 明细表输出列及顺序
pub fn detail_plan(feedback_default: &str) -> Vec<ProjectedColumn> {
    let mut plan: Vec<ProjectedColumn> = DETAIL_SOURCE_COLUMNS
        .iter()
        .map(|&name| ProjectedColumn {
            name,
            source: ColumnSource::Source(name),
        })
        .collect();

    plan.push(ProjectedColumn {
        name: columns::DEDUCTION_YUAN,
        source: ColumnSource::Deduction,
    });
    plan.push(ProjectedColumn {
        name: "终审时间",
        source: ColumnSource::Source("终审时间"),
    });
    plan.push(ProjectedColumn {
        name: columns::FEEDBACK,
        source: ColumnSource::Literal(feedback_default.to_string()),
    });
    plan.push(ProjectedColumn {
        name: columns::REMARK,
        source: ColumnSource::Blank,
    });
    plan
}

/// 汇总表输出列
pub const SUMMARY_COLUMNS: [&str; 5] = [
    columns::SEQ,
    columns::INSTITUTION_CODE,
    columns::INSTITUTION_NAME,
    columns::VISITS,
    columns::DEDUCTION,
];

/// 金额写入单元格; 经十进制文本转换, 保证 15.01 得到最接近的 f64
pub fn amount_cell(value: &BigDecimal) -> Cell {
    value
        .to_string()
        .parse::<f64>()
        .map(Cell::Number)
        .unwrap_or(Cell::Empty)
}

/// 按输出列投影一组记录
///
/// 源列缺失时返回 `MissingField`, 调用方跳过该文件。
pub fn project_detail(
    headers: &[String],
    records: &[Record],
    plan: &[ProjectedColumn],
) -> Result<ProjectedTable> {
    let mut indices: Vec<Option<usize>> = Vec::with_capacity(plan.len());
    for column in plan {
        let idx = match column.source {
            ColumnSource::Source(name) => Some(
                headers
                    .iter()
                    .position(|h| h == name)
                    .ok_or_else(|| ReportError::MissingField(name.to_string()))?,
            ),
            _ => None,
        };
        indices.push(idx);
    }

    let rows = records
        .iter()
        .map(|record| {
            plan.iter()
                .zip(&indices)
                .map(|(column, idx)| match (&column.source, idx) {
                    (ColumnSource::Source(_), Some(i)) => {
                        record.cells.get(*i).cloned().unwrap_or(Cell::Empty)
                    }
                    (ColumnSource::Deduction, _) => amount_cell(&record.deduction),
                    (ColumnSource::Literal(text), _) => Cell::Text(text.clone()),
                    _ => Cell::Text(String::new()),
                })
                .collect()
        })
        .collect();

    Ok(ProjectedTable {
        columns: plan.iter().map(|c| c.name.to_string()).collect(),
        rows,
    })
}

/// 汇总行投影
pub fn project_summary(rows: &[SummaryRow]) -> ProjectedTable {
    ProjectedTable {
        columns: SUMMARY_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows: rows
            .iter()
            .map(|r| {
                vec![
                    Cell::Number(r.seq as f64),
                    Cell::Text(r.institution_code.clone()),
                    Cell::Text(r.institution_name.clone()),
                    Cell::Number(r.visits as f64),
                    amount_cell(&r.deduction),
                ]
            })
            .collect(),
    }
}
