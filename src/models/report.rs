use super::table::ProjectedTable;
use bigdecimal::BigDecimal;
use std::path::PathBuf;
use std::str::FromStr;

/// 报表类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// 按医疗机构拆分明细表
    Detail,
    /// 按险种汇总统计表
    Summary,
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "detail" => Ok(ReportKind::Detail),
            "summary" => Ok(ReportKind::Summary),
            other => Err(format!("未知报表类型: {}", other)),
        }
    }
}

/// 文件名中解析出的年月
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPeriod {
    pub year: String,
    pub month: String, // 原样两位, 如 "09"
}

/// 单家机构明细表
#[derive(Debug, Clone)]
pub struct DetailReport {
    pub title: String,
    pub institution_code: String,
    pub institution_name: String,
    pub table: ProjectedTable,
    pub total: BigDecimal,
}

/// 汇总表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub seq: usize,
    pub institution_code: String,
    pub institution_name: String,
    pub visits: i64,
    pub deduction: BigDecimal,
}

/// 单个险种的汇总表
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub title: String,
    pub insurance_type: String,
    pub rows: Vec<SummaryRow>,
    pub total_visits: i64,
    pub total_deduction: BigDecimal,
}

/// 单个输入文件的处理结果
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub outputs: Vec<PathBuf>,
    pub error: Option<String>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// 批量处理结果
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub files: Vec<FileOutcome>,
}

impl BatchOutcome {
    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|f| !f.is_ok()).count()
    }

    pub fn output_count(&self) -> usize {
        self.files.iter().map(|f| f.outputs.len()).sum()
    }
}
