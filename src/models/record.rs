use super::table::Cell;
use bigdecimal::BigDecimal;

/// 过滤后的一行审核数据
#[derive(Debug, Clone)]
pub struct Record {
    pub institution_code: String,
    pub institution_name: String,
    pub insurance_type: Option<String>,
    pub deduction: BigDecimal, // 扣款金额, 两位小数
    pub visits: i64,           // 人次, 缺省为 1
    pub cells: Vec<Cell>,      // 原始行, 供列投影使用
}

/// 过滤后的表
#[derive(Debug, Clone, Default)]
pub struct FilteredTable {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl FilteredTable {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
