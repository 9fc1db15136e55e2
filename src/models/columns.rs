//! 省平台审核总表及输出报表使用的列名

pub const INSTITUTION_CODE: &str = "医疗机构编码";
pub const INSTITUTION_NAME: &str = "医疗机构名称";
pub const INSURANCE_TYPE: &str = "险种类型";
pub const DEDUCTION: &str = "扣款金额";
pub const VISITS: &str = "人次";

/// 明细表中重命名后的扣款金额列
pub const DEDUCTION_YUAN: &str = "扣款金额（元）";
pub const FEEDBACK: &str = "二次反馈";
pub const REMARK: &str = "备注";

/// 汇总表序号列
pub const SEQ: &str = "序号";
