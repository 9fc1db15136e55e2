use super::cast_col_num;
use crate::error::Result;
use rust_xlsxwriter::Worksheet;

/// 明细表列宽 (按列名)
pub static DETAIL_COLUMN_WIDTHS: &[(&str, f64)] = &[
    ("医疗机构编码", 6.25),
    ("医疗机构名称", 10.0),
    ("患者姓名", 4.0),
    ("患者性别", 5.8),
    ("险种类型", 8.0),
    ("结算日期", 6.6),
    ("医保目录名称", 4.0),
    ("规则名称", 9.0),
    ("疑似违规内容", 13.25),
    ("疑似违规金额", 6.0),
    ("初审意见", 15.0),
    ("复审意见", 15.0),
    ("终审意见", 15.0),
    ("申诉意见", 6.8),
    ("终审结论", 3.4),
    ("扣款金额（元）", 5.7),
    ("终审时间", 10.0),
    ("二次反馈", 4.0),
    ("备注", 6.0),
];

/// 汇总表列宽 (A-F)
pub static SUMMARY_COLUMN_WIDTHS: &[f64] = &[8.4, 20.0, 56.0, 12.0, 12.0, 12.0];

/// 表头行偏移: 明细表 标题 + 表头
pub const DETAIL_HEADER_ROW: usize = 1;
/// 表头行偏移: 汇总表 标题 + 单位 + 表头
pub const SUMMARY_HEADER_ROW: usize = 2;

/// 标题行高
pub const TITLE_ROW_HEIGHT: f64 = 65.0;

/// 写入时追加的边距 (5 像素, 按 7 像素/字符计)
const COLUMN_PADDING: f64 = 5.0 / 7.0;

/// 上表为文件中直接存储的宽度值; rust_xlsxwriter 会再加上边距, 故先扣除
fn stored_width(width: f64) -> f64 {
    (width - COLUMN_PADDING).max(1.0)
}

/// 按列名设置列宽; 表中有而数据中没有的列跳过
pub fn apply_named_widths(
    sheet: &mut Worksheet,
    columns: &[String],
    widths: &[(&str, f64)],
) -> Result<usize> {
    let mut applied = 0;
    for (name, width) in widths {
        match columns.iter().position(|c| c == name) {
            Some(idx) => {
                sheet.set_column_width(cast_col_num(idx)?, stored_width(*width))?;
                applied += 1;
            }
            None => tracing::debug!("列名 '{}' 在数据中未找到，跳过该列", name),
        }
    }
    Ok(applied)
}

/// 按位置设置列宽
pub fn apply_positional_widths(sheet: &mut Worksheet, widths: &[f64]) -> Result<()> {
    for (idx, width) in widths.iter().enumerate() {
        sheet.set_column_width(cast_col_num(idx)?, stored_width(*width))?;
    }
    Ok(())
}
