use super::layout::{apply_positional_widths, SUMMARY_COLUMN_WIDTHS, SUMMARY_HEADER_ROW, TITLE_ROW_HEIGHT};
use super::{
    apply_print_setup, bordered, cast_col_num, cast_row_num, centered, merge_row, title_format,
    write_cell, AMOUNT_NUM_FORMAT, BODY_FONT, HEADING_FONT, NUMBER_FONT,
};
use crate::error::Result;
use crate::models::columns;
use crate::models::{Cell, SummaryReport};
use crate::service::projector::{amount_cell, project_summary};
use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use std::path::Path;

pub const UNIT_LABEL: &str = "单位：人次/元";
pub const TOTAL_LABEL: &str = "合计";
/// 合计行下方的审批栏 (列号, 文本)
pub const APPROVAL_LABELS: [(usize, &str); 3] = [(1, "审批人："), (2, "复核："), (3, "初审：")];

/// 写出单个险种的汇总表
///
/// 行布局: 0 标题, 1 单位, 2 表头, 3.. 数据, 合计行, 审批栏。
pub fn render_summary(report: &SummaryReport, path: &Path) -> Result<()> {
    let table = project_summary(&report.rows);
    let n_cols = table.columns.len();
    let code_col = table.column_index(columns::INSTITUTION_CODE);
    let amount_col = table.column_index(columns::DEDUCTION);

    let fmt_title = title_format(22.0, false);
    let fmt_unit = Format::new()
        .set_font_name(BODY_FONT)
        .set_align(FormatAlign::Right)
        .set_align(FormatAlign::VerticalCenter);
    let fmt_header = bordered(centered(Format::new().set_font_name(HEADING_FONT).set_bold()));
    let fmt_text = bordered(centered(Format::new().set_font_name(BODY_FONT)));
    let fmt_number = bordered(centered(Format::new().set_font_name(NUMBER_FONT)));
    let fmt_amount = bordered(centered(
        Format::new()
            .set_font_name(NUMBER_FONT)
            .set_num_format(AMOUNT_NUM_FORMAT),
    ));
    let fmt_approval = Format::new()
        .set_font_name(BODY_FONT)
        .set_align(FormatAlign::VerticalCenter);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let last_col = n_cols.saturating_sub(1);

    merge_row(sheet, 0, 0, last_col, &report.title, &fmt_title)?;
    sheet.set_row_height(0, TITLE_ROW_HEIGHT)?;
    merge_row(sheet, 1, 0, last_col, UNIT_LABEL, &fmt_unit)?;

    for (col, name) in table.columns.iter().enumerate() {
        write_cell(sheet, SUMMARY_HEADER_ROW, col, &Cell::Text(name.clone()), &fmt_header)?;
    }

    let first_data_row = SUMMARY_HEADER_ROW + 1;
    for (i, row) in table.rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            let format = match cell {
                Cell::Number(_) if Some(col) == amount_col => &fmt_amount,
                Cell::Number(_) => &fmt_number,
                _ if Some(col) == code_col => &fmt_number,
                _ => &fmt_text,
            };
            write_cell(sheet, first_data_row + i, col, cell, format)?;
        }
    }

    // 合计行: 前三列合并
    let total_row = first_data_row + table.rows.len();
    merge_row(sheet, total_row, 0, 2, TOTAL_LABEL, &fmt_text)?;
    write_cell(
        sheet,
        total_row,
        3,
        &Cell::Number(report.total_visits as f64),
        &fmt_number,
    )?;
    write_cell(sheet, total_row, 4, &amount_cell(&report.total_deduction), &fmt_amount)?;

    let approval_row = cast_row_num(total_row + 1)?;
    for (col, label) in APPROVAL_LABELS {
        sheet.write_string_with_format(approval_row, cast_col_num(col)?, label, &fmt_approval)?;
    }

    apply_positional_widths(sheet, SUMMARY_COLUMN_WIDTHS)?;
    apply_print_setup(sheet);

    workbook.save(path)?;
    tracing::info!(
        "汇总表已保存: {} ({} 家机构, 人次 {}, 合计 {})",
        path.display(),
        report.rows.len(),
        report.total_visits,
        report.total_deduction
    );
    Ok(())
}
