use super::layout::{apply_named_widths, DETAIL_COLUMN_WIDTHS, DETAIL_HEADER_ROW, TITLE_ROW_HEIGHT};
use super::{
    apply_print_setup, bordered, cast_col_num, cast_row_num, centered, merge_row, title_format,
    write_cell, AMOUNT_NUM_FORMAT, BODY_FONT, HEADING_FONT, NUMBER_FONT,
};
use crate::error::{ReportError, Result};
use crate::models::columns;
use crate::models::{Cell, DetailReport};
use crate::service::projector::amount_cell;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// 合计行标签
pub const TOTAL_LABEL: &str = "违规总金额：";
/// 签字栏
pub const SIGNATURE_LABEL: &str = "经办人签字：";
pub const STAMP_LABEL: &str = "盖章：";

/// 写出单家机构明细表
///
/// 行布局: 0 标题, 1 表头, 2.. 数据, 数据后一行为合计, 再隔一行为签字栏。
pub fn render_detail(report: &DetailReport, path: &Path) -> Result<()> {
    let table = &report.table;
    let n_cols = table.columns.len();
    let amount_col = table
        .column_index(columns::DEDUCTION_YUAN)
        .ok_or_else(|| ReportError::MissingField(columns::DEDUCTION_YUAN.to_string()))?;
    let code_col = table.column_index(columns::INSTITUTION_CODE);

    let fmt_title = title_format(24.0, true);
    let fmt_header = bordered(centered(
        Format::new().set_font_name(HEADING_FONT).set_font_size(12.0),
    ));
    let fmt_text = bordered(centered(Format::new().set_font_name(BODY_FONT).set_text_wrap()));
    let fmt_code = bordered(centered(Format::new().set_font_name(NUMBER_FONT).set_text_wrap()));
    let fmt_number = bordered(centered(
        Format::new()
            .set_font_name(NUMBER_FONT)
            .set_num_format(AMOUNT_NUM_FORMAT)
            .set_text_wrap(),
    ));
    let fmt_label = centered(Format::new().set_font_name(BODY_FONT));
    let fmt_total = centered(
        Format::new()
            .set_font_name(NUMBER_FONT)
            .set_num_format(AMOUNT_NUM_FORMAT),
    );

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    // 标题
    merge_row(sheet, 0, 0, n_cols.saturating_sub(1), &report.title, &fmt_title)?;
    sheet.set_row_height(0, TITLE_ROW_HEIGHT)?;

    // 表头
    for (col, name) in table.columns.iter().enumerate() {
        write_cell(sheet, DETAIL_HEADER_ROW, col, &Cell::Text(name.clone()), &fmt_header)?;
    }

    // 数据
    let first_data_row = DETAIL_HEADER_ROW + 1;
    for (i, row) in table.rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            let format = match cell {
                Cell::Number(_) => &fmt_number,
                _ if Some(col) == code_col => &fmt_code,
                _ => &fmt_text,
            };
            write_cell(sheet, first_data_row + i, col, cell, format)?;
        }
    }

    apply_named_widths(sheet, &table.columns, DETAIL_COLUMN_WIDTHS)?;

    // 合计行及签字栏不加边框
    let total_row = first_data_row + table.rows.len();
    if amount_col > 0 {
        write_cell(
            sheet,
            total_row,
            amount_col - 1,
            &Cell::Text(TOTAL_LABEL.to_string()),
            &fmt_label,
        )?;
    }
    write_cell(sheet, total_row, amount_col, &amount_cell(&report.total), &fmt_total)?;

    let signature_row = total_row + 2;
    sheet.write_string_with_format(
        cast_row_num(signature_row)?,
        cast_col_num(amount_col.saturating_sub(3))?,
        SIGNATURE_LABEL,
        &fmt_label,
    )?;
    sheet.write_string_with_format(
        cast_row_num(signature_row)?,
        cast_col_num(amount_col + 1)?,
        STAMP_LABEL,
        &fmt_label,
    )?;

    apply_print_setup(sheet);

    workbook.save(path)?;
    tracing::info!(
        "明细表已保存: {} ({} 行, 合计 {})",
        path.display(),
        table.rows.len(),
        report.total
    );
    Ok(())
}
