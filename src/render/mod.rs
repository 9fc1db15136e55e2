//! 报表渲染: 标题、合并单元格、列宽、字体、边框、合计行、签字栏、打印设置。

pub mod detail;
pub mod layout;
pub mod summary;

pub use detail::render_detail;
pub use summary::render_summary;

use crate::error::{ReportError, Result};
use crate::models::Cell;
use rust_xlsxwriter::{ColNum, Format, FormatAlign, FormatBorder, RowNum, Worksheet, XlsxError};

/// 大标题字体
pub const TITLE_FONT: &str = "方正小标宋_GBK";
/// 表头字体
pub const HEADING_FONT: &str = "黑体";
/// 正文汉字字体
pub const BODY_FONT: &str = "方正仿宋_GBK";
/// 数字及编码字体
pub const NUMBER_FONT: &str = "Times New Roman";

/// 金额格式
pub const AMOUNT_NUM_FORMAT: &str = "0.00";

pub(crate) fn cast_row_num(idx: usize) -> Result<RowNum> {
    RowNum::try_from(idx).map_err(|_| ReportError::Xlsx(XlsxError::RowColumnLimitError))
}

pub(crate) fn cast_col_num(idx: usize) -> Result<ColNum> {
    ColNum::try_from(idx).map_err(|_| ReportError::Xlsx(XlsxError::RowColumnLimitError))
}

/// 居中 (水平 + 垂直)
pub(crate) fn centered(format: Format) -> Format {
    format
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

pub(crate) fn bordered(format: Format) -> Format {
    format.set_border(FormatBorder::Thin)
}

pub(crate) fn title_format(size: f64, bold: bool) -> Format {
    let format = centered(Format::new().set_font_name(TITLE_FONT).set_font_size(size));
    if bold {
        format.set_bold()
    } else {
        format
    }
}

/// 打印设置: 横向, 缩放到一页
pub(crate) fn apply_print_setup(sheet: &mut Worksheet) {
    sheet.set_landscape();
    sheet.set_print_fit_to_pages(1, 1);
}

/// 按单元格类型写入
pub(crate) fn write_cell(
    sheet: &mut Worksheet,
    row: usize,
    col: usize,
    cell: &Cell,
    format: &Format,
) -> Result<()> {
    let (row, col) = (cast_row_num(row)?, cast_col_num(col)?);
    match cell {
        Cell::Empty => {
            sheet.write_blank(row, col, format)?;
        }
        Cell::Text(text) if text.is_empty() => {
            sheet.write_blank(row, col, format)?;
        }
        Cell::Text(text) => {
            sheet.write_string_with_format(row, col, text, format)?;
        }
        Cell::Number(value) => {
            sheet.write_number_with_format(row, col, *value, format)?;
        }
    }
    Ok(())
}

/// 合并一行中的若干列; 只有一列时直接写入
pub(crate) fn merge_row(
    sheet: &mut Worksheet,
    row: usize,
    first_col: usize,
    last_col: usize,
    text: &str,
    format: &Format,
) -> Result<()> {
    let row = cast_row_num(row)?;
    if last_col > first_col {
        sheet.merge_range(
            row,
            cast_col_num(first_col)?,
            row,
            cast_col_num(last_col)?,
            text,
            format,
        )?;
    } else {
        sheet.write_string_with_format(row, cast_col_num(first_col)?, text, format)?;
    }
    Ok(())
}
