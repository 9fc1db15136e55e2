use crate::error::{ReportError, Result};
use crate::models::{Cell, RawTable};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// 标题行所在行号 (第二行)
pub const HEADER_ROW: u32 = 1;

/// calamine 单元格转换
pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::String(v) => Cell::Text(v.to_string()),
        Data::Float(v) => Cell::Number(*v),
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Bool(v) => Cell::Text(v.to_string()),
        Data::DateTime(v) => match v.as_datetime() {
            Some(dt) if dt.time() == chrono::NaiveTime::MIN => {
                Cell::Text(dt.format("%Y-%m-%d").to_string())
            }
            Some(dt) => Cell::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Cell::Number(v.as_f64()),
        },
        Data::DateTimeIso(v) => Cell::Text(v.to_string()),
        Data::DurationIso(v) => Cell::Text(v.to_string()),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}

/// 读取输入文件 (xlsx/xls/ods 取第一个工作表, 或 csv)
pub fn read_table(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path),
        "csv" => read_csv(path),
        _ => Err(ReportError::UnsupportedInput(path.display().to_string())),
    }
}

fn read_workbook(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::EmptySheet(path.display().to_string()))??;

    // Range 从第一个非空单元格开始, 行列号均为绝对位置
    let (Some((start_row, start_col)), Some((end_row, end_col))) = (range.start(), range.end())
    else {
        return Err(ReportError::EmptySheet(path.display().to_string()));
    };
    if start_row > HEADER_ROW || end_row < HEADER_ROW {
        return Err(ReportError::EmptySheet(path.display().to_string()));
    }

    let headers: Vec<String> = (start_col..=end_col)
        .map(|col| {
            range
                .get_value((HEADER_ROW, col))
                .map(|d| cell_from_data(d).as_text())
                .unwrap_or_default()
        })
        .collect();

    let mut table = RawTable::new(headers);
    for row in (HEADER_ROW + 1)..=end_row {
        let cells = (start_col..=end_col)
            .map(|col| range.get_value((row, col)).map(cell_from_data).unwrap_or(Cell::Empty))
            .collect();
        table.push_row(cells);
    }

    tracing::info!("读取 {}: {} 列, {} 行", path.display(), table.headers.len(), table.rows.len());
    Ok(table)
}

fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut records = reader.records();
    // 第一行为空白/说明行
    let _ = records.next().transpose()?;
    let Some(header) = records.next().transpose()? else {
        return Err(ReportError::EmptySheet(path.display().to_string()));
    };

    let headers = header
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    let mut table = RawTable::new(headers);
    for record in records {
        let record = record?;
        table.push_row(record.iter().map(cell_from_csv).collect());
    }

    tracing::info!("读取 {}: {} 列, {} 行", path.display(), table.headers.len(), table.rows.len());
    Ok(table)
}

fn cell_from_csv(field: &str) -> Cell {
    let field = field.trim();
    if field.is_empty() {
        return Cell::Empty;
    }
    // 前导零的编码按文本保留
    if field.len() > 1 && field.starts_with('0') && !field.starts_with("0.") {
        return Cell::Text(field.to_string());
    }
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Cell::Number(v),
        _ => Cell::Text(field.to_string()),
    }
}
