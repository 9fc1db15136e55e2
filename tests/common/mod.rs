#![allow(dead_code)]

use calamine::{open_workbook_auto, Data, Range, Reader};
use regex::Regex;
use rust_xlsxwriter::Workbook;
use std::io::Read;
use std::path::Path;

/// 省平台审核总表的列 (含需剔除的 医保目录编码)
pub const DETAIL_HEADERS: [&str; 18] = [
    "医疗机构编码",
    "医疗机构名称",
    "患者姓名",
    "患者性别",
    "险种类型",
    "结算日期",
    "医保目录编码",
    "医保目录名称",
    "规则名称",
    "疑似违规内容",
    "疑似违规金额",
    "初审意见",
    "申诉意见",
    "复审意见",
    "终审结论",
    "终审意见",
    "扣款金额",
    "终审时间",
];

#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    Number(f64),
    Empty,
}

pub fn t(s: &str) -> Value {
    Value::Text(s.to_string())
}

pub fn n(v: f64) -> Value {
    Value::Number(v)
}

/// 一行审核数据, 非关键列填充占位文本
pub fn audit_row(code: &str, name: &str, insurance: &str, deduction: Value) -> Vec<Value> {
    DETAIL_HEADERS
        .iter()
        .map(|h| match *h {
            "医疗机构编码" => t(code),
            "医疗机构名称" => t(name),
            "险种类型" => t(insurance),
            "疑似违规金额" => n(100.0),
            "扣款金额" => deduction.clone(),
            other => t(&format!("{}-{}", other, code)),
        })
        .collect()
}

/// 写入输入工作簿: 第一行为说明 (或留空), 第二行为表头
pub fn write_input(path: &Path, first_row_blank: bool, headers: &[&str], rows: &[Vec<Value>]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    if !first_row_blank {
        sheet.write_string(0, 0, "省平台智能审核数据导出").unwrap();
    }
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(1, col as u16, *header).unwrap();
    }
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 2) as u32;
        for (col, value) in row.iter().enumerate() {
            match value {
                Value::Text(s) => {
                    sheet.write_string(r, col as u16, s).unwrap();
                }
                Value::Number(v) => {
                    sheet.write_number(r, col as u16, *v).unwrap();
                }
                Value::Empty => {}
            }
        }
    }
    workbook.save(path).unwrap();
}

pub fn read_sheet(path: &Path) -> Range<Data> {
    let mut workbook = open_workbook_auto(path).unwrap();
    workbook.worksheet_range_at(0).unwrap().unwrap()
}

pub fn string_at(range: &Range<Data>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        Some(Data::String(s)) => s.clone(),
        other => panic!("expected string at ({}, {}), got {:?}", row, col, other),
    }
}

pub fn number_at(range: &Range<Data>, row: u32, col: u32) -> f64 {
    match range.get_value((row, col)) {
        Some(Data::Float(v)) => *v,
        Some(Data::Int(v)) => *v as f64,
        other => panic!("expected number at ({}, {}), got {:?}", row, col, other),
    }
}

pub fn assert_amount(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "amount {} != {}",
        actual,
        expected
    );
}

/// 读取 xlsx 包中的一个 XML 部件
pub fn xlsx_part(path: &Path, part: &str) -> String {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut xml = String::new();
    archive.by_name(part).unwrap().read_to_string(&mut xml).unwrap();
    xml
}

pub fn sheet_xml(path: &Path) -> String {
    xlsx_part(path, "xl/worksheets/sheet1.xml")
}

/// 工作表中的合并区域, 如 "A1:S1"
pub fn merged_ranges(sheet: &str) -> Vec<String> {
    let re = Regex::new(r#"<mergeCell ref="([A-Z0-9:]+)"/>"#).unwrap();
    re.captures_iter(sheet).map(|c| c[1].to_string()).collect()
}

/// 单元格是否带边框: 通过 s 属性查 styles.xml 中 cellXfs 的 borderId
pub fn has_border(path: &Path, cell_ref: &str) -> bool {
    let sheet = sheet_xml(path);
    let cell = Regex::new(&format!(r#"<c r="{}"(?: s="(\d+)")?"#, cell_ref)).unwrap();
    let caps = cell
        .captures(&sheet)
        .unwrap_or_else(|| panic!("cell {} not written", cell_ref));
    let xf_index: usize = caps.get(1).map_or(0, |m| m.as_str().parse().unwrap());

    let styles = xlsx_part(path, "xl/styles.xml");
    let start = styles.find("<cellXfs").unwrap();
    let end = styles.find("</cellXfs>").unwrap();
    let border = Regex::new(r#"<xf [^>]*borderId="(\d+)""#).unwrap();
    let border_ids: Vec<&str> = border
        .captures_iter(&styles[start..end])
        .map(|c| c.get(1).unwrap().as_str())
        .collect();
    border_ids[xf_index] != "0"
}

/// 从第 `col` 列 (从 1 开始) 起的 <col> 元素存储的列宽
pub fn column_width(sheet: &str, col: u32) -> f64 {
    let re = Regex::new(&format!(r#"<col min="{}" max="\d+" width="([0-9.]+)""#, col)).unwrap();
    re.captures(sheet)
        .unwrap_or_else(|| panic!("no width for column {}", col))[1]
        .parse()
        .unwrap()
}
