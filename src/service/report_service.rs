use super::aggregator::{deduction_total, pick_name, roll_up};
use super::filter::filter_rows;
use super::grouper::{group_by_institution, group_by_insurance_type};
use super::projector::{detail_plan, project_detail};
use super::title::{
    detail_file_name, detail_title, file_name_of, parse_period, parse_summary_period,
    summary_file_name, summary_title,
};
use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::models::columns;
use crate::models::{
    BatchOutcome, DetailReport, FileOutcome, RawTable, ReportKind, SummaryReport,
};
use crate::render::{render_detail, render_summary};
use crate::source::read_table;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// 报表生成服务: 读取 -> 过滤 -> 分组 -> 汇总 -> 投影 -> 渲染
pub struct ReportService {
    config: ReportConfig,
}

impl ReportService {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// 构建各机构明细表 (不落盘), 返回 (文件名, 报表)
    pub fn build_detail_reports(
        &self,
        table: &RawTable,
        source_name: &str,
    ) -> Result<Vec<(String, DetailReport)>> {
        let filtered = filter_rows(table)?;
        let period = parse_period(source_name);
        let title = detail_title(&self.config.region, period.as_ref());
        let plan = detail_plan(&self.config.feedback_default);

        let groups = group_by_institution(&filtered.records);
        let mut used_names: HashSet<String> = HashSet::new();
        let mut reports = Vec::with_capacity(groups.len());

        for (code, records) in groups {
            let projected = project_detail(&filtered.headers, &records, &plan)?;
            let name = pick_name(
                records.iter().map(|r| r.institution_name.as_str()),
                self.config.detail_name_policy,
            );

            // 不同编码得到同名文件时追加编码
            let mut file_name = detail_file_name(&name, &code);
            if !used_names.insert(file_name.clone()) {
                file_name = detail_file_name(&format!("{}_{}", name, code), &code);
                used_names.insert(file_name.clone());
            }

            reports.push((
                file_name,
                DetailReport {
                    title: title.clone(),
                    total: deduction_total(&records),
                    institution_code: code,
                    institution_name: name,
                    table: projected,
                },
            ));
        }

        Ok(reports)
    }

    /// 构建各险种汇总表 (不落盘), 返回 (文件名, 报表)
    pub fn build_summary_reports(
        &self,
        table: &RawTable,
        source_name: &str,
    ) -> Result<Vec<(String, SummaryReport)>> {
        if table.column_index(columns::INSURANCE_TYPE).is_none() {
            return Err(ReportError::MissingColumn(columns::INSURANCE_TYPE.to_string()));
        }
        let filtered = filter_rows(table)?;
        let period = parse_summary_period(source_name);

        let mut reports = Vec::new();
        for (insurance_type, records) in group_by_insurance_type(&filtered.records) {
            let result = roll_up(
                &records,
                &self.config.priority_codes,
                &self.config.name_aliases,
            )?;
            let file_name =
                summary_file_name(&self.config.region, period.as_ref(), &insurance_type);

            reports.push((
                file_name,
                SummaryReport {
                    title: summary_title(&self.config.region, period.as_ref(), &insurance_type),
                    insurance_type,
                    rows: result.rows,
                    total_visits: result.total_visits,
                    total_deduction: result.total_deduction,
                },
            ));
        }

        Ok(reports)
    }

    /// 处理单个输入文件, 返回生成的文件路径
    pub fn process_file(
        &self,
        input: &Path,
        kind: ReportKind,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let source_name = file_name_of(input);
        tracing::info!("开始处理 {} ({:?})", source_name, kind);

        let table = read_table(input)?;
        std::fs::create_dir_all(out_dir)?;

        let mut outputs = Vec::new();
        match kind {
            ReportKind::Detail => {
                let reports = self.build_detail_reports(&table, &source_name)?;
                let total = reports.len();
                for (idx, (file_name, report)) in reports.iter().enumerate() {
                    let path = out_dir.join(file_name);
                    render_detail(report, &path)?;
                    tracing::info!(
                        "[{}/{}] {} {}",
                        idx + 1,
                        total,
                        report.institution_code,
                        report.institution_name
                    );
                    outputs.push(path);
                }
            }
            ReportKind::Summary => {
                for (file_name, report) in self.build_summary_reports(&table, &source_name)? {
                    let path = out_dir.join(&file_name);
                    render_summary(&report, &path)?;
                    outputs.push(path);
                }
            }
        }

        tracing::info!("{} 处理完成, 生成 {} 个文件", source_name, outputs.len());
        Ok(outputs)
    }

    /// 批量处理: 单个文件失败只记录, 不中断其余文件
    pub fn process_batch(&self, inputs: &[PathBuf], kind: ReportKind, out_dir: &Path) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for input in inputs {
            match self.process_file(input, kind, out_dir) {
                Ok(outputs) => outcome.files.push(FileOutcome {
                    input: input.clone(),
                    outputs,
                    error: None,
                }),
                Err(e) => {
                    match &e {
                        ReportError::MissingColumn(_) | ReportError::MissingField(_) => {
                            tracing::warn!("文件 '{}' {}，跳过该文件", input.display(), e);
                        }
                        _ => {
                            tracing::error!("文件 '{}' 处理失败: {}", input.display(), e);
                        }
                    }
                    outcome.files.push(FileOutcome {
                        input: input.clone(),
                        outputs: Vec::new(),
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        tracing::info!(
            "批量处理完成: {} 个文件, 失败 {}, 生成 {} 个报表",
            outcome.files.len(),
            outcome.failed_count(),
            outcome.output_count()
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn summary_table() -> RawTable {
        let mut t = RawTable::new(
            [
                columns::INSTITUTION_CODE,
                columns::INSTITUTION_NAME,
                columns::INSURANCE_TYPE,
                columns::DEDUCTION,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        );
        t.push_row(vec![text("H9"), text("九院"), text("居民"), Cell::Number(1.0)]);
        t.push_row(vec![text("H32087100010"), text("某院"), text("职工"), Cell::Number(10.005)]);
        t.push_row(vec![text("H32087100010"), text("某医院"), text("职工"), Cell::Number(5.0)]);
        t.push_row(vec![text("H001"), text("A Hospital"), text("职工"), Cell::Number(0.0)]);
        t
    }

    #[test]
    fn summary_reports_per_insurance_type() {
        let service = ReportService::new(ReportConfig::default());
        let reports = service
            .build_summary_reports(&summary_table(), "智能审核202409.xlsx")
            .unwrap();

        assert_eq!(reports.len(), 2);
        let (file_name, report) = &reports[1];
        assert_eq!(file_name, "淮安经济技术开发区智能审核2024年09月扣款统计表职工.xlsx");
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].institution_name, "某医院");
        assert_eq!(report.rows[0].deduction, BigDecimal::from_str("15.01").unwrap());
        assert_eq!(report.rows[0].visits, 2);
        assert_eq!(report.total_deduction, BigDecimal::from_str("15.01").unwrap());
    }

    #[test]
    fn summary_period_ignores_date_prefix() {
        let service = ReportService::new(ReportConfig::default());
        let reports = service
            .build_summary_reports(&summary_table(), "20241209淮安经济技术开发区智能审核202411省平台总表.xlsx")
            .unwrap();
        assert_eq!(
            reports[0].1.title,
            "淮安经济技术开发区智能审核2024年11月扣款统计表（居民）"
        );
    }

    #[test]
    fn summary_requires_insurance_type() {
        let service = ReportService::new(ReportConfig::default());
        let t = RawTable::new(vec![
            columns::INSTITUTION_CODE.to_string(),
            columns::INSTITUTION_NAME.to_string(),
            columns::DEDUCTION.to_string(),
        ]);
        let err = service.build_summary_reports(&t, "x.xlsx").unwrap_err();
        assert!(matches!(err, ReportError::MissingColumn(ref c) if c == columns::INSURANCE_TYPE));
    }

    #[test]
    fn batch_continues_after_failed_file() {
        let dir = tempfile::tempdir().unwrap();
        let service = ReportService::new(ReportConfig::default());
        let missing = dir.path().join("missing.xlsx");
        let unsupported = dir.path().join("notes.txt");

        let outcome = service.process_batch(
            &[missing, unsupported],
            ReportKind::Detail,
            &dir.path().join("out"),
        );
        assert_eq!(outcome.files.len(), 2);
        assert_eq!(outcome.failed_count(), 2);
        assert_eq!(outcome.output_count(), 0);
    }
}
