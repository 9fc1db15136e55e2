use thiserror::Error;

/// 报表处理结果
pub type Result<T> = std::result::Result<T, ReportError>;

/// 报表生成过程中的错误
#[derive(Debug, Error)]
pub enum ReportError {
    /// 输入表缺少必需列 (如 扣款金额)
    #[error("未找到 '{0}' 列")]
    MissingColumn(String),

    /// 输出投影所需的源列缺失
    #[error("缺少字段 '{0}'")]
    MissingField(String),

    /// 工作簿中没有可用的工作表或标题行
    #[error("工作表为空: {0}")]
    EmptySheet(String),

    /// 人次合计超出范围
    #[error("机构 '{0}' 人次合计溢出")]
    VisitsOverflow(String),

    /// 不支持的输入文件类型
    #[error("不支持的文件类型: {0}")]
    UnsupportedInput(String),

    #[error("读取 Excel 失败: {0}")]
    Read(#[from] calamine::Error),

    #[error("读取 CSV 失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("写入 Excel 失败: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("打包失败: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}
