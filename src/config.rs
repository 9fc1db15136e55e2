use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 默认配置文件名 (可选)
pub const DEFAULT_CONFIG_FILE: &str = "audit-report.toml";

/// 环境变量前缀, 例如 AUDIT_REPORT__SERVER__PORT=9000
pub const ENV_PREFIX: &str = "AUDIT_REPORT";

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 上传文件大小上限 (字节)
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: 32 * 1024 * 1024,
        }
    }
}

/// 机构名称选择规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePolicy {
    /// 出现多个不同名称时取第二个, 否则取第一个
    SecondDistinct,
    /// 取最长的名称, 等长取最先出现的
    Longest,
}

/// 机构名称替换 (源数据中同一机构的不同写法)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameAlias {
    pub from: String,
    pub to: String,
}

/// 报表配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// 标题与文件名前缀的地区名
    pub region: String,
    /// 明细表 "二次反馈" 列默认值
    pub feedback_default: String,
    /// 汇总表优先排列的医疗机构编码
    pub priority_codes: Vec<String>,
    /// 汇总前的机构名称替换
    pub name_aliases: Vec<NameAlias>,
    /// 明细表文件名使用的机构名称规则
    pub detail_name_policy: NamePolicy,
    /// 命令行未指定时的输出目录
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            region: "淮安经济技术开发区".to_string(),
            feedback_default: "无异议".to_string(),
            priority_codes: [
                "H32087100006",
                "H32087100010",
                "H32087100021",
                "H32087100196",
                "H32087101766",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            name_aliases: vec![
                NameAlias {
                    from: "淮安经济技术开发区医院（淮安汉方医院管理有限公司）".to_string(),
                    to: "淮安经济技术开发区医院".to_string(),
                },
                NameAlias {
                    from: "枚乘路社区卫生服务中心".to_string(),
                    to: "淮安经济技术开发区枚乘街道卫生院".to_string(),
                },
            ],
            detail_name_policy: NamePolicy::SecondDistinct,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl AppConfig {
    /// 按 默认值 -> 配置文件 -> 环境变量 的顺序加载配置
    pub fn load() -> Result<Self, config::ConfigError> {
        let file = std::env::var(format!("{}_CONFIG", ENV_PREFIX))
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let defaults = config::Config::try_from(&AppConfig::default())?;

        config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(&file).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("report.priority_codes")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
