use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "audit-report", version, about = "医保智能审核扣款报表生成")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 启动 HTTP 服务 (默认)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// 省平台总表拆分成各家明细表
    Detail {
        /// 输出目录, 缺省使用配置中的 report.output_dir
        #[arg(long, short)]
        out: Option<PathBuf>,
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// 省平台总表拆分职工/居民汇总表
    Summary {
        #[arg(long, short)]
        out: Option<PathBuf>,
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}
