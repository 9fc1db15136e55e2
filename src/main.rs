mod cli;

use audit_report::models::ReportKind;
use audit_report::{api, AppConfig, ReportService};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Loaded config: {:?}", config);

    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    }) {
        Commands::Serve { host, port } => serve(config, host, port).await,
        Commands::Detail { out, inputs } => run_batch(config, ReportKind::Detail, out, inputs),
        Commands::Summary { out, inputs } => run_batch(config, ReportKind::Summary, out, inputs),
    }
}

async fn serve(
    mut config: AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let service = Arc::new(ReportService::new(config.report.clone()));
    let app = api::router(service, config.server.max_upload_bytes);

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /         - 上传页面");
    info!("  POST /process  - 上传审核总表, 返回报表 zip");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn run_batch(
    config: AppConfig,
    kind: ReportKind,
    out: Option<PathBuf>,
    inputs: Vec<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = out.unwrap_or_else(|| config.report.output_dir.clone());
    let service = ReportService::new(config.report);

    let outcome = service.process_batch(&inputs, kind, &out_dir);
    for file in &outcome.files {
        match &file.error {
            None => println!("{}: 生成 {} 个文件", file.input.display(), file.outputs.len()),
            Some(e) => println!("{}: 跳过 ({})", file.input.display(), e),
        }
    }

    if outcome.failed_count() > 0 {
        return Err(format!("{} 个文件处理失败", outcome.failed_count()).into());
    }
    println!("文件已成功保存至：{}", out_dir.display());
    Ok(())
}
