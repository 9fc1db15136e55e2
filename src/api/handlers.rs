use super::archive::zip_files;
use crate::error::Result;
use crate::models::ReportKind;
use crate::service::title::{file_name_of, sanitize_file_name};
use crate::service::ReportService;
use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// 上传页面
const INDEX_HTML: &str = include_str!("../../static/index.html");

/// 下载文件名 "处理结果.zip"
const ZIP_DISPOSITION: &str =
    "attachment; filename=\"result.zip\"; filename*=UTF-8''%E5%A4%84%E7%90%86%E7%BB%93%E6%9E%9C.zip";

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let response = ErrorResponse {
        error: message.into(),
    };
    (status, Json(response)).into_response()
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 上传页面
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// 上传审核总表, 返回生成报表的 zip
///
/// 表单字段: `file` (必填), `kind` = detail | summary (默认 detail)
pub async fn process(
    State(service): State<Arc<ReportService>>,
    mut multipart: Multipart,
) -> Response {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut kind = ReportKind::Detail;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e.body_text()),
        };
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(data) => upload = Some((file_name, data.to_vec())),
                    Err(e) => return error_response(StatusCode::BAD_REQUEST, e.body_text()),
                }
            }
            "kind" => {
                let text = match field.text().await {
                    Ok(text) => text,
                    Err(e) => return error_response(StatusCode::BAD_REQUEST, e.body_text()),
                };
                kind = match text.parse() {
                    Ok(kind) => kind,
                    Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
                };
            }
            _ => {}
        }
    }

    let Some((file_name, data)) = upload else {
        return error_response(StatusCode::BAD_REQUEST, "没有上传文件");
    };
    if file_name.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "未选择文件");
    }

    tracing::info!("收到上传文件 {} ({} 字节, {:?})", file_name, data.len(), kind);

    let result =
        tokio::task::spawn_blocking(move || process_upload(&service, &file_name, &data, kind))
            .await;

    match result {
        Ok(Ok(bytes)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/zip"),
                (header::CONTENT_DISPOSITION, ZIP_DISPOSITION),
            ],
            bytes,
        )
            .into_response(),
        Ok(Err(e)) => {
            tracing::error!("处理上传文件失败: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(e) => {
            tracing::error!("处理任务异常: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// 在临时目录中处理上传文件并打包, 目录随返回自动清理
fn process_upload(
    service: &ReportService,
    file_name: &str,
    data: &[u8],
    kind: ReportKind,
) -> Result<Vec<u8>> {
    let work_dir = tempfile::tempdir()?;
    // 保留原文件名, 标题中的年月由文件名解析
    let safe_name = sanitize_file_name(&file_name_of(Path::new(file_name)));
    let input = work_dir.path().join(safe_name);
    std::fs::write(&input, data)?;

    let outputs = service.process_file(&input, kind, &work_dir.path().join("output"))?;
    zip_files(&outputs)
}
