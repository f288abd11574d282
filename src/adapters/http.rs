use crate::utils::error::{LeadError, Result};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

const ERROR_BODY_LIMIT: usize = 300;

pub fn build_client(timeout_seconds: u64) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()?;
    Ok(client)
}

pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// 成功時解析 JSON，否則回傳帶有狀態碼與部分內容的錯誤
pub async fn read_json(service: &str, response: Response) -> Result<serde_json::Value> {
    let status = response.status();
    tracing::debug!("📡 {} API response status: {}", service, status);

    if status.is_success() {
        return Ok(response.json().await?);
    }

    if status == StatusCode::UNAUTHORIZED {
        tracing::error!("🔑 {} authentication failed - check the API key", service);
    }

    let body = response.text().await.unwrap_or_default();
    Err(LeadError::ApiStatusError {
        service: service.to_string(),
        status: status.as_u16(),
        body: truncate(&body, ERROR_BODY_LIMIT),
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
