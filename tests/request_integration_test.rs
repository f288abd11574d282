use anyhow::Result;
use httpmock::prelude::*;
use lead_etl::config::app_config::LeadSearchConfig;
use lead_etl::core::export::ExportOptions;
use lead_etl::core::request::LEAD_PRIORITY_FIELDS;
use lead_etl::{AiArcLeadClient, EtlEngine, LeadError, LocalStorage, RequestPipeline};
use serde_json::{json, Value};
use tempfile::TempDir;

fn lead_client(server: &MockServer, api_key: &str) -> Result<AiArcLeadClient> {
    Ok(AiArcLeadClient::new(LeadSearchConfig {
        base_url: server.base_url(),
        api_key: api_key.to_string(),
        timeout_seconds: 5,
    })?)
}

fn options() -> ExportOptions {
    ExportOptions::with_priority_fields(LEAD_PRIORITY_FIELDS)
}

#[tokio::test]
async fn test_request_file_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let base = temp_dir.path().to_str().unwrap().to_string();
    std::fs::write(
        temp_dir.path().join("dentists.json"),
        serde_json::to_vec_pretty(&json!({
            "audience_name": "tx-dentists",
            "filters": {"industry": "Dental", "state": "TX"},
            "limit": 2,
            "requested_by": "ops"
        }))?,
    )?;

    let server = MockServer::start();
    let search_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/leads/search")
            .header("Authorization", "Bearer arc-key")
            .json_body(json!({"industry": "Dental", "state": "TX", "limit": 2}));
        then.status(200).json_body(json!({
            "leads": [
                {
                    "first_name": "Ana",
                    "last_name": "Diaz",
                    "email": "ana@smile.test",
                    "company": {"name": "Smile Co", "size": "11-50"},
                    "revenue": 1200000
                },
                {"first_name": "Ben", "phone": "555-0100", "company": {"name": "Bright"}}
            ]
        }));
    });

    let pipeline = RequestPipeline::open(
        LocalStorage::new(base.clone()),
        lead_client(&server, "arc-key")?,
        "dentists.json",
        "results",
        options(),
    )
    .await?;

    let report = EtlEngine::new(pipeline).run().await?;

    search_mock.assert();
    assert_eq!(report.exported_rows, 2);
    assert!(report.output_path.starts_with("results/tx-dentists-"));

    let csv = std::fs::read_to_string(temp_dir.path().join(&report.output_path))?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "first_name,last_name,email,phone,company_name,company_size,revenue"
    );
    assert_eq!(lines[1], "Ana,Diaz,ana@smile.test,,Smile Co,11-50,1200000");
    assert_eq!(lines[2], "Ben,,,555-0100,Bright,,");

    let updated: Value =
        serde_json::from_str(&std::fs::read_to_string(temp_dir.path().join("dentists.json"))?)?;
    assert_eq!(updated["requested_by"], json!("ops"));
    assert_eq!(updated["result_count"], json!(2));
    assert_eq!(updated["result_file"], json!(report.output_path));
    Ok(())
}

#[tokio::test]
async fn test_missing_api_key_produces_sentinel_and_metadata() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let base = temp_dir.path().to_str().unwrap().to_string();
    std::fs::write(temp_dir.path().join("empty.json"), b"{\"filters\": {}}")?;

    let server = MockServer::start();
    let search_mock = server.mock(|when, then| {
        when.method(POST).path("/leads/search");
        then.status(200).json_body(json!({"leads": []}));
    });

    let pipeline = RequestPipeline::open(
        LocalStorage::new(base.clone()),
        lead_client(&server, "")?,
        "empty.json",
        "results",
        options(),
    )
    .await?;

    let report = EtlEngine::new(pipeline).run().await?;

    search_mock.assert_hits(0);
    assert_eq!(report.exported_rows, 0);
    let csv = std::fs::read_to_string(temp_dir.path().join(&report.output_path))?;
    assert!(csv.starts_with("status,message\nno_results,"));

    let updated: Value =
        serde_json::from_str(&std::fs::read_to_string(temp_dir.path().join("empty.json"))?)?;
    assert_eq!(updated["result_count"], json!(0));
    assert!(updated["processed_at"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_missing_request_file_is_reported() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let result = RequestPipeline::open(
        LocalStorage::new(temp_dir.path().to_str().unwrap()),
        lead_client(&server, "arc-key")?,
        "does-not-exist.json",
        "results",
        options(),
    )
    .await;

    assert!(matches!(result, Err(LeadError::IoError(_))));
    Ok(())
}
