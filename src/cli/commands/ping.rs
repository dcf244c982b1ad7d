use std::time::Duration;

use serde_json::{json, Value};

use crate::cli::utils::output;
use crate::cli::OutputFormat;

pub async fn handle(url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let health_url = format!("{}/health", url.trim_end_matches('/'));
    let client = reqwest::Client::new();

    let response = client
        .get(&health_url)
        .timeout(Duration::from_secs(5))
        .send()
        .await?;
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    let data = json!({ "url": health_url, "status": status.as_u16(), "body": body });
    output(output_format, &data, || format!("{} {}", health_url, status))?;

    if !status.is_success() {
        anyhow::bail!("server unhealthy: {}", status);
    }
    Ok(())
}
