use serde_json::{Value, json};

use axon_core::config::{DEFAULT_ENDPOINT, PluginConfig, config_path, save_config};

const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Registers the agent and persists the issued key. The wallet address is
/// optional at registration time and can be updated later.
pub async fn run(
    endpoint: &str,
    name: &str,
    description: &str,
    wallet: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let endpoint = endpoint.trim_end_matches('/');

    let resp = reqwest::Client::new()
        .post(format!("{endpoint}/register"))
        .json(&json!({
            "name": name,
            "description": description,
            "walletAddress": wallet.unwrap_or(ZERO_ADDRESS),
        }))
        .send()
        .await?;

    let status = resp.status();
    let body: Value = resp.json().await?;

    if !status.is_success() {
        return Err(format!(
            "Registration failed (HTTP {}): {}",
            status.as_u16(),
            serde_json::to_string_pretty(&body)?
        )
        .into());
    }

    let api_key = extract_api_key(&body)
        .ok_or("Registration succeeded but the response carried no API key")?;

    let mut config = PluginConfig::new(api_key);
    config.agent_name = Some(name.to_string());
    if endpoint != DEFAULT_ENDPOINT {
        config.endpoint = Some(endpoint.to_string());
    }
    config.validate()?;
    save_config(&config)?;

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "status": "registered",
            "agent": name,
            "config": config_path().display().to_string(),
            "next": "Run `axon init` in your project to add usage guidelines, then restart your agent.",
        }))?
    );
    Ok(())
}

/// The registration response wraps its payload in `data` on newer servers
/// and returns it bare on older ones.
fn extract_api_key(body: &Value) -> Option<&str> {
    body.pointer("/data/apiKey")
        .or_else(|| body.get("apiKey"))
        .and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_is_found_in_both_response_shapes() {
        let wrapped = json!({ "data": { "apiKey": "axon_mcp_a" } });
        assert_eq!(extract_api_key(&wrapped), Some("axon_mcp_a"));

        let bare = json!({ "apiKey": "axon_mcp_b" });
        assert_eq!(extract_api_key(&bare), Some("axon_mcp_b"));

        assert_eq!(extract_api_key(&json!({ "ok": true })), None);
    }
}
