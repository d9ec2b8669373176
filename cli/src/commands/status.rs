use serde_json::json;

use axon_core::config::{config_path, load_config};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let Some(config) = load_config() else {
        return Err("No configuration found. Run `axon setup` first.".into());
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "agent": config.agent_name,
            "api_key": mask_key(&config.api_key),
            "endpoint": config.endpoint(),
            "auto_search": config.auto_search(),
            "max_mentor_turns": config.max_mentor_turns(),
            "config": config_path().display().to_string(),
        }))?
    );
    Ok(())
}

/// Enough of the key to recognize it, never enough to use it.
fn mask_key(key: &str) -> String {
    if key.len() > 16 {
        format!("{}...{}", &key[..12], &key[key.len() - 4..])
    } else {
        key.to_string()
    }
}
