use anyhow::{anyhow, Result};

pub fn validate_base_url(key: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{} is empty", key));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(anyhow!("{} must start with http:// or https://", key));
    }
    Ok(())
}
