use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::info;

use cashshop_domain::messages::{Message, Topic};
use cashshop_domain::ports::MessageProducer;

#[derive(Debug, Deserialize)]
struct ReplayRecord {
    topic: Topic,
    key: String,
    value: serde_json::Value,
}

pub async fn load_replay(path: impl AsRef<Path>) -> Result<Vec<(Topic, Message)>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .await
        .map_err(|err| anyhow!("unable to read {}: {}", path.display(), err))?;
    parse_replay(&content)
}

/// One JSON object per line. Blank lines and lines starting with `#` are
/// skipped.
pub fn parse_replay(content: &str) -> Result<Vec<(Topic, Message)>> {
    let mut records = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let record: ReplayRecord = serde_json::from_str(line)
            .map_err(|err| anyhow!("replay line {}: {}", index + 1, err))?;
        records.push((
            record.topic,
            Message {
                key: record.key,
                value: record.value,
            },
        ));
    }
    Ok(records)
}

/// Publishes the records one at a time, in file order.
pub async fn replay(producer: &dyn MessageProducer, records: Vec<(Topic, Message)>) -> Result<usize> {
    let total = records.len();
    for (topic, message) in records {
        producer.publish(topic, vec![message]).await?;
    }
    info!("replayed {} messages", total);
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_records_and_skips_comments() {
        let content = r#"
# bootstrap an account
{"topic":"EVENT_TOPIC_ACCOUNT_STATUS","key":"1","value":{"accountId":1,"status":"CREATED"}}

{"topic":"COMMAND_TOPIC_CASH_SHOP","key":"10","value":{"type":"PURCHASE","characterId":10,"body":{"currency":1,"serialNumber":20000001}}}
"#;
        let records = parse_replay(content).expect("parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, Topic::AccountStatus);
        assert_eq!(records[1].0, Topic::CashShopCommand);
        assert_eq!(records[1].1.key, "10");
    }

    #[test]
    fn reports_the_failing_line() {
        let content = "{\"topic\":\"EVENT_TOPIC_ACCOUNT_STATUS\",\"key\":\"1\",\"value\":{}}\n{\"topic\":\"NOPE\"}";
        let err = parse_replay(content).expect_err("bad topic");
        assert!(err.to_string().contains("line 2"));
    }
}
