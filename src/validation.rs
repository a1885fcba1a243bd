//! Send-time checks for outgoing messages.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{PushError, Result};
use crate::message::{MAX_TIME_TO_LIVE_MS, MAX_TIME_TO_SEND_MS, Message, NotifyType};

/// Checks a message against the service limits as of now.
pub fn validate_message(message: &Message) -> Result<()> {
    validate_message_at(message, Utc::now().timestamp_millis())
}

/// Checks a message against the service limits as of `now_ms` (epoch ms).
pub fn validate_message_at(message: &Message, now_ms: i64) -> Result<()> {
    if message.title.is_empty() || message.description.is_empty() {
        return Err(PushError::validation("title and description can't empty"));
    }

    NotifyType::try_from(message.notify_type)?;

    if message.time_to_live > MAX_TIME_TO_LIVE_MS {
        return Err(PushError::validation(format!(
            "TimeToLive too long ({} {})",
            message.title, message.time_to_live
        )));
    }

    if message.time_to_send > 0 {
        let latest = now_ms + MAX_TIME_TO_SEND_MS;
        if message.time_to_send > latest {
            return Err(PushError::validation(format!(
                "TimeToSend error ({} {}), should before {}",
                message.title,
                message.time_to_send,
                rfc3339(latest)
            )));
        }

        if message.time_to_send < now_ms {
            return Err(PushError::validation(format!(
                "TimeToSend error ({} {}), should after (now) {}",
                message.title,
                message.time_to_send,
                rfc3339(now_ms)
            )));
        }
    }

    Ok(())
}

fn rfc3339(epoch_ms: i64) -> String {
    Utc.timestamp_millis_opt(epoch_ms)
        .single()
        .map(|t: DateTime<Utc>| t.to_rfc3339())
        .unwrap_or_else(|| epoch_ms.to_string())
}
