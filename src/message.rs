//! Push message model and its chainable mutators.
//!
//! Nothing here validates. Setters clamp the time fields into range, but the
//! fields are public and may be changed directly, so the client re-checks
//! every message when it is sent (see `validation`).

use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::PushError;

/// Longest lifetime the service keeps an undelivered message: 14 days.
pub const MAX_TIME_TO_LIVE_MS: i64 = 14 * 24 * 3600 * 1000;

/// Furthest a message may be scheduled in the future: 7 days.
pub const MAX_TIME_TO_SEND_MS: i64 = 7 * 24 * 3600 * 1000;

/// How the device alerts the user when the notification arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyType {
    /// Sound, vibration and lights.
    DefaultAll,
    Sound,
    Vibrate,
    Lights,
}

impl NotifyType {
    /// The integer sent as `notify_type`.
    pub fn code(self) -> i32 {
        match self {
            NotifyType::DefaultAll => -1,
            NotifyType::Sound => 1,
            NotifyType::Vibrate => 2,
            NotifyType::Lights => 4,
        }
    }
}

impl From<NotifyType> for i32 {
    fn from(notify_type: NotifyType) -> Self {
        notify_type.code()
    }
}

impl TryFrom<i32> for NotifyType {
    type Error = PushError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(NotifyType::DefaultAll),
            1 => Ok(NotifyType::Sound),
            2 => Ok(NotifyType::Vibrate),
            4 => Ok(NotifyType::Lights),
            other => Err(PushError::validation(format!(
                "unknown notifyType {}",
                other
            ))),
        }
    }
}

/// A push message.
///
/// Serializes to the JSON shape the multi-message endpoints expect; zero and
/// empty optional fields are left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub restricted_package_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub payload: String,
    pub title: String,
    pub description: String,
    /// 0 shows in the notification bar, 1 is handed to the app untouched.
    pub pass_through: i32,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub notify_type: i32,
    /// Relative lifetime in milliseconds, 0 for the service default.
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub time_to_live: i64,
    /// Absolute delivery time in epoch milliseconds, 0 to send now.
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub time_to_send: i64,
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub notify_id: i64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

fn is_zero_i32(v: &i32) -> bool {
    *v == 0
}

fn is_zero_i64(v: &i64) -> bool {
    *v == 0
}

impl Message {
    /// Creates a notification-bar message that alerts with the default sound.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            restricted_package_name: String::new(),
            payload: String::new(),
            title: title.into(),
            description: description.into(),
            pass_through: 0,
            notify_type: NotifyType::Sound.code(),
            time_to_live: 0,
            time_to_send: 0,
            notify_id: 0,
            extra: BTreeMap::new(),
        }
    }

    /// Limits delivery to the given packages, joined with `,`.
    pub fn set_restricted_package_name<S: AsRef<str>>(&mut self, package_names: &[S]) -> &mut Self {
        self.restricted_package_name = package_names
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        self
    }

    /// Sets the payload handed to the app; not shown to the user.
    pub fn set_payload(&mut self, payload: impl Into<String>) -> &mut Self {
        self.payload = payload.into();
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    /// Delivers the message straight to the app instead of the notification bar.
    pub fn enable_pass_through(&mut self) -> &mut Self {
        self.pass_through = 1;
        self
    }

    /// Shows the message in the notification bar (the default).
    pub fn disable_pass_through(&mut self) -> &mut Self {
        self.pass_through = 0;
        self
    }

    /// Accepts a `NotifyType` or a raw code; unknown codes fail at send time.
    pub fn set_notify_type(&mut self, notify_type: impl Into<i32>) -> &mut Self {
        self.notify_type = notify_type.into();
        self
    }

    /// Non-positive or too-long lifetimes become `MAX_TIME_TO_LIVE_MS`.
    pub fn set_time_to_live(&mut self, ttl_ms: i64) -> &mut Self {
        self.time_to_live = if ttl_ms <= 0 || ttl_ms > MAX_TIME_TO_LIVE_MS {
            MAX_TIME_TO_LIVE_MS
        } else {
            ttl_ms
        };
        self
    }

    /// Past times mean "send now" (0); times beyond the scheduling window are
    /// pulled back to its end.
    pub fn set_time_to_send(&mut self, epoch_ms: i64) -> &mut Self {
        self.set_time_to_send_at(epoch_ms, Utc::now().timestamp_millis())
    }

    pub(crate) fn set_time_to_send_at(&mut self, epoch_ms: i64, now_ms: i64) -> &mut Self {
        let latest = now_ms + MAX_TIME_TO_SEND_MS;
        self.time_to_send = if epoch_ms > latest {
            latest
        } else if epoch_ms < now_ms {
            0
        } else {
            epoch_ms
        };
        self
    }

    /// Messages sharing a notify id replace each other in the notification bar.
    pub fn set_notify_id(&mut self, notify_id: i64) -> &mut Self {
        self.notify_id = notify_id;
        self
    }

    /// Sets one `extra.<key>` field, replacing any previous value.
    pub fn add_extra(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn remove_extra(&mut self, key: &str) -> &mut Self {
        self.extra.remove(key);
        self
    }

    /// Lets the service spread delivery over time.
    pub fn enable_flow_control(&mut self) -> &mut Self {
        self.add_extra("flow_control", "1")
    }

    pub fn disable_flow_control(&mut self) -> &mut Self {
        self.remove_extra("flow_control")
    }

    /// Sets the launcher icon badge count.
    pub fn set_badge(&mut self, badge: i64) -> &mut Self {
        self.add_extra("badge", badge.to_string())
    }

    /// Groups messages under a job key; status can be traced by it.
    pub fn set_job_key(&mut self, job_key: impl Into<String>) -> &mut Self {
        self.add_extra("jobkey", job_key)
    }

    /// Registers a receipt callback for both delivery and click events.
    pub fn set_callback(&mut self, callback_url: impl Into<String>) -> &mut Self {
        self.add_extra("callback", callback_url);
        // 1 delivered, 2 clicked, 3 both
        self.add_extra("callback.type", "3")
    }

    /// Tapping the notification opens the app's launcher activity.
    pub fn set_launcher_activity(&mut self) -> &mut Self {
        self.add_extra("notify_effect", "1")
    }

    /// Tapping the notification opens the activity named by `intent_uri`.
    pub fn set_open_activity(&mut self, intent_uri: impl Into<String>) -> &mut Self {
        self.add_extra("notify_effect", "2");
        self.add_extra("intent_uri", intent_uri)
    }

    /// Tapping the notification opens `url` in a browser.
    pub fn set_open_web_uri(&mut self, url: impl Into<String>) -> &mut Self {
        self.add_extra("notify_effect", "3");
        self.add_extra("web_uri", url)
    }

    /// Text shown in the status bar when the notification arrives.
    pub fn set_ticker(&mut self, ticker: impl Into<String>) -> &mut Self {
        self.add_extra("ticker", ticker)
    }

    /// Also shows the notification while the app is in the foreground.
    pub fn enable_notify_foreground(&mut self) -> &mut Self {
        self.add_extra("notify_foreground", "1")
    }

    pub fn disable_notify_foreground(&mut self) -> &mut Self {
        self.remove_extra("notify_foreground")
    }

    /// Folds notifications sharing `group` under one summary entry.
    pub fn set_notification_group(&mut self, group: impl Into<String>) -> &mut Self {
        self.add_extra("notification_group", group);
        self.add_extra("notification_is_summary", "true")
    }
}

/// What a targeted message's `target` string identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    RegId,
    Alias,
    Account,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetKind::RegId => "regid",
            TargetKind::Alias => "alias",
            TargetKind::Account => "account",
        };
        f.write_str(name)
    }
}

/// A message bound to one recipient, for the batched multi-message endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetedMessage {
    message: Message,
    target: String,
    kind: TargetKind,
}

impl TargetedMessage {
    pub fn new(message: Message, target: impl Into<String>, kind: TargetKind) -> Self {
        Self {
            message,
            target: target.into(),
            kind,
        }
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }
}
