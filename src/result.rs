//! Response bodies returned by the push API.
//!
//! Every endpoint answers with the same envelope and an endpoint specific
//! `data` object. Missing or `null` fields decode to their defaults.

use serde::{Deserialize, Deserializer, Serialize};

/// Fields common to every response.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Envelope {
    pub result: String,
    pub trace_id: String,
    pub code: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub info: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
}

/// Envelope plus the endpoint's `data` payload.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct Response<T> {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: T,
}

impl<T> Response<T> {
    /// The service reports success with code 0.
    pub fn is_ok(&self) -> bool {
        self.envelope.code == 0
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Envelope-only answer (subscriptions, scheduled jobs).
pub type ApiResult = Response<serde_json::Value>;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SendData {
    /// Id of the created message.
    pub id: String,
}

pub type SendResult = Response<SendData>;

/// One day of delivery counters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Stat {
    pub date: String,
    pub alias_recipients: i64,
    #[serde(rename = "useraccount_recipients")]
    pub user_account_recipients: i64,
    pub regid_recipients: i64,
    pub received: i64,
    pub broadcast_recipients: i64,
    pub click: i64,
    pub single_recipients: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct StatsData {
    pub data: Vec<Stat>,
}

pub type StatsResult = Response<StatsData>;

/// Delivery trace of one message.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct MessageStatus {
    pub create_time: String,
    pub create_timestamp: i64,
    pub time_to_live: String,
    pub click_rate: String,
    pub msg_type: String,
    pub delivery_rate: String,
    pub delivered: i32,
    pub id: String,
    pub click: i32,
    pub resolved: i32,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SingleStatusData {
    pub data: MessageStatus,
}

pub type SingleStatusResult = Response<SingleStatusData>;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct BatchStatusData {
    pub data: Vec<MessageStatus>,
}

pub type BatchStatusResult = Response<BatchStatusData>;

/// A plain list of ids, aliases or topics.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ListData {
    pub list: Vec<String>,
}

pub type InvalidRegIdsResult = Response<ListData>;
pub type RegIdAliasResult = Response<ListData>;
pub type RegIdTopicResult = Response<ListData>;
