use chrono::NaiveDate;

use super::Client;
use crate::error::{PushError, Result};
use crate::form::Form;
use crate::result::{BatchStatusResult, SingleStatusResult, StatsResult};

const STATS_PATH: &str = "/v1/stats/message/counters";
const MESSAGE_STATUS_PATH: &str = "/v1/trace/message/status";
const MESSAGES_STATUS_PATH: &str = "/v1/trace/messages/status";

const STATS_DATE_FORMAT: &str = "%Y%m%d";

impl Client {
    /// Daily delivery counters for the first package, `start..=end`.
    #[tracing::instrument(skip(self))]
    pub async fn stats(&self, start: NaiveDate, end: NaiveDate) -> Result<StatsResult> {
        let mut query = Form::new();
        query
            .add("start_date", start.format(STATS_DATE_FORMAT).to_string())
            .add("end_date", end.format(STATS_DATE_FORMAT).to_string())
            .add("restricted_package_name", self.package_names[0].as_str());

        self.get(STATS_PATH, &query).await
    }

    /// Delivery status of one message by the id returned when it was sent.
    #[tracing::instrument(skip(self))]
    pub async fn message_status_by_id(&self, message_id: &str) -> Result<SingleStatusResult> {
        if message_id.is_empty() {
            return Err(PushError::validation("message id can't empty"));
        }

        let mut query = Form::new();
        query.add("msg_id", message_id);
        self.get(MESSAGE_STATUS_PATH, &query).await
    }

    /// Aggregated delivery status of every message sent under `job_key`.
    #[tracing::instrument(skip(self))]
    pub async fn message_status_by_job_key(&self, job_key: &str) -> Result<SingleStatusResult> {
        if job_key.is_empty() {
            return Err(PushError::validation("jobKey can't empty"));
        }

        let mut query = Form::new();
        query.add("job_key", job_key);
        self.get(MESSAGE_STATUS_PATH, &query).await
    }

    /// Status of every message sent between two epoch-millisecond instants.
    #[tracing::instrument(skip(self))]
    pub async fn message_status_by_range(
        &self,
        begin_ms: i64,
        end_ms: i64,
    ) -> Result<BatchStatusResult> {
        let mut query = Form::new();
        query
            .add("begin_time", begin_ms.to_string())
            .add("end_time", end_ms.to_string());
        self.get(MESSAGES_STATUS_PATH, &query).await
    }
}
