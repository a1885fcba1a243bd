use super::Client;
use crate::error::Result;
use crate::form::Form;
use crate::result::{InvalidRegIdsResult, RegIdAliasResult, RegIdTopicResult};

const INVALID_REG_IDS_PATH: &str = "/v1/feedback/fetch_invalid_regids";
const REG_ID_ALIAS_PATH: &str = "/v1/alias/all";
const REG_ID_TOPIC_PATH: &str = "/v1/topic/all";

impl Client {
    /// Registration ids the service has marked invalid since the last fetch.
    ///
    /// Served by the feedback host, not the sandbox/production API host.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_invalid_reg_ids(&self) -> Result<InvalidRegIdsResult> {
        let url = format!(
            "{}{}",
            self.feedback_url.trim_end_matches('/'),
            INVALID_REG_IDS_PATH
        );
        self.get_url(url, &Form::new()).await
    }

    /// Aliases currently set on `reg_id`.
    #[tracing::instrument(skip(self))]
    pub async fn reg_id_aliases(&self, reg_id: &str) -> Result<RegIdAliasResult> {
        let query = self.reg_id_query(reg_id);
        self.get(REG_ID_ALIAS_PATH, &query).await
    }

    /// Topics `reg_id` is currently subscribed to.
    #[tracing::instrument(skip(self))]
    pub async fn reg_id_topics(&self, reg_id: &str) -> Result<RegIdTopicResult> {
        let query = self.reg_id_query(reg_id);
        self.get(REG_ID_TOPIC_PATH, &query).await
    }

    fn reg_id_query(&self, reg_id: &str) -> Form {
        let mut query = Form::new();
        query.add("registration_id", reg_id);
        if self.has_multi_package_name() {
            query.add("restricted_package_name", self.joined_package_names());
        }
        query
    }
}
