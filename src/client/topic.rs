use super::Client;
use crate::error::{PushError, Result};
use crate::form::{Form, join};
use crate::message::TargetKind;
use crate::result::ApiResult;

const SUBSCRIBE_PATH: &str = "/v2/topic/subscribe";
const UNSUBSCRIBE_PATH: &str = "/v2/topic/unsubscribe";
const SUBSCRIBE_ALIAS_PATH: &str = "/v2/topic/subscribe/alias";
const UNSUBSCRIBE_ALIAS_PATH: &str = "/v2/topic/unsubscribe/alias";

impl Client {
    /// Subscribes registration ids to `topic`. An empty `category` is left out.
    #[tracing::instrument(skip(self, reg_ids))]
    pub async fn subscribe_reg_ids<S: AsRef<str>>(
        &self,
        reg_ids: &[S],
        topic: &str,
        category: Option<&str>,
    ) -> Result<ApiResult> {
        self.subscribe_action(TargetKind::RegId, SUBSCRIBE_PATH, reg_ids, topic, category)
            .await
    }

    #[tracing::instrument(skip(self, reg_ids))]
    pub async fn unsubscribe_reg_ids<S: AsRef<str>>(
        &self,
        reg_ids: &[S],
        topic: &str,
        category: Option<&str>,
    ) -> Result<ApiResult> {
        self.subscribe_action(TargetKind::RegId, UNSUBSCRIBE_PATH, reg_ids, topic, category)
            .await
    }

    /// Subscribes every device bound to one of `aliases` to `topic`.
    #[tracing::instrument(skip(self, aliases))]
    pub async fn subscribe_aliases<S: AsRef<str>>(
        &self,
        aliases: &[S],
        topic: &str,
        category: Option<&str>,
    ) -> Result<ApiResult> {
        self.subscribe_action(TargetKind::Alias, SUBSCRIBE_ALIAS_PATH, aliases, topic, category)
            .await
    }

    #[tracing::instrument(skip(self, aliases))]
    pub async fn unsubscribe_aliases<S: AsRef<str>>(
        &self,
        aliases: &[S],
        topic: &str,
        category: Option<&str>,
    ) -> Result<ApiResult> {
        self.subscribe_action(
            TargetKind::Alias,
            UNSUBSCRIBE_ALIAS_PATH,
            aliases,
            topic,
            category,
        )
        .await
    }

    async fn subscribe_action<S: AsRef<str>>(
        &self,
        kind: TargetKind,
        path: &str,
        targets: &[S],
        topic: &str,
        category: Option<&str>,
    ) -> Result<ApiResult> {
        let key = match kind {
            TargetKind::RegId => "registration_id",
            TargetKind::Alias => "aliases",
            other => {
                return Err(PushError::validation(format!(
                    "topic subscriptions do not support target type {}",
                    other
                )));
            }
        };

        let mut form = Form::new();
        form.add(key, join(targets, ",")).add("topic", topic);

        if let Some(category) = category.filter(|c| !c.is_empty()) {
            form.add("category", category);
        }

        if self.has_multi_package_name() {
            form.add("restricted_package_name", self.joined_package_names());
        }

        self.post(path, &form).await
    }
}
