use std::fmt;
use std::str::FromStr;

use super::Client;
use crate::error::{PushError, Result};
use crate::form::{join, message_to_form, message_with_targets, targeted_messages_form};
use crate::message::{Message, TargetKind, TargetedMessage};
use crate::result::SendResult;

const REG_ID_PATH: &str = "/v3/message/regid";
const ALIAS_PATH: &str = "/v3/message/alias";
const ACCOUNT_PATH: &str = "/v2/message/user_account";
const ALL_PATH: &str = "/v3/message/all";
const TOPIC_PATH: &str = "/v3/message/topic";
const MULTI_TOPIC_PATH: &str = "/v3/message/multi_topic";

const MULTI_REG_ID_PATH: &str = "/v2/multi_messages/regids";
const MULTI_ALIAS_PATH: &str = "/v2/multi_messages/aliases";
const MULTI_ACCOUNT_PATH: &str = "/v2/multi_messages/user_accounts";

const MIN_TOPICS: usize = 2;
const MAX_TOPICS: usize = 5;
const TOPIC_SEPARATOR: &str = ";$;";

/// How several topics are combined into one audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopicOp {
    #[default]
    Union,
    Intersection,
    Except,
}

impl TopicOp {
    pub fn as_str(self) -> &'static str {
        match self {
            TopicOp::Union => "UNION",
            TopicOp::Intersection => "INTERSECTION",
            TopicOp::Except => "EXCEPT",
        }
    }
}

impl fmt::Display for TopicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the wire names exactly; an empty string means `Union`.
impl FromStr for TopicOp {
    type Err = PushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "UNION" => Ok(TopicOp::Union),
            "INTERSECTION" => Ok(TopicOp::Intersection),
            "EXCEPT" => Ok(TopicOp::Except),
            other => Err(PushError::validation(format!(
                "unknown topic option {}",
                other
            ))),
        }
    }
}

impl Client {
    /// Sends one message to up to 1000 registration ids.
    #[tracing::instrument(skip(self, message, reg_ids))]
    pub async fn send_to_reg_ids<S: AsRef<str>>(
        &self,
        message: &Message,
        reg_ids: &[S],
    ) -> Result<SendResult> {
        let form = message_with_targets(message, &self.package_names, "registration_id", reg_ids)?;
        self.post(REG_ID_PATH, &form).await
    }

    /// Sends one message to up to 1000 aliases.
    #[tracing::instrument(skip(self, message, aliases))]
    pub async fn send_to_aliases<S: AsRef<str>>(
        &self,
        message: &Message,
        aliases: &[S],
    ) -> Result<SendResult> {
        let form = message_with_targets(message, &self.package_names, "alias", aliases)?;
        self.post(ALIAS_PATH, &form).await
    }

    /// Sends one message to up to 1000 user accounts.
    #[tracing::instrument(skip(self, message, accounts))]
    pub async fn send_to_accounts<S: AsRef<str>>(
        &self,
        message: &Message,
        accounts: &[S],
    ) -> Result<SendResult> {
        let form = message_with_targets(message, &self.package_names, "user_account", accounts)?;
        self.post(ACCOUNT_PATH, &form).await
    }

    /// Broadcasts to every subscriber of `topic`.
    #[tracing::instrument(skip(self, message))]
    pub async fn send_to_topic(&self, message: &Message, topic: &str) -> Result<SendResult> {
        let mut form = message_to_form(message, &self.package_names)?;
        form.add("topic", topic);
        self.post(TOPIC_PATH, &form).await
    }

    /// Broadcasts to a set combination of 2 to 5 topics; `None` means union.
    #[tracing::instrument(skip(self, message, topics))]
    pub async fn send_to_topics<S: AsRef<str>>(
        &self,
        message: &Message,
        topics: &[S],
        topic_op: Option<TopicOp>,
    ) -> Result<SendResult> {
        let mut form = message_to_form(message, &self.package_names)?;

        if !(MIN_TOPICS..=MAX_TOPICS).contains(&topics.len()) {
            return Err(PushError::validation(format!(
                "topics count should between {} and {}",
                MIN_TOPICS, MAX_TOPICS
            )));
        }

        let topic_op = topic_op.unwrap_or_default();
        form.add("topics", join(topics, TOPIC_SEPARATOR))
            .add("topic_op", topic_op.as_str());

        self.post(MULTI_TOPIC_PATH, &form).await
    }

    /// Broadcasts to every device of the app.
    #[tracing::instrument(skip(self, message))]
    pub async fn send_to_all(&self, message: &Message) -> Result<SendResult> {
        let form = message_to_form(message, &self.package_names)?;
        self.post(ALL_PATH, &form).await
    }

    /// Sends a batch of individually addressed messages in one request.
    ///
    /// All entries must share one target kind, which picks the endpoint.
    #[tracing::instrument(skip(self, messages), fields(count = messages.len()))]
    pub async fn send_targeted_messages(&self, messages: &[TargetedMessage]) -> Result<SendResult> {
        let (kind, form) = targeted_messages_form(messages)?;
        if let Some(json) = form.get("messages") {
            self.log.debug_fmt(format_args!("target messages json: {}", json));
        }

        let path = match kind {
            TargetKind::RegId => MULTI_REG_ID_PATH,
            TargetKind::Alias => MULTI_ALIAS_PATH,
            TargetKind::Account => MULTI_ACCOUNT_PATH,
        };
        self.post(path, &form).await
    }
}
