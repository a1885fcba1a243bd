//! Form payloads sent to the push endpoints.

use serde::Serialize;
use url::form_urlencoded;

use crate::error::{PushError, Result};
use crate::message::{Message, TargetKind, TargetedMessage};
use crate::validation::validate_message;

/// Most recipients one single-message send may address.
pub const MAX_TARGETS: usize = 1000;

/// Ordered `application/x-www-form-urlencoded` fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: Vec<(String, String)>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field. Keys may repeat; order is kept when encoding.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `application/x-www-form-urlencoded` form of all fields, in insertion order.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.fields)
            .finish()
    }
}

/// Validates `message` and renders its common send fields.
pub fn message_to_form(message: &Message, package_names: &[String]) -> Result<Form> {
    validate_message(message)?;

    let mut form = Form::new();
    form.add("restricted_package_name", package_names.join(","))
        .add("payload", message.payload.as_str())
        .add("title", message.title.as_str())
        .add("description", message.description.as_str())
        .add("notify_type", message.notify_type.to_string())
        .add("pass_through", message.pass_through.to_string());

    if message.notify_id > 0 {
        form.add("notify_id", message.notify_id.to_string());
    }
    if message.time_to_live > 0 {
        form.add("time_to_live", message.time_to_live.to_string());
    }
    if message.time_to_send > 0 {
        form.add("time_to_send", message.time_to_send.to_string());
    }

    for (key, value) in &message.extra {
        form.add(format!("extra.{}", key), value.as_str());
    }

    Ok(form)
}

/// Message fields plus a comma-joined recipient list under `field`.
pub fn message_with_targets<S: AsRef<str>>(
    message: &Message,
    package_names: &[String],
    field: &str,
    targets: &[S],
) -> Result<Form> {
    let mut form = message_to_form(message, package_names)?;

    if targets.is_empty() || targets.len() > MAX_TARGETS {
        return Err(PushError::validation(format!(
            "count should more than 1 and less than {}",
            MAX_TARGETS
        )));
    }

    form.add(field, join(targets, ","));
    Ok(form)
}

#[derive(Serialize)]
struct TargetedEntry<'a> {
    target: &'a str,
    message: &'a Message,
}

/// Validates every entry and packs the batch into the `messages` JSON field.
///
/// Returns the batch's target kind; every entry must share it.
pub fn targeted_messages_form(messages: &[TargetedMessage]) -> Result<(TargetKind, Form)> {
    let first = messages
        .first()
        .ok_or_else(|| PushError::validation("messages can't empty"))?;
    let kind = first.kind();

    let mut entries = Vec::with_capacity(messages.len());
    for m in messages {
        validate_message(m.message())?;
        if m.kind() != kind {
            return Err(PushError::validation(format!(
                "mixed target types in one batch: {} and {}",
                kind,
                m.kind()
            )));
        }
        entries.push(TargetedEntry {
            target: m.target(),
            message: m.message(),
        });
    }

    let json = serde_json::to_string(&entries)
        .map_err(|e| PushError::validation(format!("failed to encode messages: {}", e)))?;

    let mut form = Form::new();
    form.add("messages", json);
    Ok((kind, form))
}

pub(crate) fn join<S: AsRef<str>>(items: &[S], sep: &str) -> String {
    items.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(sep)
}
