//! Client SDK for the Xiaomi push service.
//!
//! ```no_run
//! use xmpush::{Client, Message, NotifyType};
//!
//! # async fn run() -> xmpush::Result<()> {
//! let client = Client::new("appSecret", ["com.example.app"])?;
//!
//! let mut message = Message::new("title", "description");
//! message.set_notify_type(NotifyType::Sound).set_badge(1);
//!
//! let result = client.send_to_reg_ids(&message, &["regId"]).await?;
//! println!("sent {}", result.data.id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod logger;
pub mod message;
pub mod result;
pub mod validation;

pub use client::{Client, TopicOp};
pub use config::ClientConfig;
pub use error::{PushError, Result};
pub use logger::{DebugLog, LogLogger, NopLogger};
pub use message::{Message, NotifyType, TargetKind, TargetedMessage};
pub use result::{
    ApiResult, BatchStatusResult, Envelope, InvalidRegIdsResult, RegIdAliasResult,
    RegIdTopicResult, Response, SendResult, SingleStatusResult, StatsResult,
};
