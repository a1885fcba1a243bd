use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgGroup, Parser};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use xmpush::{Client, ClientConfig, LogLogger, Message, Response, TopicOp};

/// xmpush - Xiaomi push command line client
///
/// Credentials come from a JSON config file (--config / XMPUSH_CONFIG) or
/// from --app-secret and --package (XMPUSH_APP_SECRET / XMPUSH_PACKAGE).
/// Flags override values read from the file.
///
/// Examples:
///   xmpush send --reg-id REGID --title hi --description "hello there"
///   xmpush stats 20240101 20240107
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file with appSecret and packageName
    #[arg(long, short = 'c', env = "XMPUSH_CONFIG", value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// App secret used in the Authorization header
    #[arg(long, env = "XMPUSH_APP_SECRET", hide_env_values = true, global = true)]
    app_secret: Option<String>,

    /// Package name; repeat or separate with commas for several
    #[arg(
        long = "package",
        env = "XMPUSH_PACKAGE",
        value_delimiter = ',',
        global = true
    )]
    packages: Vec<String>,

    /// Use the sandbox environment
    #[arg(long, global = true)]
    sandbox: bool,

    /// API base URL (overrides the production and sandbox hosts)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    api_url: Option<String>,

    /// Feedback base URL used by invalid-reg-ids
    #[arg(long = "feedback-url", value_name = "URL", global = true)]
    feedback_url: Option<String>,

    /// Dump every request and response at debug level
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Send a message
    Send(SendArgs),

    /// Show daily delivery counters
    Stats(StatsArgs),

    /// Trace message status
    Status(StatusArgs),

    /// Subscribe registration ids or aliases to a topic
    Subscribe(SubscriptionArgs),

    /// Unsubscribe registration ids or aliases from a topic
    Unsubscribe(SubscriptionArgs),

    /// Fetch registration ids the service marked invalid
    InvalidRegIds,

    /// List the aliases set on a registration id
    Aliases {
        #[arg(value_name = "REG_ID")]
        reg_id: String,
    },

    /// List the topics a registration id is subscribed to
    Topics {
        #[arg(value_name = "REG_ID")]
        reg_id: String,
    },

    /// Check whether a scheduled job is still pending
    JobExists {
        #[arg(value_name = "JOB_ID")]
        job_id: String,
    },

    /// Delete a scheduled job
    JobDelete {
        #[arg(value_name = "JOB_ID")]
        job_id: String,
    },
}

#[derive(clap::Args, Debug)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["reg_id", "alias", "account", "topic", "all"])
))]
struct SendArgs {
    /// Registration id (repeatable)
    #[arg(long = "reg-id")]
    reg_id: Vec<String>,

    /// Alias (repeatable)
    #[arg(long)]
    alias: Vec<String>,

    /// User account (repeatable)
    #[arg(long)]
    account: Vec<String>,

    /// Topic; give 2 to 5 to combine them with --topic-op
    #[arg(long)]
    topic: Vec<String>,

    /// Send to every device
    #[arg(long)]
    all: bool,

    /// UNION, INTERSECTION or EXCEPT
    #[arg(long = "topic-op", default_value = "")]
    topic_op: String,

    #[arg(long)]
    title: String,

    #[arg(long)]
    description: String,

    #[arg(long, default_value = "")]
    payload: String,

    /// Deliver to the app instead of the notification bar
    #[arg(long = "pass-through")]
    pass_through: bool,

    /// -1 all, 1 sound, 2 vibrate, 4 lights
    #[arg(long = "notify-type", default_value_t = 1, allow_hyphen_values = true)]
    notify_type: i32,

    #[arg(long = "notify-id")]
    notify_id: Option<i64>,

    #[arg(long)]
    badge: Option<i64>,

    #[arg(long = "job-key")]
    job_key: Option<String>,

    /// Time to live in milliseconds
    #[arg(long)]
    ttl: Option<i64>,

    /// Delivery time in epoch milliseconds
    #[arg(long = "send-at")]
    send_at: Option<i64>,

    /// Receipt callback URL
    #[arg(long)]
    callback: Option<String>,

    /// Extra KEY=VALUE pair (repeatable)
    #[arg(long = "extra", value_parser = parse_key_value)]
    extra: Vec<(String, String)>,
}

#[derive(clap::Args, Debug)]
struct StatsArgs {
    /// First day, yyyyMMdd
    #[arg(value_parser = parse_date)]
    start: NaiveDate,

    /// Last day, yyyyMMdd
    #[arg(value_parser = parse_date)]
    end: NaiveDate,
}

#[derive(clap::Args, Debug)]
#[command(group(ArgGroup::new("by").required(true).args(["msg_id", "job_key", "begin"])))]
struct StatusArgs {
    #[arg(long = "msg-id")]
    msg_id: Option<String>,

    #[arg(long = "job-key")]
    job_key: Option<String>,

    /// Range start in epoch milliseconds
    #[arg(long, requires = "end")]
    begin: Option<i64>,

    /// Range end in epoch milliseconds
    #[arg(long, requires = "begin")]
    end: Option<i64>,
}

#[derive(clap::Args, Debug)]
#[command(group(ArgGroup::new("targets").required(true).args(["reg_id", "alias"])))]
struct SubscriptionArgs {
    /// Registration id (repeatable)
    #[arg(long = "reg-id")]
    reg_id: Vec<String>,

    /// Alias (repeatable)
    #[arg(long)]
    alias: Vec<String>,

    #[arg(long)]
    topic: String,

    #[arg(long)]
    category: Option<String>,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y%m%d").map_err(|e| format!("expected yyyyMMdd: {}", e))
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ClientConfig::new(String::new(), Vec::<String>::new()),
        };

        if let Some(secret) = &self.app_secret {
            config.app_secret = secret.clone();
        }
        if !self.packages.is_empty() {
            config.package_names = self.packages.clone();
        }
        if self.sandbox {
            config.sandbox = true;
        }
        if self.api_url.is_some() {
            config.api_url = self.api_url.clone();
        }
        if self.feedback_url.is_some() {
            config.feedback_url = self.feedback_url.clone();
        }

        Ok(config)
    }
}

impl SendArgs {
    fn message(&self) -> Message {
        let mut message = Message::new(self.title.as_str(), self.description.as_str());
        message
            .set_payload(self.payload.as_str())
            .set_notify_type(self.notify_type);

        if self.pass_through {
            message.enable_pass_through();
        }
        if let Some(id) = self.notify_id {
            message.set_notify_id(id);
        }
        if let Some(badge) = self.badge {
            message.set_badge(badge);
        }
        if let Some(job_key) = &self.job_key {
            message.set_job_key(job_key.as_str());
        }
        if let Some(ttl) = self.ttl {
            message.set_time_to_live(ttl);
        }
        if let Some(send_at) = self.send_at {
            message.set_time_to_send(send_at);
        }
        if let Some(callback) = &self.callback {
            message.set_callback(callback.as_str());
        }
        for (key, value) in &self.extra {
            message.add_extra(key.as_str(), value.as_str());
        }
        message
    }
}

async fn send(client: &Client, args: &SendArgs) -> Result<()> {
    let message = args.message();

    if !args.reg_id.is_empty() {
        report(client.send_to_reg_ids(&message, &args.reg_id).await?)
    } else if !args.alias.is_empty() {
        report(client.send_to_aliases(&message, &args.alias).await?)
    } else if !args.account.is_empty() {
        report(client.send_to_accounts(&message, &args.account).await?)
    } else if args.topic.len() == 1 {
        report(client.send_to_topic(&message, &args.topic[0]).await?)
    } else if !args.topic.is_empty() {
        let op: TopicOp = args.topic_op.parse()?;
        report(client.send_to_topics(&message, &args.topic, Some(op)).await?)
    } else {
        report(client.send_to_all(&message).await?)
    }
}

/// Prints the response and fails when the service reported an error code.
fn report<T: Serialize>(response: Response<T>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_ok() {
        let envelope = &response.envelope;
        let reason = if envelope.reason.is_empty() {
            &envelope.description
        } else {
            &envelope.reason
        };
        anyhow::bail!("push API returned code {}: {}", envelope.code, reason);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_module("xmpush", log::LevelFilter::Debug);
    }
    logger.init();

    let mut client = Client::from_config(cli.client_config()?).context("Failed to create client")?;
    if cli.verbose {
        client.set_logger(Arc::new(LogLogger));
    }

    match &cli.command {
        Commands::Send(args) => send(&client, args).await?,
        Commands::Stats(args) => report(client.stats(args.start, args.end).await?)?,
        Commands::Status(args) => {
            if let Some(msg_id) = &args.msg_id {
                report(client.message_status_by_id(msg_id).await?)?
            } else if let Some(job_key) = &args.job_key {
                report(client.message_status_by_job_key(job_key).await?)?
            } else if let (Some(begin), Some(end)) = (args.begin, args.end) {
                report(client.message_status_by_range(begin, end).await?)?
            }
        }
        Commands::Subscribe(args) => {
            let category = args.category.as_deref();
            let result = if args.reg_id.is_empty() {
                client.subscribe_aliases(&args.alias, &args.topic, category).await?
            } else {
                client.subscribe_reg_ids(&args.reg_id, &args.topic, category).await?
            };
            report(result)?
        }
        Commands::Unsubscribe(args) => {
            let category = args.category.as_deref();
            let result = if args.reg_id.is_empty() {
                client.unsubscribe_aliases(&args.alias, &args.topic, category).await?
            } else {
                client.unsubscribe_reg_ids(&args.reg_id, &args.topic, category).await?
            };
            report(result)?
        }
        Commands::InvalidRegIds => report(client.fetch_invalid_reg_ids().await?)?,
        Commands::Aliases { reg_id } => report(client.reg_id_aliases(reg_id).await?)?,
        Commands::Topics { reg_id } => report(client.reg_id_topics(reg_id).await?)?,
        Commands::JobExists { job_id } => report(client.schedule_job_exists(job_id).await?)?,
        Commands::JobDelete { job_id } => report(client.delete_schedule_job(job_id).await?)?,
    }
    Ok(())
}
