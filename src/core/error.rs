use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchdogError {
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Webhook URL is not set")]
    WebhookNotConfigured,

    #[error("Webhook rejected the message with status {status}")]
    WebhookRejected { status: u16 },
}

pub type Result<T> = std::result::Result<T, WatchdogError>;
