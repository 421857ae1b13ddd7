use engine::EngineError;
use teloxide::RequestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("store error: {0}")]
    Engine(#[from] EngineError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("delivery error: {0}")]
    Delivery(#[from] RequestError),
    #[error("invalid schedule: {0}")]
    Schedule(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}
