#![doc = include_str!("../README.md")]

pub mod classifier;
pub mod collector;
pub mod command;
pub mod error;
pub mod identity;
pub mod lang;
pub mod notify;
pub mod pipeline;
pub mod reconciler;
pub mod webhook;

// --- 주요 타입 re-export ---

pub use classifier::{LineFrame, LogEvent};
pub use collector::{FileCollector, FileCollectorConfig, RawLine};
pub use command::{Command, CommandSource, ConsoleSource, PlayerSource};
pub use error::BridgeError;
pub use identity::IdentityTable;
pub use notify::Outbound;
pub use pipeline::{BridgePipeline, BridgePipelineBuilder, PipelineState, TellMessage};
pub use reconciler::Reconciler;
pub use webhook::{DeliveryJob, HttpDispatcher};
