pub mod cancel;
pub mod config;
pub mod diagnosis;
pub mod error;
pub mod history;
pub mod metrics;
pub mod model;
pub mod platform;
pub mod remediation;
pub mod serializer;
pub mod threshold;

pub use cancel::CancelToken;
pub use config::{Config, ReasoningConfig, ThresholdPolicy};
pub use diagnosis::{
    DiagnosisClient, DiagnosisError, DiagnosisRequest, DiagnosisResult, FixAction,
    HttpReasoningService, ReasoningService, ServiceError, Status, UnavailableCause,
};
pub use error::{CoreError, Result};
pub use history::HistoryBuffer;
pub use metrics::{MetricSource, MetricsCollector};
pub use model::*;
pub use platform::PlatformProvider;
pub use remediation::{gate, Action};
pub use serializer::{deserialize, serialize, DecodeError};
pub use threshold::{evaluate, Evaluation};
