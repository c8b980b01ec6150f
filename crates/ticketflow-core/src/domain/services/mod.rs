//! Domain services module

pub mod assignor;
pub mod classifier;
pub mod description;
pub mod escalation;
pub mod troubleshoot;

pub use assignor::{select_agent, skill_score, AgentCandidate};
pub use classifier::{classify_by_keywords, parse_classification, Classifier};
pub use description::{DescriptionWriter, DESCRIPTION_UNAVAILABLE};
pub use escalation::{detect_sentiment, EscalationDetector};
pub use troubleshoot::{fallback_steps, split_steps, TroubleshootGenerator, FALLBACK_STEPS};
