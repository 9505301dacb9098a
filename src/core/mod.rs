//! Core modules for CompanionMind

pub mod lexicon;
pub mod classifier;
pub mod history;
pub mod trend;
pub mod pattern;
pub mod sensors;
pub mod fusion;
pub mod reply;
pub mod subject;
pub mod registry;
pub mod service;
pub mod api;

pub use lexicon::{Lexicon, STANDARD_LEXICON};
pub use classifier::SentimentClassifier;
pub use history::{SentimentHistory, append_and_analyze};
pub use trend::TrendAnalyzer;
pub use pattern::PatternDetector;
pub use fusion::assess_combined_risk;
pub use reply::{ReplyGenerator, CommandReply, FixedReply, reply_or_fallback, clean_reply, build_prompt};
pub use subject::Subject;
pub use registry::{SubjectRegistry, SubjectHandle, SubjectSlot, DEFAULT_SUBJECT};
pub use service::{CompanionService, SensorOutcome};
pub use api::{create_router, run_server};
