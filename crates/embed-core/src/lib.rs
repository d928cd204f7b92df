//! Service matching for embed blocks
//!
//! This crate recognizes URLs from video, music, social and code-sharing
//! services, composes the built-in service table with user configuration,
//! and resolves URLs into embeddable resources.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod composer;
pub mod config;
pub mod frame;
pub mod registry;
pub mod resolver;
pub mod rule;
pub mod services;
pub mod validator;

pub use composer::{compose, compose_with_patterns, ComposedServices};
pub use config::{EmbedConfig, ServiceSetting};
pub use frame::{render_frame, FrameError};
pub use registry::{PatternTable, Registry};
pub use resolver::{resolve, EmbedDescriptor, ResolveError};
pub use rule::{IdExtractor, MatchRule, RuleDraft, REMOTE_ID_PLACEHOLDER};
