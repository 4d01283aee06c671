//! Datatier AI - LLM integration for column sensitivity classification
//!
//! This crate provides:
//! - Remote classification configuration (`RemoteConfig`)
//! - A chat-completion API client (OpenAI-compatible, e.g. OpenRouter)
//! - Prompt building and response parsing
//! - The remote classifier with heuristic fallback
//! - The engine that picks a strategy and classifies columns concurrently

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod prompt;
pub mod remote;

pub use client::LlmClient;
pub use config::{InvalidLabelPolicy, RemoteConfig, ResponseFormat};
pub use engine::ClassificationEngine;
pub use error::RemoteError;
pub use remote::RemoteClassifier;
