//! # SQL Query Advisor Library
//!
//! Heuristic analysis of SQL statements: complexity rating and optimization
//! suggestions computed from a shallow token tree.
//!
//! - [`analyzer`] - `QueryAnalyzer`, extractors, scoring and suggestions
//! - [`statement`] - Lexing, statement trees and statement splitting
//! - [`app`] - Orchestration of a command-line run
//! - [`config`] - Configuration loading and validation
//! - [`output`] - Result formatting for text, JSON and YAML
//! - [`logging`] - Subscriber setup for the binary
//! - [`error`] - Error types and constructors

pub mod analyzer;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod statement;
