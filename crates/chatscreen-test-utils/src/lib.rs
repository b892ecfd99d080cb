// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Chatscreen integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockGenerator`] - Mock generation provider with queued replies
//! - [`MockTranscriber`] - Transcriber returning fixed text
//! - [`TestHarness`] - Full app state and router over a temp database

pub mod harness;
pub mod mock_provider;
pub mod mock_transcriber;

pub use harness::TestHarness;
pub use mock_provider::{MockGenerator, MockReply};
pub use mock_transcriber::MockTranscriber;
