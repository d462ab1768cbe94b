//! External-AI gateway
//!
//! Everything "intelligent" — member search, note semantics, route
//! summaries, forecasting, chat — is delegated to an external LLM. The
//! gateway owns the no-throw contract: a missing credential, a network
//! failure or an unparseable response all collapse into a tagged
//! fallback value, logged but never propagated. Callers branch on
//! [`AiOutcome`] rather than on errors.

pub mod client;
pub mod gateway;

pub use client::GeminiClient;
pub use gateway::{
    AiGateway, ChatMessage, FocusCandidate, FocusItem, GrowthObservation, MemberCandidate,
    NoteCandidate, PaymentProbe, RouteStop, RouteSummary,
};

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Errors internal to the AI boundary. These never cross the gateway:
/// every public capability absorbs them into a fallback.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("LLM API error: {0}")]
    ApiError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type AiResult<T> = Result<T, AiError>;

/// A gateway result, tagged with how it was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiOutcome<T> {
    /// The external service answered and the answer parsed
    Ok(T),
    /// A defined stand-in; the service was unavailable, unconfigured, or
    /// returned something unusable
    Fallback(T),
}

impl<T> AiOutcome<T> {
    /// The carried value, however it was produced
    pub fn value(self) -> T {
        match self {
            AiOutcome::Ok(v) | AiOutcome::Fallback(v) => v,
        }
    }

    pub fn as_value(&self) -> &T {
        match self {
            AiOutcome::Ok(v) | AiOutcome::Fallback(v) => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AiOutcome::Fallback(_))
    }
}

/// Observable state of one AI call as UI-facing code tracks it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiTaskState<T> {
    /// Request submitted, nothing resolved yet
    Pending,
    Done(AiOutcome<T>),
}

/// Pluggable LLM transport. The production implementation is
/// [`GeminiClient`]; tests inject a scripted backend.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> AiResult<String>;
}

/// Gate against duplicate in-flight submissions. One outstanding request
/// at a time; a second `begin` while the first guard lives returns
/// `None`. No coalescing, no cancellation — the resolution of whichever
/// request completes simply overwrites prior derived state.
#[derive(Debug, Default)]
pub struct RequestGate {
    busy: AtomicBool,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to claim the gate. The returned guard releases it on drop.
    pub fn begin(&self) -> Option<GateGuard<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Some(GateGuard { gate: self })
        } else {
            None
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the owning [`RequestGate`] when dropped, on every exit path
pub struct GateGuard<'a> {
    gate: &'a RequestGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}
