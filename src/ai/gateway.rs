//! Gateway capabilities over the LLM backend
//!
//! Each capability builds a prompt, runs it through the backend, and
//! parses a fixed JSON shape out of the reply. All of them uphold the
//! same contract: no credential → immediate fallback without a network
//! attempt; any transport or parse failure → the same fallback, logged
//! via `tracing` and never raised to the caller.

use super::client::GeminiClient;
use super::{AiOutcome, LlmBackend};
use crate::config::AiConfig;
use crate::model::{GeoPoint, MemberId, NoteId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// A member offered to the search capability
#[derive(Debug, Clone, Serialize)]
pub struct MemberCandidate {
    pub id: MemberId,
    pub name: String,
    pub city: Option<String>,
    pub tier: String,
}

/// A note offered to the semantic-search capability
#[derive(Debug, Clone, Serialize)]
pub struct NoteCandidate {
    pub id: NoteId,
    pub summary: String,
    pub transcript_snippet: String,
}

/// One stop on a planned visit route
#[derive(Debug, Clone, Serialize)]
pub struct RouteStop {
    pub name: String,
    pub point: GeoPoint,
}

/// Narrative route description
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteSummary {
    pub summary: String,
    #[serde(default)]
    pub landmarks: Vec<String>,
}

/// One point of a growth series, as exchanged with the forecaster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthObservation {
    pub label: String,
    pub count: f64,
}

/// Structured reply from the payment-status probe
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentProbe {
    pub transaction_id: String,
    pub amount: f64,
    #[serde(default)]
    pub date: Option<String>,
    pub status: String,
    #[serde(default)]
    pub status_reason: Option<String>,
}

/// Context row for the daily-focus capability
#[derive(Debug, Clone, Serialize)]
pub struct FocusCandidate {
    pub member_name: String,
    pub policy_type: String,
    pub days_left: i64,
}

/// One suggested daily action
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FocusItem {
    pub title: String,
    #[serde(default)]
    pub reason: String,
}

/// One turn of the chat assistant conversation
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

const CHAT_FALLBACK: &str =
    "The assistant is unavailable right now. Please try again in a little while.";

/// Entry point for every external-AI capability
pub struct AiGateway {
    backend: Option<Arc<dyn LlmBackend>>,
}

impl AiGateway {
    /// Build from configuration. A config without a usable key produces
    /// a gateway that always falls back — by contract, not by accident.
    pub fn new(config: &AiConfig) -> Self {
        if !config.is_usable() {
            debug!("AI gateway running without a backend, all capabilities fall back");
            return Self { backend: None };
        }
        match GeminiClient::new(config) {
            Ok(client) => Self {
                backend: Some(Arc::new(client)),
            },
            Err(e) => {
                warn!(error = %e, "failed to build LLM client, falling back");
                Self { backend: None }
            }
        }
    }

    /// Build over any backend (scripted backends in tests)
    pub fn with_backend(backend: Arc<dyn LlmBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// A gateway that always answers with fallbacks
    pub fn disabled() -> Self {
        Self { backend: None }
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Run a prompt and parse the reply as `T`, or land on `fallback`
    async fn ask<T: serde::de::DeserializeOwned>(
        &self,
        capability: &str,
        prompt: &str,
        fallback: T,
    ) -> AiOutcome<T> {
        let Some(backend) = &self.backend else {
            return AiOutcome::Fallback(fallback);
        };
        let reply = match backend.generate(prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(capability, error = %e, "LLM call failed, falling back");
                return AiOutcome::Fallback(fallback);
            }
        };
        match serde_json::from_str(&extract_json(&reply)) {
            Ok(value) => AiOutcome::Ok(value),
            Err(e) => {
                warn!(capability, error = %e, "unparseable LLM reply, falling back");
                AiOutcome::Fallback(fallback)
            }
        }
    }

    /// Natural-language member search. Returns matching member ids; the
    /// member pipeline intersects them with its role-scoped set, so the
    /// reply never widens what a viewer can see. Fallback: no matches.
    pub async fn search_members(
        &self,
        query: &str,
        candidates: &[MemberCandidate],
    ) -> AiOutcome<Vec<MemberId>> {
        let prompt = format!(
            "You are searching a CRM member list.\n\
             Members (JSON): {}\n\
             Query: {query:?}\n\
             Reply with ONLY a JSON array of the matching member ids, e.g. [\"m1\",\"m2\"]. \
             Reply [] when nothing matches.",
            json!(candidates)
        );
        let ids: AiOutcome<Vec<String>> = self.ask("search_members", &prompt, Vec::new()).await;
        match ids {
            AiOutcome::Ok(ids) => AiOutcome::Ok(ids.into_iter().map(MemberId::new).collect()),
            AiOutcome::Fallback(_) => AiOutcome::Fallback(Vec::new()),
        }
    }

    /// Semantic search over voice notes. Returns note id → matched
    /// substrings, ready for the notes pipeline's semantic filter.
    /// Fallback: empty map (a failed search shows zero notes).
    pub async fn semantic_note_search(
        &self,
        query: &str,
        notes: &[NoteCandidate],
    ) -> AiOutcome<FxHashMap<NoteId, Vec<String>>> {
        let prompt = format!(
            "You are searching voice-note summaries and transcripts.\n\
             Notes (JSON): {}\n\
             Query: {query:?}\n\
             Reply with ONLY a JSON object mapping matching note ids to the \
             matched phrases, e.g. {{\"n1\": [\"renewal call\"]}}. Reply {{}} \
             when nothing matches.",
            json!(notes)
        );
        let raw: AiOutcome<FxHashMap<String, Vec<String>>> =
            self.ask("semantic_note_search", &prompt, FxHashMap::default()).await;
        match raw {
            AiOutcome::Ok(map) => AiOutcome::Ok(
                map.into_iter()
                    .map(|(id, snippets)| (NoteId::new(id), snippets))
                    .collect(),
            ),
            AiOutcome::Fallback(_) => AiOutcome::Fallback(FxHashMap::default()),
        }
    }

    /// Narrative summary of a visit route. Fallback: stop count plus the
    /// leg-by-leg haversine distance, no landmarks.
    pub async fn summarize_route(&self, stops: &[RouteStop]) -> AiOutcome<RouteSummary> {
        let total_km: f64 = stops
            .windows(2)
            .map(|leg| crate::geo::haversine_km(leg[0].point, leg[1].point))
            .sum();
        let fallback = RouteSummary {
            summary: format!(
                "Planned route with {} stops covering {:.1} km.",
                stops.len(),
                total_km
            ),
            landmarks: Vec::new(),
        };
        let prompt = format!(
            "Summarize this customer-visit route for an insurance advisor.\n\
             Stops (JSON, in visit order): {}\n\
             Reply with ONLY a JSON object {{\"summary\": string, \
             \"landmarks\": [string]}}.",
            json!(stops)
        );
        self.ask("summarize_route", &prompt, fallback).await
    }

    /// Extend a growth series three months forward. Fallback: empty —
    /// the caller keeps the historical series unchanged.
    pub async fn forecast_growth(
        &self,
        history: &[GrowthObservation],
    ) -> AiOutcome<Vec<GrowthObservation>> {
        let prompt = format!(
            "Given this monthly customer-count series, forecast the next 3 \
             months.\nSeries (JSON): {}\n\
             Reply with ONLY a JSON array of {{\"label\": string, \"count\": \
             number}} for the 3 forecast months.",
            json!(history)
        );
        self.ask("forecast_growth", &prompt, Vec::new()).await
    }

    /// Probe a premium payment by free-text reference. Fallback: an
    /// Unknown-status probe echoing the reference.
    pub async fn payment_status(&self, reference: &str) -> AiOutcome<PaymentProbe> {
        let fallback = PaymentProbe {
            transaction_id: reference.to_string(),
            amount: 0.0,
            date: None,
            status: "Unknown".to_string(),
            status_reason: Some("Payment service unavailable".to_string()),
        };
        let prompt = format!(
            "Look up the premium payment for reference {reference:?}.\n\
             Reply with ONLY a JSON object {{\"transaction_id\": string, \
             \"amount\": number, \"date\": string, \"status\": string, \
             \"status_reason\": string}}."
        );
        self.ask("payment_status", &prompt, fallback).await
    }

    /// Ranked daily actions for an advisor. Fallback: a deterministic
    /// list built from renewals due within a week.
    pub async fn todays_focus(&self, candidates: &[FocusCandidate]) -> AiOutcome<Vec<FocusItem>> {
        let fallback = candidates
            .iter()
            .filter(|c| (0..=7).contains(&c.days_left))
            .map(|c| FocusItem {
                title: format!("Follow up with {} on {} renewal", c.member_name, c.policy_type),
                reason: format!("Due in {} days", c.days_left),
            })
            .collect();
        let prompt = format!(
            "Rank the most valuable actions for an insurance advisor today.\n\
             Renewal context (JSON): {}\n\
             Reply with ONLY a JSON array of {{\"title\": string, \"reason\": \
             string}}, most important first, at most 5 items.",
            json!(candidates)
        );
        self.ask("todays_focus", &prompt, fallback).await
    }

    /// Suggest one additional product for a member, or nothing.
    /// Fallback: no suggestion.
    pub async fn suggest_upsell(&self, member_summary: &str) -> AiOutcome<Option<String>> {
        let prompt = format!(
            "Given this CRM member profile, suggest one additional insurance \
             product worth proposing, or null if none fits.\n\
             Profile: {member_summary}\n\
             Reply with ONLY a JSON string or null."
        );
        self.ask("suggest_upsell", &prompt, None).await
    }

    /// Conversational assistant turn. Fallback: a canned apology.
    pub async fn chat(&self, messages: &[ChatMessage]) -> AiOutcome<String> {
        let Some(backend) = &self.backend else {
            return AiOutcome::Fallback(CHAT_FALLBACK.to_string());
        };
        let transcript = messages
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "You are the FinRoots CRM assistant for insurance advisors. \
             Continue the conversation with one helpful reply, plain text \
             only.\n\n{transcript}\nassistant:"
        );
        match backend.generate(&prompt).await {
            Ok(reply) if !reply.trim().is_empty() => AiOutcome::Ok(reply.trim().to_string()),
            Ok(_) => AiOutcome::Fallback(CHAT_FALLBACK.to_string()),
            Err(e) => {
                warn!(capability = "chat", error = %e, "LLM call failed, falling back");
                AiOutcome::Fallback(CHAT_FALLBACK.to_string())
            }
        }
    }
}

/// Extract a JSON payload from an LLM reply that may wrap it in markdown
/// fences or prose
fn extract_json(response: &str) -> String {
    let trimmed = response.trim();

    // Fenced code block: take the first one, skipping a language tag
    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        let code_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        if let Some(end) = after_fence[code_start..].find("```") {
            return after_fence[code_start..code_start + end].trim().to_string();
        }
    }

    // No fences: slice from the first JSON opener to the matching closer
    let opener = trimmed.find(|c| c == '{' || c == '[');
    if let Some(start) = opener {
        let closer = if trimmed[start..].starts_with('{') {
            '}'
        } else {
            ']'
        };
        if let Some(end) = trimmed.rfind(closer) {
            if end > start {
                return trimmed[start..=end].to_string();
            }
        }
    }

    trimmed.to_string()
}
