//! Notes aggregation pipeline
//!
//! Flattens voice notes embedded on members and leads into rows that
//! carry their owning client, scopes them by role, applies either the
//! AI semantic match-set or the advanced keyword/date filters, and
//! returns pages — flat (always most-recent-first) or grouped by client
//! (pagination counts groups, not notes).

use super::{contains_ci, paginate, Page, SortDirection};
use crate::model::{LeadId, MemberId, NoteId, UserId, VoiceNote};
use crate::scope::Viewer;
use crate::store::CrmStore;
use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

/// The client a note hangs off
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NoteClient {
    Member(MemberId),
    Lead(LeadId),
}

/// One flattened note row
#[derive(Debug, Clone)]
pub struct NoteRow {
    pub note_id: NoteId,
    pub client: NoteClient,
    pub client_name: String,
    pub summary: String,
    pub transcript_snippet: String,
    pub recording_date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub action_items: Vec<String>,
    /// Substrings the AI matched, when the semantic filter produced this row
    pub matched: Vec<String>,
}

/// Filter mode: untouched, AI semantic match-set, or advanced fields
#[derive(Debug, Clone, Default)]
pub enum NoteFilter {
    #[default]
    None,
    /// Note id → matched substrings, as returned by the AI gateway.
    /// Notes absent from the map are filtered out — a failed search is an
    /// empty map and shows nothing.
    Semantic(FxHashMap<NoteId, Vec<String>>),
    Advanced {
        /// Substring over summary and transcript
        keyword: Option<String>,
        from: Option<NaiveDate>,
        /// Inclusive through the end of this day
        to: Option<NaiveDate>,
    },
}

/// Full query for a notes derivation
#[derive(Debug, Clone, Default)]
pub struct NotesQuery {
    pub filter: NoteFilter,
    /// Admin-only narrowing to one advisor's book; ignored for advisors
    pub advisor: Option<UserId>,
}

/// One client's notes in grouped mode
#[derive(Debug, Clone)]
pub struct NoteGroup {
    pub client: NoteClient,
    pub client_name: String,
    pub notes: Vec<NoteRow>,
}

fn note_row(note: &VoiceNote, client: NoteClient, client_name: &str) -> NoteRow {
    NoteRow {
        note_id: note.id.clone(),
        client,
        client_name: client_name.to_string(),
        summary: note.summary.clone(),
        transcript_snippet: note.transcript_snippet.clone(),
        recording_date: note.recording_date,
        tags: note.tags.clone(),
        action_items: note.action_items.clone(),
        matched: Vec::new(),
    }
}

/// Flatten all notes visible to the viewer, in first-seen client order.
/// The admin-only advisor filter narrows to clients in that advisor's
/// book before any note-level filtering.
fn collect_rows(store: &CrmStore, viewer: &Viewer, query: &NotesQuery) -> Vec<NoteRow> {
    let advisor_filter = if viewer.is_admin() {
        query.advisor.as_ref()
    } else {
        None
    };

    let mut rows = Vec::new();
    for member in store.members().filter(|m| viewer.can_see_member(m)) {
        if let Some(advisor) = advisor_filter {
            if !member.assigned_to.contains(advisor) {
                continue;
            }
        }
        for note in &member.voice_notes {
            rows.push(note_row(
                note,
                NoteClient::Member(member.id.clone()),
                &member.name,
            ));
        }
    }
    for lead in store.leads().filter(|l| viewer.can_see_lead(l)) {
        if let Some(advisor) = advisor_filter {
            if &lead.assigned_to != advisor {
                continue;
            }
        }
        for note in &lead.voice_notes {
            rows.push(note_row(note, NoteClient::Lead(lead.id.clone()), &lead.name));
        }
    }
    rows
}

fn apply_filter(rows: Vec<NoteRow>, filter: &NoteFilter) -> Vec<NoteRow> {
    match filter {
        NoteFilter::None => rows,
        NoteFilter::Semantic(matches) => rows
            .into_iter()
            .filter_map(|mut row| {
                let snippets = matches.get(&row.note_id)?;
                row.matched = snippets.clone();
                Some(row)
            })
            .collect(),
        NoteFilter::Advanced { keyword, from, to } => rows
            .into_iter()
            .filter(|row| {
                if let Some(kw) = keyword.as_deref().filter(|s| !s.is_empty()) {
                    if !contains_ci(&row.summary, kw) && !contains_ci(&row.transcript_snippet, kw)
                    {
                        return false;
                    }
                }
                let day = row.recording_date.date_naive();
                if let Some(from) = from {
                    if day < *from {
                        return false;
                    }
                }
                if let Some(to) = to {
                    if day > *to {
                        return false;
                    }
                }
                true
            })
            .collect(),
    }
}

/// Flat chronological view: most recent recording first, regardless of
/// filter mode
pub fn run_flat(
    store: &CrmStore,
    viewer: &Viewer,
    query: &NotesQuery,
    page: usize,
) -> Page<NoteRow> {
    let mut rows = apply_filter(collect_rows(store, viewer, query), &query.filter);
    rows.sort_by(|a, b| SortDirection::Descending.apply(a.recording_date.cmp(&b.recording_date)));
    paginate(rows, page)
}

/// Grouped-by-client view: groups keep first-seen client order, notes
/// inside each group run most-recent-first, and pagination counts groups
pub fn run_grouped(
    store: &CrmStore,
    viewer: &Viewer,
    query: &NotesQuery,
    page: usize,
) -> Page<NoteGroup> {
    let rows = apply_filter(collect_rows(store, viewer, query), &query.filter);

    let mut groups: IndexMap<NoteClient, NoteGroup> = IndexMap::new();
    for row in rows {
        groups
            .entry(row.client.clone())
            .or_insert_with(|| NoteGroup {
                client: row.client.clone(),
                client_name: row.client_name.clone(),
                notes: Vec::new(),
            })
            .notes
            .push(row);
    }

    let mut groups: Vec<NoteGroup> = groups.into_values().collect();
    for group in &mut groups {
        group
            .notes
            .sort_by(|a, b| b.recording_date.cmp(&a.recording_date));
    }

    paginate(groups, page)
}
