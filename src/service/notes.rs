//! Action-item lifecycle on voice notes
//!
//! Each action item on a note can be dismissed (removed) or converted
//! into a task linked to the note's owning client. Both paths are
//! "remove this item from this note"; conversion adds the task creation
//! side-effect first. Dismissing an item that is already gone is a
//! no-op, never an error.

use super::task::{AssignTarget, TaskDraft, TaskService};
use super::{ServiceError, ServiceResult};
use crate::model::{NoteId, TaskId, TaskLink};
use crate::pipeline::notes::NoteClient;
use crate::scope::Viewer;
use crate::store::{CrmStore, StoreError};
use chrono::{DateTime, Utc};
use tracing::info;

fn note_mut<'a>(
    store: &'a mut CrmStore,
    owner: &NoteClient,
    note_id: &NoteId,
) -> ServiceResult<&'a mut crate::model::VoiceNote> {
    let note = match owner {
        NoteClient::Member(member_id) => {
            if store.member(member_id).is_none() {
                return Err(StoreError::MemberNotFound(member_id.clone()).into());
            }
            store.member_note_mut(member_id, note_id)
        }
        NoteClient::Lead(lead_id) => {
            if store.lead(lead_id).is_none() {
                return Err(StoreError::LeadNotFound(lead_id.clone()).into());
            }
            store.lead_note_mut(lead_id, note_id)
        }
    };
    note.ok_or_else(|| ServiceError::NoteNotFound(note_id.clone()))
}

/// Remove an action item from a note without creating anything.
/// Returns whether the item was actually present.
pub fn dismiss_action_item(
    store: &mut CrmStore,
    owner: &NoteClient,
    note_id: &NoteId,
    item: &str,
) -> ServiceResult<bool> {
    let note = note_mut(store, owner, note_id)?;
    Ok(note.remove_action_item(item))
}

/// Convert an action item into a task for `actor`, linked to the note's
/// owning client, then remove the item from the note. When the item is
/// no longer on the note (already converted or dismissed elsewhere)
/// nothing is created and `None` comes back.
pub fn convert_action_item(
    store: &mut CrmStore,
    owner: &NoteClient,
    note_id: &NoteId,
    item: &str,
    actor: &Viewer,
    now: DateTime<Utc>,
) -> ServiceResult<Option<TaskId>> {
    {
        let note = note_mut(store, owner, note_id)?;
        if !note.action_items.iter().any(|a| a == item) {
            return Ok(None);
        }
    }

    let link = match owner {
        NoteClient::Member(id) => TaskLink::Member(id.clone()),
        NoteClient::Lead(id) => TaskLink::Lead(id.clone()),
    };
    let draft = TaskDraft::new(item, link);
    let created = TaskService::create_bulk(
        store,
        actor,
        &draft,
        &AssignTarget::Advisors(vec![actor.user_id.clone()]),
        now,
    )?;

    // Task exists; now take the item off the note
    let note = note_mut(store, owner, note_id)?;
    note.remove_action_item(item);

    let task_id = created.into_iter().next();
    info!(note = %note_id, task = ?task_id, "action item converted to task");
    Ok(task_id)
}
