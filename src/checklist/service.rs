use super::board::ChecklistSnapshot;
use crate::api::{
    ApiError, ApiResult, ChecklistQuery, CreateChecklistRequest, CustomItem, Gateway,
    ToggleCompletionRequest,
};
use crate::models::{
    ActivityRecord, ChecklistGroup, ChecklistType, PriorityTier, ReflectionDraft, Task,
};
use crate::state::Session;
use crate::util::{to_iso_timestamp, CancelToken};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use leptos::logging::{error, warn};

pub(crate) const SAVE_ACTIVITY_ERROR: &str = "Failed to save activity.";
pub(crate) const TOGGLE_ERROR: &str = "Failed to update task completion.";
pub(crate) const CREATE_TASK_ERROR: &str = "Failed to add new task.";
pub(crate) const TASK_NAME_REQUIRED: &str = "Task name is required.";

/// Fetch every checklist type for `tier` in parallel and assemble the groups.
///
/// All requests must be delivered: one transport failure fails the whole
/// load. A delivered reply that is not a success only drops its own group.
/// Groups come back in `ChecklistType` order.
pub(crate) async fn load_checklist<G: Gateway>(
    gateway: &G,
    session: &Session,
    tier: PriorityTier,
    cancel: &CancelToken,
) -> ApiResult<ChecklistSnapshot> {
    let requests = ChecklistType::all().into_iter().map(|checklist_type| {
        let query = ChecklistQuery {
            user_id: session.user_id().to_string(),
            checklist_type,
        };
        async move {
            let reply = gateway.fetch_checklist(tier, &query).await;
            (checklist_type, reply)
        }
    });

    let replies = join_all(requests).await;

    if cancel.is_cancelled() {
        return Err(ApiError::cancelled());
    }

    let mut groups = Vec::with_capacity(replies.len());
    for (checklist_type, reply) in replies {
        let envelope = reply.map_err(|e| {
            error!("{} Failed to fetch {checklist_type} checklist: {e}", tier.log_tag());
            e
        })?;

        if !envelope.success {
            warn!(
                "{} Error fetching {checklist_type} checklist: {}",
                tier.log_tag(),
                envelope.message.as_deref().unwrap_or("no message")
            );
            continue;
        }

        groups.push(ChecklistGroup {
            checklist_type,
            items: envelope.data.unwrap_or_default(),
        });
    }

    Ok(ChecklistSnapshot::from_groups(groups))
}

/// Log the reflection as an activity, then mark the task complete.
///
/// The completion toggle is only sent once the activity write has been
/// accepted. Nothing is applied locally here; callers reload on success.
pub(crate) async fn save_reflection_and_complete<G: Gateway>(
    gateway: &G,
    session: &Session,
    checklist_type: ChecklistType,
    task: &Task,
    draft: &ReflectionDraft,
    now: DateTime<Utc>,
) -> Result<(), String> {
    let stamp = to_iso_timestamp(now);
    let record = ActivityRecord {
        user_id: session.user_id().to_string(),
        date: stamp.clone(),
        name: task.name.clone(),
        time: stamp,
        context: draft.context.clone(),
        feeling: draft.feeling,
    };

    gateway
        .create_activity(&record)
        .await
        .and_then(|envelope| envelope.ensure_success(SAVE_ACTIVITY_ERROR))
        .map_err(|e| {
            error!("[Reflection] Failed to save activity for task {}: {e}", task.id);
            e.user_message(SAVE_ACTIVITY_ERROR)
        })?;

    let toggle = ToggleCompletionRequest {
        user_id: session.user_id().to_string(),
        checklist_type,
        task_id: task.id.clone(),
        is_completed: true,
    };

    gateway
        .toggle_completion(&toggle)
        .await
        .and_then(|envelope| envelope.ensure_success(TOGGLE_ERROR))
        .map_err(|e| {
            error!("[Reflection] Failed to complete task {}: {e}", task.id);
            e.user_message(TOGGLE_ERROR)
        })
}

/// Values of the "Add New Task" form.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct NewTaskForm {
    pub name: String,
    pub note: String,
    pub checklist_type: ChecklistType,
}

pub(crate) async fn create_task<G: Gateway>(
    gateway: &G,
    session: &Session,
    tier: PriorityTier,
    form: &NewTaskForm,
) -> Result<(), String> {
    let name = form.name.trim();
    if name.is_empty() {
        let e = ApiError::validation(TASK_NAME_REQUIRED);
        warn!("{} Not adding task: {e}", tier.log_tag());
        return Err(e.user_message(CREATE_TASK_ERROR));
    }

    let req = CreateChecklistRequest {
        user_id: session.user_id().to_string(),
        checklist_type: form.checklist_type,
        custom_items: vec![CustomItem {
            name: name.to_string(),
            note: form.note.trim().to_string(),
            completed: false,
            priority: tier.item_tag().to_string(),
        }],
    };

    gateway
        .create_checklist(&req)
        .await
        .and_then(|envelope| envelope.ensure_success(CREATE_TASK_ERROR))
        .map_err(|e| {
            error!("{} Failed to add new task: {e}", tier.log_tag());
            e.user_message(CREATE_TASK_ERROR)
        })
}
