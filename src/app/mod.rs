use crate::model::{Activity, Category};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Collection state owned by the reducer. Widgets read it and request
/// changes through [`update`]; nothing else mutates it.
#[derive(Clone, Debug, Default)]
pub struct ActivityState {
    pub activities: Vec<Activity>,
    /// Record currently selected for editing, if any.
    pub active_id: Option<Uuid>,
}

impl ActivityState {
    pub fn calories_consumed(&self) -> u32 {
        self.sum_for(Category::Food)
    }

    pub fn calories_burned(&self) -> u32 {
        self.sum_for(Category::Exercise)
    }

    pub fn net_calories(&self) -> i64 {
        i64::from(self.calories_consumed()) - i64::from(self.calories_burned())
    }

    fn sum_for(&self, category: Category) -> u32 {
        self.activities
            .iter()
            .filter(|a| a.category == category)
            .map(|a| a.calories)
            .sum()
    }
}

/// Tagged intents accepted by the reducer. Wire shape is adjacently tagged:
/// `{"kind": "save-activity", "payload": {"newActivity": {...}}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "kebab-case")]
pub enum ActivityAction {
    SaveActivity {
        #[serde(rename = "newActivity")]
        new_activity: Activity,
    },
    SetActiveId {
        id: Uuid,
    },
    DeleteActivity {
        id: Uuid,
    },
    RestartApp,
}

pub fn update(state: &mut ActivityState, action: ActivityAction) {
    match action {
        ActivityAction::SaveActivity { new_activity } => {
            if state.active_id.is_some() {
                if let Some(slot) = state
                    .activities
                    .iter_mut()
                    .find(|a| a.id == new_activity.id)
                {
                    *slot = new_activity;
                }
            } else {
                state.activities.push(new_activity);
            }
            state.active_id = None;
        }
        ActivityAction::SetActiveId { id } => {
            state.active_id = Some(id);
        }
        ActivityAction::DeleteActivity { id } => {
            state.activities.retain(|a| a.id != id);
            // Never leave the active id dangling at a removed record.
            if state.active_id == Some(id) {
                state.active_id = None;
            }
        }
        ActivityAction::RestartApp => {
            *state = ActivityState::default();
        }
    }
}
