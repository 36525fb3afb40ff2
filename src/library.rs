use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::outline::Section;
use crate::progress::{CompletionTracker, ItemKey};

/// A generated plan the user chose to keep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPlan {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub completion: CompletionTracker,
}

/// In-memory plan library. Nothing here outlives the process.
#[derive(Debug, Default)]
pub struct PlanLibrary {
    plans: Vec<SavedPlan>,
}

impl PlanLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&mut self, title: impl Into<String>, sections: Vec<Section>) -> Uuid {
        let plan = SavedPlan {
            id: Uuid::new_v4(),
            title: title.into(),
            created_at: Utc::now(),
            sections,
            completion: CompletionTracker::new(),
        };
        let id = plan.id;
        info!(plan_id = %id, title = %plan.title, "plan saved");
        self.plans.push(plan);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<&SavedPlan> {
        self.plans.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut SavedPlan> {
        self.plans.iter_mut().find(|p| p.id == id)
    }

    /// Toggle an item on a saved plan. `None` when the plan is unknown.
    pub fn toggle_item(&mut self, id: Uuid, key: ItemKey) -> Option<bool> {
        self.get_mut(id).map(|plan| plan.completion.toggle(key))
    }

    /// Saved plans, newest first.
    pub fn list(&self) -> Vec<&SavedPlan> {
        let mut plans: Vec<_> = self.plans.iter().collect();
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        plans
    }

    pub fn remove(&mut self, id: Uuid) -> Option<SavedPlan> {
        let idx = self.plans.iter().position(|p| p.id == id)?;
        Some(self.plans.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
