use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::outline::DayPlan;

/// Identifies one checkable line item inside a day plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    pub day: String,
    /// Subsection index, or `None` for the day's free lines.
    pub subsection: Option<usize>,
    pub index: usize,
}

impl ItemKey {
    pub fn free(day: impl Into<String>, index: usize) -> Self {
        Self {
            day: day.into(),
            subsection: None,
            index,
        }
    }

    pub fn in_subsection(day: impl Into<String>, subsection: usize, index: usize) -> Self {
        Self {
            day: day.into(),
            subsection: Some(subsection),
            index,
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subsection {
            Some(sub) => write!(f, "{}/{}/{}", self.day, sub, self.index),
            None => write!(f, "{}/-/{}", self.day, self.index),
        }
    }
}

impl DayPlan {
    /// Every item key of this day, free lines first, then subsections in order.
    pub fn item_keys(&self, day: &str) -> Vec<ItemKey> {
        let free = (0..self.content.len()).map(|i| ItemKey::free(day, i));
        let nested = self.sections.iter().enumerate().flat_map(|(s, section)| {
            (0..section.content.len()).map(move |i| ItemKey::in_subsection(day, s, i))
        });
        free.chain(nested).collect()
    }

    pub fn item_count(&self) -> usize {
        self.content.len() + self.sections.iter().map(|s| s.content.len()).sum::<usize>()
    }

    /// Text of the item a key points at, if it exists.
    pub fn item(&self, key: &ItemKey) -> Option<&str> {
        let lines = match key.subsection {
            Some(sub) => &self.sections.get(sub)?.content,
            None => &self.content,
        };
        lines.get(key.index).map(String::as_str)
    }
}

/// Completed-item checkboxes, tracked outside the outline itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionTracker {
    done: HashSet<ItemKey>,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip an item's checkbox. Returns the new state.
    pub fn toggle(&mut self, key: ItemKey) -> bool {
        if self.done.remove(&key) {
            false
        } else {
            self.done.insert(key);
            true
        }
    }

    pub fn is_done(&self, key: &ItemKey) -> bool {
        self.done.contains(key)
    }

    pub fn clear_day(&mut self, day: &str) {
        self.done.retain(|k| k.day != day);
    }

    pub fn len(&self) -> usize {
        self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }
}

/// Share of a day's items that are checked, as a percentage.
///
/// A day without items reports 0. Keys that point at nothing are ignored.
pub fn percent_complete(day: &str, plan: &DayPlan, tracker: &CompletionTracker) -> f64 {
    let keys = plan.item_keys(day);
    if keys.is_empty() {
        return 0.0;
    }
    let done = keys.iter().filter(|k| tracker.is_done(k)).count();
    (done as f64 / keys.len() as f64) * 100.0
}
