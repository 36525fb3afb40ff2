//! Personalization form and plan generation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

use crate::error::{CoachError, Result};
use crate::llm::TextGenerator;
use crate::outline::{self, Section};

/// Shown to the user when generation fails.
pub const PLAN_ERROR_MESSAGE: &str = "Error: Could not generate a fitness plan. Try again.";

/// Shown when a form field is left blank.
pub const INCOMPLETE_FORM_MESSAGE: &str = "Please fill in all fields before generating your plan.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyGoal {
    #[default]
    LoseWeight,
    GainMuscle,
    MaintainWeight,
}

impl BodyGoal {
    pub const ALL: [BodyGoal; 3] = [
        BodyGoal::LoseWeight,
        BodyGoal::GainMuscle,
        BodyGoal::MaintainWeight,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BodyGoal::LoseWeight => "Lose Weight",
            BodyGoal::GainMuscle => "Gain Muscle",
            BodyGoal::MaintainWeight => "Maintain Weight",
        }
    }
}

impl fmt::Display for BodyGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BodyGoal {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        BodyGoal::ALL
            .into_iter()
            .find(|goal| goal.label().to_lowercase() == normalized)
            .ok_or_else(|| {
                format!("unknown goal '{s}' (use lose-weight, gain-muscle or maintain-weight)")
            })
    }
}

/// The personalization form, as entered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserStats {
    pub age: String,
    pub height_cm: String,
    pub weight_kg: String,
    pub goal: BodyGoal,
    pub daily_calories: String,
    pub food_preferences: String,
}

impl UserStats {
    /// Every text field must be filled in.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("age", &self.age),
            ("height", &self.height_cm),
            ("weight", &self.weight_kg),
            ("daily calories", &self.daily_calories),
            ("food preferences", &self.food_preferences),
        ];
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(CoachError::MissingField(*name)),
            None => Ok(()),
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "User Stats:
- Age: {} years
- Height: {} cm
- Weight: {} kg
- Goal: {}
- Daily Target Calories: {}
- Food Preferences: {}

Generate a structured workout and meal plan with bullet points:
- **Workout Plan**: Provide a detailed plan, including exercises, sets, and reps.
- **Meal Plan**: Recommend meals for breakfast, lunch, dinner, and snacks.",
            self.age.trim(),
            self.height_cm.trim(),
            self.weight_kg.trim(),
            self.goal,
            self.daily_calories.trim(),
            self.food_preferences.trim(),
        )
    }
}

/// A generated plan: the raw response and its outline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPlan {
    pub raw: String,
    pub sections: Vec<Section>,
}

pub async fn generate_plan(generator: &dyn TextGenerator, stats: &UserStats) -> Result<GeneratedPlan> {
    stats.validate()?;

    info!(goal = %stats.goal, "generating fitness plan");
    let raw = generator.generate(&stats.prompt()).await.map_err(|e| {
        warn!(error = %e, "plan generation failed");
        CoachError::Generation(e.to_string())
    })?;

    let sections = outline::parse(&raw);
    info!(sections = sections.len(), "plan generated");
    Ok(GeneratedPlan { raw, sections })
}
