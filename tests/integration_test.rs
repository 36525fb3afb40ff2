use async_trait::async_trait;
use fitcoach_agent::*;
use fitcoach_agent::llm::TextGenerator;
use std::sync::Mutex;

const PLAN_RESPONSE: &str = "Here's a plan tailored to you!

**Workout Plan**
Aim for three sessions a week.
**Day 1**: Upper body
Day 1
Warm-up
* Arm circles 2 min
Main Workout
- Push-ups 3x12
- Rows 3x10
Cool-down
- Stretch 5 min
Day 2
Cardio
- Run 20 min
Progression
- Add 5 min each week

**Meal Plan**
- Breakfast: oats with berries
- Lunch: chicken salad
- Dinner: salmon and rice
- Snacks: greek yogurt
";

/// Generator that replays canned responses and records prompts.
struct ScriptedGenerator {
    responses: Mutex<Vec<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(responses: Vec<Result<String, String>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> error::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(error::CoachError::Generation("no scripted response".into()));
        }
        responses.remove(0).map_err(error::CoachError::Generation)
    }
}

fn stats() -> planner::UserStats {
    planner::UserStats {
        age: "30".into(),
        height_cm: "180".into(),
        weight_kg: "82".into(),
        goal: planner::BodyGoal::LoseWeight,
        daily_calories: "2100".into(),
        food_preferences: "Pescatarian".into(),
    }
}

/// Test full flow: form → prompt → response → outline
#[tokio::test]
async fn test_plan_generation_flow() {
    let generator = ScriptedGenerator::new(vec![Ok(PLAN_RESPONSE.to_string())]);
    let plan = planner::generate_plan(&generator, &stats()).await.unwrap();

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("- Goal: Lose Weight"));

    // The inline "**Day 1**" marker splits the response into its own section.
    let titles: Vec<_> = plan.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Workout Plan", "Day 1", "Meal Plan"]);

    let workout = outline::workout_plan(&plan.sections).unwrap();
    assert!(workout.is_empty());

    let day_section = outline::find_section(&plan.sections, "Day 1").unwrap();
    let lines = day_section.lines().unwrap();
    assert_eq!(lines[0], ": Upper body");
    assert!(lines.contains(&"Push-ups 3x12".to_string()));

    let meals = outline::find_section(&plan.sections, "Meal Plan").unwrap();
    assert_eq!(meals.lines().unwrap().len(), 4);
}

/// Test workout breakdown → checkboxes → percent complete
#[tokio::test]
async fn test_progress_tracking_flow() {
    let response = PLAN_RESPONSE.replace("**Day 1**: Upper body\n", "");
    let generator = ScriptedGenerator::new(vec![Ok(response)]);
    let plan = planner::generate_plan(&generator, &stats()).await.unwrap();

    let workout = outline::workout_plan(&plan.sections).unwrap();
    assert_eq!(workout.labels().collect::<Vec<_>>(), vec!["Day 1", "Day 2"]);

    let day1 = workout.get("Day 1").unwrap();
    assert!(day1.content.is_empty());
    let titles: Vec<_> = day1.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Warm-up", "Main Workout", "Cool-down"]);

    let mut tracker = progress::CompletionTracker::new();
    for key in day1.item_keys("Day 1").into_iter().take(2) {
        tracker.toggle(key);
    }
    assert_eq!(progress::percent_complete("Day 1", day1, &tracker), 50.0);

    let day2 = workout.get("Day 2").unwrap();
    assert_eq!(progress::percent_complete("Day 2", day2, &tracker), 0.0);
}

/// Test saving, sharing and reopening a plan
#[tokio::test]
async fn test_save_and_share_flow() {
    let response = PLAN_RESPONSE.replace("**Day 1**: Upper body\n", "");
    let generator = ScriptedGenerator::new(vec![Ok(response)]);
    let plan = planner::generate_plan(&generator, &stats()).await.unwrap();

    let mut plans = library::PlanLibrary::new();
    let id = plans.save("Week 1", plan.sections.clone());
    plans.toggle_item(id, progress::ItemKey::in_subsection("Day 2", 0, 0));

    let saved = plans.get(id).unwrap();
    let text = share::share_text(&saved.title, &saved.sections);
    assert!(text.starts_with("Week 1\n\nWorkout Plan\n  Day 1\n    Warm-up\n      • Arm circles 2 min"));
    assert!(text.contains("Meal Plan\n  • Breakfast: oats with berries"));
    assert!(!text.contains("three sessions"));

    // Sharing is one-way: the text does not parse back into the outline.
    assert!(outline::parse(&text).is_empty());

    let day2 = outline::workout_plan(&saved.sections).unwrap().get("Day 2").unwrap();
    assert_eq!(progress::percent_complete("Day 2", day2, &saved.completion), 50.0);
}

/// Test failure handling: generation errors surface, chat degrades to a message
#[tokio::test]
async fn test_failure_flow() {
    let generator = ScriptedGenerator::new(vec![Err("quota exceeded".into())]);
    let err = planner::generate_plan(&generator, &stats()).await.unwrap_err();
    assert!(matches!(err, error::CoachError::Generation(_)));

    let mut session = chat::ChatSession::new();
    let reply = session.send(&generator, "any tips?").await.unwrap();
    assert_eq!(reply.text, chat::CHAT_ERROR_MESSAGE);
}

/// Test chat conversation keeps turn order
#[tokio::test]
async fn test_chat_flow() {
    let generator = ScriptedGenerator::new(vec![
        Ok("Drink water.".into()),
        Ok("Sleep 8 hours.".into()),
    ]);
    let mut session = chat::ChatSession::new();
    session.send(&generator, "hydration?").await;
    session.send(&generator, "").await;
    session.send(&generator, "recovery?").await;

    let texts: Vec<_> = session.messages().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["hydration?", "Drink water.", "recovery?", "Sleep 8 hours."]);
    assert_eq!(generator.prompts.lock().unwrap().len(), 2);
}

/// Test sectionizing JSON-wrapped responses
#[test]
fn test_parse_value_flow() {
    let value = serde_json::json!({"text": PLAN_RESPONSE});
    assert!(outline::parse_value(&value).is_empty());
    assert_eq!(outline::parse_value(&value["text"]).len(), 3);
    assert!(outline::parse_value(&value["missing"]).is_empty());
}

/// Test config → clients
#[test]
fn test_config_flow() {
    let config = config::Config::from_toml(
        r#"
        [gemini]
        api_key = "g-key"
        model = "gemini-1.5-flash"

        [youtube]
        api_key = "y-key"
        max_results = 3
        "#,
    )
    .unwrap();

    let gemini = llm::GeminiClient::from_config(&config.gemini).unwrap();
    assert_eq!(gemini.model(), "gemini-1.5-flash");
    assert!(video::VideoSearchClient::from_config(&config.youtube).is_ok());
}

/// Test search history feeding the video feed
#[test]
fn test_search_to_feed_flow() {
    let mut history = search::SearchHistory::new();
    let query = history.record(search::TRENDING_WORKOUTS[0]).unwrap();
    assert_eq!(history.recent()[0], query);

    let mut feed = video::VideoFeed::new();
    feed.replace(vec![video::Video {
        id: "v1".into(),
        title: query.clone(),
        channel: "Coach".into(),
        thumbnail_url: String::new(),
    }]);
    assert_eq!(feed.active().unwrap().title, "Quick abs workout");
}
