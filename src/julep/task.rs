//! The foodie-tour task definition and its execution input.
use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};

pub const AGENT_NAME: &str = "Foodie Tour Guide";
pub const AGENT_ABOUT: &str =
    "An expert food tour guide that creates weather-aware culinary experiences.";

pub const DEFAULT_LOCATIONS: [&str; 2] = ["Mumbai", "Paris"];

const FOODIE_TOUR_TASK: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tasks/foodie_tour.yaml"
));

/// Credentials for the integration tools the task calls.
#[derive(Debug, Clone, Copy)]
pub struct ToolKeys<'a> {
    pub weather: &'a str,
    pub search: &'a str,
}

/// Load the embedded task definition as JSON with tool keys filled in.
pub fn foodie_tour_task(keys: ToolKeys<'_>) -> Result<Value> {
    let mut task: Value =
        serde_yaml::from_str(FOODIE_TOUR_TASK).context("parse embedded task definition")?;
    let steps = task
        .get("main")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    if steps == 0 {
        return Err(anyhow!("task definition has no main steps"));
    }

    set_tool_key(&mut task, "weather", "openweathermap_api_key", keys.weather)?;
    set_tool_key(&mut task, "internet_search", "brave_api_key", keys.search)?;
    Ok(task)
}

fn set_tool_key(task: &mut Value, tool: &str, field: &str, key: &str) -> Result<()> {
    let setup = task
        .get_mut("tools")
        .and_then(Value::as_array_mut)
        .and_then(|tools| {
            tools
                .iter_mut()
                .find(|entry| entry.get("name").and_then(Value::as_str) == Some(tool))
        })
        .and_then(|entry| entry.pointer_mut("/integration/setup"))
        .and_then(Value::as_object_mut)
        .ok_or_else(|| anyhow!("task definition has no setup for tool {tool:?}"))?;
    setup.insert(field.to_string(), Value::String(key.to_string()));
    Ok(())
}

/// Execution input matching the task's input schema.
pub fn execution_input<S: AsRef<str>>(locations: &[S]) -> Value {
    let locations: Vec<&str> = locations.iter().map(AsRef::as_ref).collect();
    json!({ "locations": locations })
}
