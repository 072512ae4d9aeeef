use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// Shown for answers whose shape is not recognised.
pub const UNKNOWN_ANSWER_PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderStrategy {
    Text,
    ChoiceList,
    Image,
    Audio,
    MatchCount,
    OrderedWords,
    Letters,
    Unknown,
}

struct ShapeRule {
    strategy: RenderStrategy,
    matches: fn(&Map<String, JsonValue>) -> bool,
}

fn non_empty_string(answer: &Map<String, JsonValue>, field: &str) -> bool {
    answer
        .get(field)
        .and_then(JsonValue::as_str)
        .is_some_and(|s| !s.is_empty())
}

fn is_array(answer: &Map<String, JsonValue>, field: &str) -> bool {
    answer.get(field).is_some_and(JsonValue::is_array)
}

// Evaluated top to bottom; the first match wins. An answer carrying both
// `text` and `imageUrl` renders as text.
const SHAPE_RULES: [ShapeRule; 7] = [
    ShapeRule {
        strategy: RenderStrategy::Text,
        matches: |a| non_empty_string(a, "text"),
    },
    ShapeRule {
        strategy: RenderStrategy::ChoiceList,
        matches: |a| is_array(a, "selectedOptions"),
    },
    ShapeRule {
        strategy: RenderStrategy::Image,
        matches: |a| non_empty_string(a, "imageUrl"),
    },
    ShapeRule {
        strategy: RenderStrategy::Audio,
        matches: |a| non_empty_string(a, "audioUrl"),
    },
    ShapeRule {
        strategy: RenderStrategy::MatchCount,
        matches: |a| is_array(a, "matches"),
    },
    ShapeRule {
        strategy: RenderStrategy::OrderedWords,
        matches: |a| is_array(a, "orderedWords"),
    },
    ShapeRule {
        strategy: RenderStrategy::Letters,
        matches: |a| is_array(a, "letters"),
    },
];

/// What a reviewer sees for one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedAnswer {
    pub strategy: RenderStrategy,
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

pub struct AnswerShapeClassifier;

impl AnswerShapeClassifier {
    /// Never fails: anything that is not a recognisable object is `Unknown`.
    pub fn classify(answer: &JsonValue) -> RenderStrategy {
        let Some(fields) = answer.as_object() else {
            return RenderStrategy::Unknown;
        };
        SHAPE_RULES
            .iter()
            .find(|rule| (rule.matches)(fields))
            .map(|rule| rule.strategy)
            .unwrap_or(RenderStrategy::Unknown)
    }

    pub fn render(answer: &JsonValue) -> RenderedAnswer {
        let strategy = Self::classify(answer);
        let string_field = |field: &str| {
            answer
                .get(field)
                .and_then(JsonValue::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let list_field = |field: &str| -> Vec<String> {
            answer
                .get(field)
                .and_then(JsonValue::as_array)
                .map(|items| items.iter().map(display_item).collect())
                .unwrap_or_default()
        };

        let (display, media_url) = match strategy {
            RenderStrategy::Text => (string_field("text"), None),
            RenderStrategy::ChoiceList => (list_field("selectedOptions").join(", "), None),
            RenderStrategy::Image => {
                let url = string_field("imageUrl");
                (url.clone(), Some(url))
            }
            RenderStrategy::Audio => {
                let url = string_field("audioUrl");
                (url.clone(), Some(url))
            }
            RenderStrategy::MatchCount => {
                let count = list_field("matches").len();
                let noun = if count == 1 { "match" } else { "matches" };
                (format!("{} {}", count, noun), None)
            }
            RenderStrategy::OrderedWords => (list_field("orderedWords").join(" "), None),
            RenderStrategy::Letters => (list_field("letters").concat(), None),
            RenderStrategy::Unknown => (UNKNOWN_ANSWER_PLACEHOLDER.to_string(), None),
        };

        RenderedAnswer {
            strategy,
            display,
            media_url,
        }
    }
}

fn display_item(item: &JsonValue) -> String {
    match item {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
