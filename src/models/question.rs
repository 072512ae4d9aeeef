use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::ContentError;
use crate::models::question_type::QuestionTypeTag;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChoiceOption {
    pub text: String,
    pub is_correct: bool,
}

/// Shared by the single/multi best-choice and circle families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChoiceContent {
    pub text: String,
    pub options: Vec<ChoiceOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MatchPair {
    pub image: String,
    pub text: String,
}

/// Shared by match-picture-to-text and link-picture-word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MatchContent {
    pub text: String,
    pub pairs: Vec<MatchPair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListenAndRepeatContent {
    pub text: String,
    pub audio_url: String,
    pub transcript: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DecomposeWordContent {
    pub text: String,
    pub word: String,
    pub parts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComposeWordContent {
    pub text: String,
    pub letters: Vec<String>,
    pub correct_word: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CopyWordsPhotoContent {
    pub text: String,
    pub words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FillBlankContent {
    pub text: String,
    pub sentence: String,
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderWordsContent {
    pub text: String,
    pub words: Vec<String>,
    pub correct_order: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReadPassageContent {
    pub text: String,
    pub passage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FreeTextContent {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FreeTextPhotoContent {
    pub text: String,
    pub image_url: String,
}

/// Typed question payload. The variant is the question's type, so a question
/// can never carry content shaped for a different type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionContent {
    SingleBestChoice(ChoiceContent),
    MultiBestChoice(ChoiceContent),
    MatchPictureToText(MatchContent),
    CircleSingle(ChoiceContent),
    CircleMultiple(ChoiceContent),
    ListenAndRepeat(ListenAndRepeatContent),
    DecomposeWord(DecomposeWordContent),
    ComposeWord(ComposeWordContent),
    CopyWordsPhoto(CopyWordsPhotoContent),
    FillBlank(FillBlankContent),
    OrderWords(OrderWordsContent),
    LinkPictureWord(MatchContent),
    ReadPassage(ReadPassageContent),
    FreeText(FreeTextContent),
    FreeTextPhoto(FreeTextPhotoContent),
}

impl QuestionContent {
    pub fn tag(&self) -> QuestionTypeTag {
        match self {
            QuestionContent::SingleBestChoice(_) => QuestionTypeTag::SingleBestChoice,
            QuestionContent::MultiBestChoice(_) => QuestionTypeTag::MultiBestChoice,
            QuestionContent::MatchPictureToText(_) => QuestionTypeTag::MatchPictureToText,
            QuestionContent::CircleSingle(_) => QuestionTypeTag::CircleSingle,
            QuestionContent::CircleMultiple(_) => QuestionTypeTag::CircleMultiple,
            QuestionContent::ListenAndRepeat(_) => QuestionTypeTag::ListenAndRepeat,
            QuestionContent::DecomposeWord(_) => QuestionTypeTag::DecomposeWord,
            QuestionContent::ComposeWord(_) => QuestionTypeTag::ComposeWord,
            QuestionContent::CopyWordsPhoto(_) => QuestionTypeTag::CopyWordsPhoto,
            QuestionContent::FillBlank(_) => QuestionTypeTag::FillBlank,
            QuestionContent::OrderWords(_) => QuestionTypeTag::OrderWords,
            QuestionContent::LinkPictureWord(_) => QuestionTypeTag::LinkPictureWord,
            QuestionContent::ReadPassage(_) => QuestionTypeTag::ReadPassage,
            QuestionContent::FreeText(_) => QuestionTypeTag::FreeText,
            QuestionContent::FreeTextPhoto(_) => QuestionTypeTag::FreeTextPhoto,
        }
    }

    /// Prompt shown to the student; every variant has one.
    pub fn text(&self) -> &str {
        match self {
            QuestionContent::SingleBestChoice(c)
            | QuestionContent::MultiBestChoice(c)
            | QuestionContent::CircleSingle(c)
            | QuestionContent::CircleMultiple(c) => &c.text,
            QuestionContent::MatchPictureToText(c) | QuestionContent::LinkPictureWord(c) => &c.text,
            QuestionContent::ListenAndRepeat(c) => &c.text,
            QuestionContent::DecomposeWord(c) => &c.text,
            QuestionContent::ComposeWord(c) => &c.text,
            QuestionContent::CopyWordsPhoto(c) => &c.text,
            QuestionContent::FillBlank(c) => &c.text,
            QuestionContent::OrderWords(c) => &c.text,
            QuestionContent::ReadPassage(c) => &c.text,
            QuestionContent::FreeText(c) => &c.text,
            QuestionContent::FreeTextPhoto(c) => &c.text,
        }
    }

    pub fn to_value(&self) -> JsonValue {
        let encoded = match self {
            QuestionContent::SingleBestChoice(c)
            | QuestionContent::MultiBestChoice(c)
            | QuestionContent::CircleSingle(c)
            | QuestionContent::CircleMultiple(c) => serde_json::to_value(c),
            QuestionContent::MatchPictureToText(c) | QuestionContent::LinkPictureWord(c) => {
                serde_json::to_value(c)
            }
            QuestionContent::ListenAndRepeat(c) => serde_json::to_value(c),
            QuestionContent::DecomposeWord(c) => serde_json::to_value(c),
            QuestionContent::ComposeWord(c) => serde_json::to_value(c),
            QuestionContent::CopyWordsPhoto(c) => serde_json::to_value(c),
            QuestionContent::FillBlank(c) => serde_json::to_value(c),
            QuestionContent::OrderWords(c) => serde_json::to_value(c),
            QuestionContent::ReadPassage(c) => serde_json::to_value(c),
            QuestionContent::FreeText(c) => serde_json::to_value(c),
            QuestionContent::FreeTextPhoto(c) => serde_json::to_value(c),
        };
        // Plain structs of strings, bools and vectors always encode.
        encoded.unwrap_or(JsonValue::Null)
    }

    /// Parses `value` strictly against the schema of `tag`: missing and
    /// unknown fields are both rejected.
    pub fn from_value(tag: QuestionTypeTag, value: JsonValue) -> Result<Self, ContentError> {
        let content = match tag {
            QuestionTypeTag::SingleBestChoice => {
                QuestionContent::SingleBestChoice(parse_variant(tag, value)?)
            }
            QuestionTypeTag::MultiBestChoice => {
                QuestionContent::MultiBestChoice(parse_variant(tag, value)?)
            }
            QuestionTypeTag::MatchPictureToText => {
                QuestionContent::MatchPictureToText(parse_variant(tag, value)?)
            }
            QuestionTypeTag::CircleSingle => QuestionContent::CircleSingle(parse_variant(tag, value)?),
            QuestionTypeTag::CircleMultiple => {
                QuestionContent::CircleMultiple(parse_variant(tag, value)?)
            }
            QuestionTypeTag::ListenAndRepeat => {
                QuestionContent::ListenAndRepeat(parse_variant(tag, value)?)
            }
            QuestionTypeTag::DecomposeWord => {
                QuestionContent::DecomposeWord(parse_variant(tag, value)?)
            }
            QuestionTypeTag::ComposeWord => QuestionContent::ComposeWord(parse_variant(tag, value)?),
            QuestionTypeTag::CopyWordsPhoto => {
                QuestionContent::CopyWordsPhoto(parse_variant(tag, value)?)
            }
            QuestionTypeTag::FillBlank => QuestionContent::FillBlank(parse_variant(tag, value)?),
            QuestionTypeTag::OrderWords => QuestionContent::OrderWords(parse_variant(tag, value)?),
            QuestionTypeTag::LinkPictureWord => {
                QuestionContent::LinkPictureWord(parse_variant(tag, value)?)
            }
            QuestionTypeTag::ReadPassage => QuestionContent::ReadPassage(parse_variant(tag, value)?),
            QuestionTypeTag::FreeText => QuestionContent::FreeText(parse_variant(tag, value)?),
            QuestionTypeTag::FreeTextPhoto => {
                QuestionContent::FreeTextPhoto(parse_variant(tag, value)?)
            }
        };
        Ok(content)
    }
}

fn parse_variant<T: DeserializeOwned>(tag: QuestionTypeTag, value: JsonValue) -> Result<T, ContentError> {
    serde_json::from_value(value).map_err(|e| ContentError::Malformed {
        tag,
        reason: e.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    pub id: i64,
    pub assignment_block_id: i64,
    pub content: QuestionContent,
    pub points: i32,
    pub requires_teacher_review: bool,
}

impl Question {
    pub fn question_type(&self) -> QuestionTypeTag {
        self.content.tag()
    }
}

fn default_points() -> i32 {
    1
}

/// Wire shape of a question: `type` and `content` side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionRecord {
    #[serde(default)]
    id: i64,
    assignment_block_id: i64,
    #[serde(rename = "type")]
    question_type: QuestionTypeTag,
    content: JsonValue,
    #[serde(default = "default_points")]
    points: i32,
    #[serde(default)]
    requires_teacher_review: bool,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = ContentError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Ok(Question {
            id: record.id,
            assignment_block_id: record.assignment_block_id,
            content: QuestionContent::from_value(record.question_type, record.content)?,
            points: record.points,
            requires_teacher_review: record.requires_teacher_review,
        })
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        QuestionRecord {
            id: question.id,
            assignment_block_id: question.assignment_block_id,
            question_type: question.content.tag(),
            content: question.content.to_value(),
            points: question.points,
            requires_teacher_review: question.requires_teacher_review,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn question_reads_type_and_content_together() {
        let raw = json!({
            "id": 7,
            "assignmentBlockId": 3,
            "type": "order-words",
            "content": { "text": "Put in order", "words": ["b", "a"], "correctOrder": ["a", "b"] },
            "points": 2,
            "requiresTeacherReview": false
        });
        let question: Question = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(question.question_type(), QuestionTypeTag::OrderWords);
        assert_eq!(question.content.text(), "Put in order");
        assert_eq!(serde_json::to_value(&question).unwrap(), raw);
    }

    #[test]
    fn content_of_another_type_is_rejected() {
        let raw = json!({
            "assignmentBlockId": 3,
            "type": "order-words",
            "content": { "text": "Pick one", "options": [] }
        });
        let err = serde_json::from_value::<Question>(raw).unwrap_err();
        assert!(err.to_string().contains("order-words"));
    }

    #[test]
    fn extra_content_fields_are_rejected() {
        let err = QuestionContent::from_value(
            QuestionTypeTag::FreeText,
            json!({ "text": "Describe your day", "options": [] }),
        )
        .unwrap_err();
        assert_eq!(err.reason(), "malformed content");
    }

    #[test]
    fn missing_points_default_to_one() {
        let question: Question = serde_json::from_value(json!({
            "assignmentBlockId": 1,
            "type": "free-text",
            "content": { "text": "Why?" }
        }))
        .unwrap();
        assert_eq!(question.points, 1);
        assert!(!question.requires_teacher_review);
    }
}
