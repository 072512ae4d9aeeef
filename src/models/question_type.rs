use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionTypeTag {
    SingleBestChoice,
    MultiBestChoice,
    MatchPictureToText,
    CircleSingle,
    CircleMultiple,
    ListenAndRepeat,
    DecomposeWord,
    ComposeWord,
    CopyWordsPhoto,
    FillBlank,
    OrderWords,
    LinkPictureWord,
    ReadPassage,
    FreeText,
    FreeTextPhoto,
}

impl QuestionTypeTag {
    pub const ALL: [QuestionTypeTag; 15] = [
        QuestionTypeTag::SingleBestChoice,
        QuestionTypeTag::MultiBestChoice,
        QuestionTypeTag::MatchPictureToText,
        QuestionTypeTag::CircleSingle,
        QuestionTypeTag::CircleMultiple,
        QuestionTypeTag::ListenAndRepeat,
        QuestionTypeTag::DecomposeWord,
        QuestionTypeTag::ComposeWord,
        QuestionTypeTag::CopyWordsPhoto,
        QuestionTypeTag::FillBlank,
        QuestionTypeTag::OrderWords,
        QuestionTypeTag::LinkPictureWord,
        QuestionTypeTag::ReadPassage,
        QuestionTypeTag::FreeText,
        QuestionTypeTag::FreeTextPhoto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionTypeTag::SingleBestChoice => "single-best-choice",
            QuestionTypeTag::MultiBestChoice => "multi-best-choice",
            QuestionTypeTag::MatchPictureToText => "match-picture-to-text",
            QuestionTypeTag::CircleSingle => "circle-single",
            QuestionTypeTag::CircleMultiple => "circle-multiple",
            QuestionTypeTag::ListenAndRepeat => "listen-and-repeat",
            QuestionTypeTag::DecomposeWord => "decompose-word",
            QuestionTypeTag::ComposeWord => "compose-word",
            QuestionTypeTag::CopyWordsPhoto => "copy-words-photo",
            QuestionTypeTag::FillBlank => "fill-blank",
            QuestionTypeTag::OrderWords => "order-words",
            QuestionTypeTag::LinkPictureWord => "link-picture-word",
            QuestionTypeTag::ReadPassage => "read-passage",
            QuestionTypeTag::FreeText => "free-text",
            QuestionTypeTag::FreeTextPhoto => "free-text-photo",
        }
    }
}

impl fmt::Display for QuestionTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionTypeTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionTypeTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s.trim())
            .ok_or_else(|| Error::UnknownQuestionType(s.to_string()))
    }
}
