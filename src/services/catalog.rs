use crate::error::ContentError;
use crate::models::question::{
    ChoiceContent, ChoiceOption, ComposeWordContent, CopyWordsPhotoContent, DecomposeWordContent,
    FillBlankContent, FreeTextContent, FreeTextPhotoContent, ListenAndRepeatContent,
    MatchContent, MatchPair, OrderWordsContent, QuestionContent, ReadPassageContent,
};
use crate::models::question_type::QuestionTypeTag;

pub type ValidationResult = std::result::Result<(), ContentError>;

pub const MIN_MATCH_PAIRS: usize = 2;

/// One registered question type.
pub struct CatalogEntry {
    pub tag: QuestionTypeTag,
    pub label: &'static str,
    /// Types that only a teacher can grade start with review switched on.
    pub review_by_default: bool,
    default_content: fn() -> QuestionContent,
    rule: Option<fn(&QuestionContent) -> ValidationResult>,
}

impl CatalogEntry {
    pub fn default_content(&self) -> QuestionContent {
        (self.default_content)()
    }

    pub fn has_rule(&self) -> bool {
        self.rule.is_some()
    }
}

static ENTRIES: [CatalogEntry; 15] = [
    CatalogEntry {
        tag: QuestionTypeTag::SingleBestChoice,
        label: "Single best choice",
        review_by_default: false,
        default_content: || QuestionContent::SingleBestChoice(blank_choice()),
        rule: None,
    },
    CatalogEntry {
        tag: QuestionTypeTag::MultiBestChoice,
        label: "Multiple best choice",
        review_by_default: false,
        default_content: || QuestionContent::MultiBestChoice(blank_choice()),
        rule: None,
    },
    CatalogEntry {
        tag: QuestionTypeTag::MatchPictureToText,
        label: "Match picture to text",
        review_by_default: false,
        default_content: || QuestionContent::MatchPictureToText(blank_match()),
        rule: Some(require_complete_pairs),
    },
    CatalogEntry {
        tag: QuestionTypeTag::CircleSingle,
        label: "Circle one answer",
        review_by_default: false,
        default_content: || QuestionContent::CircleSingle(blank_choice()),
        rule: None,
    },
    CatalogEntry {
        tag: QuestionTypeTag::CircleMultiple,
        label: "Circle all correct answers",
        review_by_default: false,
        default_content: || QuestionContent::CircleMultiple(blank_choice()),
        rule: None,
    },
    CatalogEntry {
        tag: QuestionTypeTag::ListenAndRepeat,
        label: "Listen and repeat",
        review_by_default: true,
        default_content: || {
            QuestionContent::ListenAndRepeat(ListenAndRepeatContent {
                text: String::new(),
                audio_url: String::new(),
                transcript: String::new(),
            })
        },
        rule: None,
    },
    CatalogEntry {
        tag: QuestionTypeTag::DecomposeWord,
        label: "Decompose the word",
        review_by_default: false,
        default_content: || {
            QuestionContent::DecomposeWord(DecomposeWordContent {
                text: String::new(),
                word: String::new(),
                parts: Vec::new(),
            })
        },
        rule: None,
    },
    CatalogEntry {
        tag: QuestionTypeTag::ComposeWord,
        label: "Compose the word",
        review_by_default: false,
        default_content: || {
            QuestionContent::ComposeWord(ComposeWordContent {
                text: String::new(),
                letters: Vec::new(),
                correct_word: String::new(),
            })
        },
        rule: None,
    },
    CatalogEntry {
        tag: QuestionTypeTag::CopyWordsPhoto,
        label: "Copy the words (photo)",
        review_by_default: true,
        default_content: || {
            QuestionContent::CopyWordsPhoto(CopyWordsPhotoContent {
                text: String::new(),
                words: Vec::new(),
            })
        },
        rule: None,
    },
    CatalogEntry {
        tag: QuestionTypeTag::FillBlank,
        label: "Fill in the blank",
        review_by_default: false,
        default_content: || {
            QuestionContent::FillBlank(FillBlankContent {
                text: String::new(),
                sentence: String::new(),
                answers: Vec::new(),
            })
        },
        rule: None,
    },
    CatalogEntry {
        tag: QuestionTypeTag::OrderWords,
        label: "Put the words in order",
        review_by_default: false,
        default_content: || {
            QuestionContent::OrderWords(OrderWordsContent {
                text: String::new(),
                words: Vec::new(),
                correct_order: Vec::new(),
            })
        },
        rule: None,
    },
    CatalogEntry {
        tag: QuestionTypeTag::LinkPictureWord,
        label: "Link picture and word",
        review_by_default: false,
        default_content: || QuestionContent::LinkPictureWord(blank_match()),
        rule: None,
    },
    CatalogEntry {
        tag: QuestionTypeTag::ReadPassage,
        label: "Read the passage aloud",
        review_by_default: true,
        default_content: || {
            QuestionContent::ReadPassage(ReadPassageContent {
                text: String::new(),
                passage: String::new(),
            })
        },
        rule: None,
    },
    CatalogEntry {
        tag: QuestionTypeTag::FreeText,
        label: "Free text",
        review_by_default: true,
        default_content: || QuestionContent::FreeText(FreeTextContent { text: String::new() }),
        rule: None,
    },
    CatalogEntry {
        tag: QuestionTypeTag::FreeTextPhoto,
        label: "Free text (photo)",
        review_by_default: true,
        default_content: || {
            QuestionContent::FreeTextPhoto(FreeTextPhotoContent {
                text: String::new(),
                image_url: String::new(),
            })
        },
        rule: None,
    },
];

fn blank_choice() -> ChoiceContent {
    let blank = || ChoiceOption {
        text: String::new(),
        is_correct: false,
    };
    ChoiceContent {
        text: String::new(),
        options: vec![blank(), blank()],
    }
}

fn blank_match() -> MatchContent {
    let blank = || MatchPair {
        image: String::new(),
        text: String::new(),
    };
    MatchContent {
        text: String::new(),
        pairs: vec![blank(), blank()],
    }
}

fn require_complete_pairs(content: &QuestionContent) -> ValidationResult {
    let QuestionContent::MatchPictureToText(content) = content else {
        return Ok(());
    };
    if content.pairs.len() < MIN_MATCH_PAIRS {
        return Err(ContentError::InsufficientPairs {
            found: content.pairs.len(),
            required: MIN_MATCH_PAIRS,
        });
    }
    match content
        .pairs
        .iter()
        .position(|p| p.image.trim().is_empty() || p.text.trim().is_empty())
    {
        Some(index) => Err(ContentError::IncompletePair { index }),
        None => Ok(()),
    }
}

/// Registry of question types: label, fresh default content and the
/// optional pre-save rule for each tag.
#[derive(Clone, Copy)]
pub struct QuestionTypeCatalog {
    entries: &'static [CatalogEntry],
}

impl Default for QuestionTypeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl QuestionTypeCatalog {
    pub fn standard() -> Self {
        Self { entries: &ENTRIES }
    }

    pub fn entries(&self) -> impl Iterator<Item = &'static CatalogEntry> {
        self.entries.iter()
    }

    /// Panics when `tag` was never registered; that is a build defect, not
    /// something a user can cause.
    pub fn entry(&self, tag: QuestionTypeTag) -> &'static CatalogEntry {
        self.entries
            .iter()
            .find(|e| e.tag == tag)
            .unwrap_or_else(|| panic!("question type {} is not registered in the catalog", tag))
    }

    /// Every call builds a new value; callers mutate it in place.
    pub fn default_content_for(&self, tag: QuestionTypeTag) -> QuestionContent {
        self.entry(tag).default_content()
    }

    pub fn label_for(&self, tag: QuestionTypeTag) -> &'static str {
        self.entry(tag).label
    }

    pub fn review_by_default(&self, tag: QuestionTypeTag) -> bool {
        self.entry(tag).review_by_default
    }

    pub fn validate(&self, tag: QuestionTypeTag, content: &QuestionContent) -> ValidationResult {
        if content.tag() != tag {
            return Err(ContentError::ShapeMismatch {
                expected: tag,
                found: content.tag(),
            });
        }
        match self.entry(tag).rule {
            Some(rule) => rule(content),
            None => Ok(()),
        }
    }
}
