use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{AnswerOption, PillarRef, Question, QuestionKind};
use crate::assessment::domain::{DimensionId, OptionId, PillarId, QuestionId};
use crate::assessment::error::CatalogError;

/// Flat storage shape of a question, as found in `questions.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: QuestionId,
    #[serde(rename = "type")]
    pub kind: QuestionRecordKind,
    pub text: String,
    pub options: Vec<OptionRecord>,
    #[serde(default)]
    pub dimension: Option<DimensionId>,
    #[serde(default)]
    pub pillar: Option<PillarId>,
    #[serde(default, alias = "nextQuestion")]
    pub next_question: Option<QuestionId>,
    #[serde(
        default,
        alias = "conditionalNext",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub conditional_next: BTreeMap<OptionId, QuestionId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionRecordKind {
    Intro,
    Scored,
    Conditional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRecord {
    pub id: OptionId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = CatalogError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let QuestionRecord {
            id,
            kind,
            text,
            options,
            dimension,
            pillar,
            next_question,
            conditional_next,
        } = record;

        if options.is_empty() {
            return Err(CatalogError::NoOptions(id));
        }

        let tag = match (dimension, pillar) {
            (Some(dimension), Some(pillar)) => Some(PillarRef { dimension, pillar }),
            (None, None) => None,
            _ => return Err(CatalogError::PartialTag(id)),
        };

        let kind = match kind {
            QuestionRecordKind::Intro => {
                if tag.is_some() {
                    return Err(CatalogError::TaggedIntroQuestion(id));
                }
                QuestionKind::Intro
            }
            QuestionRecordKind::Scored => match tag {
                Some(pillar) => QuestionKind::Scored { pillar },
                None => return Err(CatalogError::UntaggedScoredQuestion(id)),
            },
            QuestionRecordKind::Conditional => QuestionKind::Conditional { pillar: tag },
        };

        for option in &options {
            match (kind.is_scored(), option.score) {
                (true, None) => {
                    return Err(CatalogError::MissingScore {
                        question: id,
                        option: option.id.clone(),
                    })
                }
                (false, Some(_)) => {
                    return Err(CatalogError::UnexpectedScore {
                        question: id,
                        option: option.id.clone(),
                    })
                }
                _ => {}
            }
        }

        Ok(Question {
            id,
            kind,
            text,
            options: options
                .into_iter()
                .map(|option| AnswerOption {
                    id: option.id,
                    text: option.text,
                    value: option.value,
                    score: option.score,
                })
                .collect(),
            default_next: next_question,
            conditional_next,
        })
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        let (kind, tag) = match question.kind {
            QuestionKind::Intro => (QuestionRecordKind::Intro, None),
            QuestionKind::Scored { pillar } => (QuestionRecordKind::Scored, Some(pillar)),
            QuestionKind::Conditional { pillar } => (QuestionRecordKind::Conditional, pillar),
        };
        let (dimension, pillar) = match tag {
            Some(tag) => (Some(tag.dimension), Some(tag.pillar)),
            None => (None, None),
        };

        QuestionRecord {
            id: question.id,
            kind,
            text: question.text,
            options: question
                .options
                .into_iter()
                .map(|option| OptionRecord {
                    id: option.id,
                    text: option.text,
                    value: option.value,
                    score: option.score,
                })
                .collect(),
            dimension,
            pillar,
            next_question: question.default_next,
            conditional_next: question.conditional_next,
        }
    }
}
