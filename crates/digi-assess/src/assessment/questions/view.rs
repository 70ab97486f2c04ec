use serde::Serialize;

use super::{AnswerOption, Question};
use crate::assessment::domain::{CompanyInfo, DimensionId, OptionId, PillarId, QuestionId};

const COMPANY_PLACEHOLDER: &str = "your company";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionOptionView {
    pub id: OptionId,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionMetadata {
    pub is_scored: bool,
    pub has_conditional_logic: bool,
    pub is_last_question: bool,
}

/// Presentation of a question for the respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
    pub options: Vec<QuestionOptionView>,
    pub dimension: Option<DimensionId>,
    pub pillar: Option<PillarId>,
    pub metadata: QuestionMetadata,
}

impl QuestionView {
    /// Formats `question`, substituting the company name when it is known.
    pub fn present(question: &Question, company: Option<&CompanyInfo>) -> Self {
        let tag = question.kind.pillar();
        Self {
            id: question.id.clone(),
            kind: question.kind.label(),
            text: personalize(&question.text, company),
            options: question.options.iter().map(option_view).collect(),
            dimension: tag.map(|tag| tag.dimension.clone()),
            pillar: tag.map(|tag| tag.pillar.clone()),
            metadata: QuestionMetadata {
                is_scored: question.kind.is_scored(),
                has_conditional_logic: question.has_conditional_logic(),
                is_last_question: question.is_last(),
            },
        }
    }
}

fn option_view(option: &AnswerOption) -> QuestionOptionView {
    QuestionOptionView {
        id: option.id.clone(),
        text: option.text.clone(),
        value: option.value.clone(),
        score: option.score,
    }
}

/// Case-insensitive replacement of "your company" with the company name.
fn personalize(text: &str, company: Option<&CompanyInfo>) -> String {
    let Some(name) = company
        .and_then(|company| company.name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
    else {
        return text.to_string();
    };

    let lowered = text.to_ascii_lowercase();
    let mut personalized = String::with_capacity(text.len());
    let mut cursor = 0;
    while let Some(offset) = lowered[cursor..].find(COMPANY_PLACEHOLDER) {
        let start = cursor + offset;
        personalized.push_str(&text[cursor..start]);
        personalized.push_str(name);
        cursor = start + COMPANY_PLACEHOLDER.len();
    }
    personalized.push_str(&text[cursor..]);
    personalized
}
