use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::catalog::Catalogs;
use super::domain::{OptionId, QuestionId};
use super::error::AssessmentError;
use super::questions::{AnswerOption, Question};
use super::state::Response;

/// Outcome of resolving the question that follows an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    /// The answer-specific link was taken.
    Resolved(QuestionId),
    /// The default link was taken; `skipped` is a dangling answer-specific link, if any.
    Fallback {
        target: QuestionId,
        skipped: Option<QuestionId>,
    },
    /// No further question. `dangling` names the unresolvable link, if any.
    End { dangling: Option<QuestionId> },
}

impl NextStep {
    pub fn question_id(&self) -> Option<&QuestionId> {
        match self {
            NextStep::Resolved(target) | NextStep::Fallback { target, .. } => Some(target),
            NextStep::End { .. } => None,
        }
    }

    pub fn into_question_id(self) -> Option<QuestionId> {
        match self {
            NextStep::Resolved(target) | NextStep::Fallback { target, .. } => Some(target),
            NextStep::End { .. } => None,
        }
    }
}

/// Walks the question graph. Pure: never mutates an assessment.
#[derive(Debug, Clone)]
pub struct TraversalEngine {
    catalogs: Arc<Catalogs>,
}

impl TraversalEngine {
    pub fn new(catalogs: Arc<Catalogs>) -> Self {
        Self { catalogs }
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn first_question(&self) -> Result<&Question, AssessmentError> {
        self.catalogs.questions.first_question()
    }

    pub fn question(&self, id: &QuestionId) -> Result<&Question, AssessmentError> {
        self.catalogs
            .questions
            .question(id)
            .ok_or_else(|| AssessmentError::QuestionNotFound(id.clone()))
    }

    /// Returns the exact option chosen, rejecting unknown questions and answers.
    pub fn validate_response(
        &self,
        question_id: &QuestionId,
        answer_id: &OptionId,
    ) -> Result<&AnswerOption, AssessmentError> {
        let question = self.question(question_id)?;
        question.option(answer_id).ok_or_else(|| {
            warn!(
                question_id = %question_id,
                answer_id = %answer_id,
                "answer rejected"
            );
            AssessmentError::InvalidAnswer {
                question_id: question_id.clone(),
                answer_id: answer_id.clone(),
            }
        })
    }

    /// Answer-specific link first, then the default link, else the end of the survey.
    pub fn resolve_next(&self, response: &Response) -> Result<NextStep, AssessmentError> {
        let question = self.question(&response.question_id)?;
        let bank = &self.catalogs.questions;

        let mut skipped = None;
        if let Some(target) = question.conditional_next.get(&response.answer_id) {
            if bank.contains(target) {
                debug!(
                    question_id = %question.id,
                    answer_id = %response.answer_id,
                    next = %target,
                    "conditional link taken"
                );
                return Ok(NextStep::Resolved(target.clone()));
            }
            warn!(
                question_id = %question.id,
                target = %target,
                "conditional link is dangling, falling back"
            );
            skipped = Some(target.clone());
        }

        match &question.default_next {
            Some(target) if bank.contains(target) => {
                debug!(question_id = %question.id, next = %target, "default link taken");
                Ok(NextStep::Fallback {
                    target: target.clone(),
                    skipped,
                })
            }
            Some(target) => {
                warn!(
                    question_id = %question.id,
                    target = %target,
                    "default link is dangling, ending the survey"
                );
                Ok(NextStep::End {
                    dangling: Some(target.clone()),
                })
            }
            None => Ok(NextStep::End { dangling: skipped }),
        }
    }
}
