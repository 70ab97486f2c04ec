use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::catalog::MAX_PILLAR_SCORE;
use super::domain::{
    percentage, AssessmentId, AssessmentStatus, CompanyInfo, DimensionId, OptionId, PillarId,
    QuestionId,
};
use super::error::AssessmentError;
use super::questions::{AnswerOption, Question, QuestionKind};
use super::scoring::{AssessmentResult, ScoringEngine};

/// Band of a single response score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseLevel {
    Low,
    Medium,
    High,
}

impl ResponseLevel {
    pub const fn for_score(score: u32) -> Self {
        if score >= 7 {
            Self::High
        } else if score >= 4 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub question_id: QuestionId,
    pub answer_id: OptionId,
    pub answer_text: String,
    pub dimension: Option<DimensionId>,
    pub pillar: Option<PillarId>,
    pub score: Option<u32>,
    pub answered_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Response {
    /// Builds the response for `option` of `question`. Only scored questions carry a score.
    pub fn from_answer(question: &Question, option: &AnswerOption, at: DateTime<Utc>) -> Self {
        let (tag, score) = match &question.kind {
            QuestionKind::Intro => (None, None),
            QuestionKind::Scored { pillar } => (Some(pillar), option.score),
            QuestionKind::Conditional { pillar } => (pillar.as_ref(), None),
        };

        Self {
            question_id: question.id.clone(),
            answer_id: option.id.clone(),
            answer_text: option.text.clone(),
            dimension: tag.map(|tag| tag.dimension.clone()),
            pillar: tag.map(|tag| tag.pillar.clone()),
            score,
            answered_at: at,
            updated_at: None,
        }
    }

    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }

    pub fn score_level(&self) -> Option<ResponseLevel> {
        self.score.map(ResponseLevel::for_score)
    }

    pub fn score_percentage(&self) -> Option<u32> {
        self.score.map(|score| percentage(score, MAX_PILLAR_SCORE))
    }
}

/// The mutable aggregate of one respondent's journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub company_info: CompanyInfo,
    pub responses: Vec<Response>,
    pub current_question_id: QuestionId,
    pub status: AssessmentStatus,
    pub scores: Option<AssessmentResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Assessment {
    pub fn start(
        id: AssessmentId,
        company_info: CompanyInfo,
        entry_point: QuestionId,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            company_info,
            responses: Vec::new(),
            current_question_id: entry_point,
            status: AssessmentStatus::InProgress,
            scores: None,
            created_at: at,
            updated_at: at,
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == AssessmentStatus::Completed
    }

    fn ensure_open(&self) -> Result<(), AssessmentError> {
        if self.status.is_terminal() {
            return Err(AssessmentError::AssessmentClosed {
                id: self.id.clone(),
                status: self.status,
            });
        }
        Ok(())
    }

    /// Upserts by question: a re-answer replaces the earlier response in place.
    pub fn add_response(
        &mut self,
        mut response: Response,
        at: DateTime<Utc>,
    ) -> Result<(), AssessmentError> {
        self.ensure_open()?;

        match self
            .responses
            .iter_mut()
            .find(|existing| existing.question_id == response.question_id)
        {
            Some(existing) => {
                response.answered_at = existing.answered_at;
                response.updated_at = Some(at);
                *existing = response;
            }
            None => {
                response.answered_at = at;
                response.updated_at = None;
                self.responses.push(response);
            }
        }

        self.updated_at = at;
        Ok(())
    }

    /// Moves to `next`, or completes the assessment when traversal has nothing left.
    pub fn advance(
        &mut self,
        next: Option<QuestionId>,
        scoring: &ScoringEngine,
        at: DateTime<Utc>,
    ) -> Result<(), AssessmentError> {
        match next {
            Some(question_id) => {
                self.ensure_open()?;
                self.current_question_id = question_id;
                self.updated_at = at;
                Ok(())
            }
            None => self.complete(scoring, at).map(|_| ()),
        }
    }

    /// Scores first, then closes; a scoring failure leaves the assessment untouched.
    pub fn complete(
        &mut self,
        scoring: &ScoringEngine,
        at: DateTime<Utc>,
    ) -> Result<&AssessmentResult, AssessmentError> {
        if self.is_completed() {
            return Err(AssessmentError::AlreadyCompleted(self.id.clone()));
        }
        self.ensure_open()?;

        let result = scoring.calculate_scores(self, at)?;
        self.status = AssessmentStatus::Completed;
        self.completed_at = Some(at);
        self.updated_at = at;

        info!(
            assessment_id = %self.id,
            global_score = result.global_score,
            profile = %result.maturity_profile.id,
            "assessment completed"
        );

        Ok(self.scores.insert(result))
    }

    /// Replaces the stored result of a completed assessment.
    pub fn recalculate(
        &mut self,
        scoring: &ScoringEngine,
        at: DateTime<Utc>,
    ) -> Result<&AssessmentResult, AssessmentError> {
        if !self.is_completed() {
            return Err(AssessmentError::NotCompleted(self.id.clone()));
        }

        let result = scoring.calculate_scores(self, at)?;
        self.updated_at = at;
        Ok(self.scores.insert(result))
    }

    pub fn abandon(&mut self, at: DateTime<Utc>) -> Result<(), AssessmentError> {
        self.ensure_open()?;
        self.status = AssessmentStatus::Abandoned;
        self.updated_at = at;
        info!(assessment_id = %self.id, "assessment abandoned");
        Ok(())
    }

    pub fn result(&self) -> Result<&AssessmentResult, AssessmentError> {
        match (&self.scores, self.status) {
            (Some(result), AssessmentStatus::Completed) => Ok(result),
            _ => Err(AssessmentError::NotCompleted(self.id.clone())),
        }
    }

    pub fn get_response(&self, question_id: &QuestionId) -> Option<&Response> {
        self.responses
            .iter()
            .find(|response| &response.question_id == question_id)
    }

    pub fn responses_by_dimension(&self, dimension: &DimensionId) -> Vec<&Response> {
        self.responses
            .iter()
            .filter(|response| response.dimension.as_ref() == Some(dimension))
            .collect()
    }
}
