use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::catalog::{Catalogs, DimensionCatalog};
use super::domain::{
    AssessmentId, AssessmentStatus, CompanyInfo, DimensionId, OptionId, PillarId, QuestionId,
};
use super::error::AssessmentError;
use super::hooks::{AnswerHook, CompanyProfileHook};
use super::progress::{
    question_path, recent_scores, PathStep, ProgressSnapshot, ProgressTracker, RecentScore,
};
use super::questions::{Question, QuestionKind, QuestionStats, QuestionView};
use super::repository::{AssessmentRepository, RepositoryError};
use super::scoring::{
    AssessmentResult, DimensionScore, PillarScore, ResultComparison, ResultSummary, ScoringEngine,
};
use super::state::{Assessment, Response};
use super::traversal::TraversalEngine;

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id(at: DateTime<Utc>) -> AssessmentId {
    let sequence = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("assess_{}_{sequence}", at.timestamp_millis()))
}

#[derive(Debug, Clone, Serialize)]
pub struct StartedAssessment {
    pub assessment_id: AssessmentId,
    pub current_question: QuestionView,
    pub progress: ProgressSnapshot,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnswerOutcome {
    Next {
        question: QuestionView,
        progress: ProgressSnapshot,
    },
    Completed {
        assessment_id: AssessmentId,
        result: AssessmentResult,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentView {
    pub assessment: Assessment,
    pub current_question: Option<QuestionView>,
    pub progress: ProgressSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeView {
    pub assessment_id: AssessmentId,
    pub current_question: QuestionView,
    pub progress: ProgressSnapshot,
    pub path: Vec<PathStep>,
    pub recent_scores: Vec<RecentScore>,
}

/// Fresh result of a completed assessment next to the change from the stored one.
#[derive(Debug, Clone, Serialize)]
pub struct Recalculation {
    pub result: AssessmentResult,
    pub comparison: ResultComparison,
}

/// Narrows the question catalog; every set field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    /// `intro`, `scored` or `conditional`.
    pub kind: Option<String>,
    pub dimension: Option<DimensionId>,
    /// Only valid together with `dimension`.
    pub pillar: Option<PillarId>,
    pub search: Option<String>,
    /// Keep only questions with answer-specific links.
    pub branching: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionListing {
    pub total: usize,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DimensionDetail {
    pub assessment_id: AssessmentId,
    pub dimension: DimensionScore,
    pub responses: Vec<Response>,
    pub strongest_pillar: Option<PillarScore>,
    pub weakest_pillar: Option<PillarScore>,
    pub average_response_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentListing {
    pub assessment_id: AssessmentId,
    pub status: AssessmentStatus,
    pub company_name: Option<String>,
    pub questions_answered: usize,
    pub global_score: Option<u32>,
    pub updated_at: DateTime<Utc>,
}

/// Service composing catalogs, engines, answer hooks and the repository.
pub struct AssessmentService<R> {
    catalogs: Arc<Catalogs>,
    repository: Arc<R>,
    traversal: TraversalEngine,
    scoring: ScoringEngine,
    progress: ProgressTracker,
    hooks: Vec<Box<dyn AnswerHook>>,
}

impl<R> AssessmentService<R>
where
    R: AssessmentRepository + 'static,
{
    /// Builds the service with the company profiling hook installed.
    pub fn new(catalogs: Arc<Catalogs>, repository: Arc<R>) -> Self {
        Self::with_hooks(
            catalogs,
            repository,
            vec![Box::new(CompanyProfileHook::default())],
        )
    }

    pub fn with_hooks(
        catalogs: Arc<Catalogs>,
        repository: Arc<R>,
        hooks: Vec<Box<dyn AnswerHook>>,
    ) -> Self {
        Self {
            traversal: TraversalEngine::new(catalogs.clone()),
            scoring: ScoringEngine::new(catalogs.clone()),
            progress: ProgressTracker::new(catalogs.clone()),
            catalogs,
            repository,
            hooks,
        }
    }

    pub fn dimensions(&self) -> &DimensionCatalog {
        &self.catalogs.dimensions
    }

    pub fn question_stats(&self) -> QuestionStats {
        self.catalogs.questions.stats()
    }

    /// Catalog questions matching `filter`, in bank order.
    pub fn questions(
        &self,
        filter: &QuestionFilter,
    ) -> Result<QuestionListing, AssessmentServiceError> {
        let bank = &self.catalogs.questions;
        let mut selected: Vec<&Question> = match filter.kind.as_deref() {
            None => bank.questions().iter().collect(),
            Some("intro") => bank.intro_questions(),
            Some("scored") => bank.scored_questions(),
            Some("conditional") => bank
                .questions()
                .iter()
                .filter(|question| matches!(question.kind, QuestionKind::Conditional { .. }))
                .collect(),
            Some(other) => {
                return Err(
                    AssessmentError::InvalidFilter(format!("unknown question type {other}")).into(),
                )
            }
        };

        match (&filter.dimension, &filter.pillar) {
            (Some(dimension), Some(pillar)) => {
                keep_listed(&mut selected, &bank.questions_by_pillar(dimension, pillar))
            }
            (Some(dimension), None) => {
                keep_listed(&mut selected, &bank.questions_by_dimension(dimension))
            }
            (None, Some(pillar)) => {
                return Err(AssessmentError::InvalidFilter(format!(
                    "pillar {pillar} needs a dimension"
                ))
                .into())
            }
            (None, None) => {}
        }

        if let Some(term) = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
        {
            keep_listed(&mut selected, &bank.search(term));
        }
        if filter.branching {
            keep_listed(&mut selected, &bank.conditional_questions());
        }

        Ok(QuestionListing {
            total: selected.len(),
            questions: selected
                .into_iter()
                .map(|question| QuestionView::present(question, None))
                .collect(),
        })
    }

    pub fn question(&self, id: &QuestionId) -> Result<QuestionView, AssessmentServiceError> {
        self.catalogs
            .questions
            .question(id)
            .map(|question| QuestionView::present(question, None))
            .ok_or_else(|| AssessmentServiceError::QuestionNotFound(id.clone()))
    }

    /// Creates an assessment positioned on the entry point.
    pub fn start(&self, company: CompanyInfo) -> Result<StartedAssessment, AssessmentServiceError> {
        let now = Utc::now();
        let first = self.traversal.first_question()?;
        let assessment = Assessment::start(next_assessment_id(now), company, first.id.clone(), now);

        let stored = self.repository.insert(assessment)?;
        info!(assessment_id = %stored.id, "assessment started");

        Ok(StartedAssessment {
            assessment_id: stored.id.clone(),
            current_question: QuestionView::present(first, Some(&stored.company_info)),
            progress: self.progress.snapshot(&stored),
        })
    }

    /// Records an answer and moves the assessment forward, completing it on the last question.
    pub fn submit_answer(
        &self,
        id: &AssessmentId,
        question_id: &QuestionId,
        answer_id: &OptionId,
    ) -> Result<AnswerOutcome, AssessmentServiceError> {
        let mut assessment = self.load(id)?;
        let now = Utc::now();

        let question = self.traversal.question(question_id)?;
        let option = self.traversal.validate_response(question_id, answer_id)?;
        let response = Response::from_answer(question, option, now);

        for hook in &self.hooks {
            hook.on_answer(&mut assessment.company_info, question, option);
        }
        if assessment.get_response(question_id).is_some() {
            debug!(assessment_id = %id, question_id = %question_id, "answer replaced");
        }

        assessment.add_response(response.clone(), now)?;
        let next = self.traversal.resolve_next(&response)?.into_question_id();
        assessment.advance(next.clone(), &self.scoring, now)?;
        self.repository.update(assessment.clone())?;

        match next {
            Some(next_id) => {
                let question = self.traversal.question(&next_id)?;
                Ok(AnswerOutcome::Next {
                    question: QuestionView::present(question, Some(&assessment.company_info)),
                    progress: self.progress.snapshot(&assessment),
                })
            }
            None => {
                let result = assessment.result()?.clone();
                Ok(AnswerOutcome::Completed {
                    assessment_id: assessment.id,
                    result,
                })
            }
        }
    }

    pub fn get(&self, id: &AssessmentId) -> Result<AssessmentView, AssessmentServiceError> {
        let assessment = self.load(id)?;
        let current_question = match assessment.status {
            AssessmentStatus::InProgress => Some(self.current_view(&assessment)?),
            AssessmentStatus::Completed | AssessmentStatus::Abandoned => None,
        };
        let progress = self.progress.snapshot(&assessment);

        Ok(AssessmentView {
            assessment,
            current_question,
            progress,
        })
    }

    pub fn progress(&self, id: &AssessmentId) -> Result<ProgressSnapshot, AssessmentServiceError> {
        let assessment = self.load(id)?;
        Ok(self.progress.snapshot(&assessment))
    }

    /// Current question of an assessment that can still be answered.
    pub fn resume(&self, id: &AssessmentId) -> Result<ResumeView, AssessmentServiceError> {
        let assessment = self.load(id)?;
        match assessment.status {
            AssessmentStatus::InProgress => {}
            AssessmentStatus::Completed => {
                return Err(AssessmentError::AlreadyCompleted(assessment.id).into());
            }
            AssessmentStatus::Abandoned => {
                return Err(AssessmentError::AssessmentClosed {
                    id: assessment.id,
                    status: assessment.status,
                }
                .into());
            }
        }

        Ok(ResumeView {
            assessment_id: assessment.id.clone(),
            current_question: self.current_view(&assessment)?,
            progress: self.progress.snapshot(&assessment),
            path: question_path(&assessment),
            recent_scores: recent_scores(&assessment),
        })
    }

    pub fn delete(&self, id: &AssessmentId) -> Result<(), AssessmentServiceError> {
        match self.repository.delete(id) {
            Ok(()) => {
                info!(assessment_id = %id, "assessment deleted");
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(AssessmentServiceError::NotFound(id.clone())),
            Err(other) => Err(other.into()),
        }
    }

    pub fn abandon(&self, id: &AssessmentId) -> Result<Assessment, AssessmentServiceError> {
        let mut assessment = self.load(id)?;
        assessment.abandon(Utc::now())?;
        self.repository.update(assessment.clone())?;
        Ok(assessment)
    }

    pub fn results(&self, id: &AssessmentId) -> Result<AssessmentResult, AssessmentServiceError> {
        let assessment = self.load(id)?;
        Ok(assessment.result()?.clone())
    }

    pub fn summary(&self, id: &AssessmentId) -> Result<ResultSummary, AssessmentServiceError> {
        Ok(self.results(id)?.summary())
    }

    /// Recomputes and replaces the stored result of a completed assessment.
    pub fn recalculate(&self, id: &AssessmentId) -> Result<Recalculation, AssessmentServiceError> {
        let mut assessment = self.load(id)?;
        let previous = assessment.result()?.clone();
        let result = assessment.recalculate(&self.scoring, Utc::now())?.clone();
        self.repository.update(assessment)?;

        let comparison = result.compare_with(&previous);
        info!(
            assessment_id = %id,
            global_score = result.global_score,
            change = comparison.global_score_change,
            "scores recalculated"
        );
        Ok(Recalculation { result, comparison })
    }

    pub fn dimension_detail(
        &self,
        id: &AssessmentId,
        dimension_id: &DimensionId,
    ) -> Result<DimensionDetail, AssessmentServiceError> {
        let assessment = self.load(id)?;
        let result = assessment.result()?;
        let dimension = result
            .dimension_score(dimension_id)
            .cloned()
            .ok_or_else(|| AssessmentError::DimensionNotFound(dimension_id.clone()))?;

        let responses: Vec<Response> = assessment
            .responses_by_dimension(dimension_id)
            .into_iter()
            .cloned()
            .collect();
        let scores: Vec<u32> = responses.iter().filter_map(|response| response.score).collect();
        let average_response_score = (!scores.is_empty()).then(|| {
            let average = f64::from(scores.iter().sum::<u32>()) / scores.len() as f64;
            (average * 10.0).round() / 10.0
        });

        Ok(DimensionDetail {
            assessment_id: assessment.id.clone(),
            strongest_pillar: dimension.strongest_pillar().cloned(),
            weakest_pillar: dimension.weakest_pillar().cloned(),
            dimension,
            responses,
            average_response_score,
        })
    }

    pub fn list(&self) -> Result<Vec<AssessmentListing>, AssessmentServiceError> {
        let mut listings: Vec<AssessmentListing> = self
            .repository
            .list()?
            .into_iter()
            .map(|assessment| AssessmentListing {
                global_score: assessment.scores.as_ref().map(|result| result.global_score),
                questions_answered: assessment.responses.len(),
                company_name: assessment.company_info.name,
                status: assessment.status,
                updated_at: assessment.updated_at,
                assessment_id: assessment.id,
            })
            .collect();
        listings.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(listings)
    }

    fn load(&self, id: &AssessmentId) -> Result<Assessment, AssessmentServiceError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| AssessmentServiceError::NotFound(id.clone()))
    }

    fn current_view(&self, assessment: &Assessment) -> Result<QuestionView, AssessmentServiceError> {
        let question = self.traversal.question(&assessment.current_question_id)?;
        Ok(QuestionView::present(question, Some(&assessment.company_info)))
    }
}

fn keep_listed(selected: &mut Vec<&Question>, listed: &[&Question]) {
    let ids: HashSet<&QuestionId> = listed.iter().map(|question| &question.id).collect();
    selected.retain(|question| ids.contains(&question.id));
}

/// Coarse classification used by transports to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    NotFound,
    BadRequest,
    Conflict,
    Internal,
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error("assessment {0} not found")]
    NotFound(AssessmentId),
    #[error("question {0} not found")]
    QuestionNotFound(QuestionId),
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AssessmentServiceError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AssessmentServiceError::NotFound(_) | AssessmentServiceError::QuestionNotFound(_) => {
                ErrorClass::NotFound
            }
            AssessmentServiceError::Assessment(error) => match error {
                AssessmentError::QuestionNotFound(_)
                | AssessmentError::InvalidAnswer { .. }
                | AssessmentError::InvalidFilter(_)
                | AssessmentError::AssessmentClosed { .. }
                | AssessmentError::AlreadyCompleted(_) => ErrorClass::BadRequest,
                AssessmentError::NotCompleted(_) => ErrorClass::Conflict,
                AssessmentError::DimensionNotFound(_) => ErrorClass::NotFound,
                AssessmentError::ProfileNotFound(_)
                | AssessmentError::EmptyQuestionBank
                | AssessmentError::EntryPointMissing(_) => ErrorClass::Internal,
            },
            AssessmentServiceError::Repository(error) => match error {
                RepositoryError::NotFound => ErrorClass::NotFound,
                RepositoryError::Conflict => ErrorClass::Conflict,
                RepositoryError::Unavailable(_) => ErrorClass::Internal,
            },
        }
    }
}
