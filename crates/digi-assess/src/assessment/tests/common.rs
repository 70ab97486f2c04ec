use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response as HttpResponse;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::assessment::catalog::{Catalogs, DimensionCatalog};
use crate::assessment::domain::{AssessmentId, CompanyInfo, OptionId, QuestionId};
use crate::assessment::questions::{AnswerOption, PillarRef, Question, QuestionBank, QuestionKind};
use crate::assessment::repository::{AssessmentRepository, RepositoryError};
use crate::assessment::scoring::ScoringEngine;
use crate::assessment::state::{Assessment, Response};
use crate::assessment::traversal::TraversalEngine;
use crate::assessment::AssessmentService;

pub(super) fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0)
        .single()
        .expect("valid timestamp")
        + Duration::minutes(minute)
}

pub(super) fn catalogs() -> Arc<Catalogs> {
    Arc::new(Catalogs::standard().expect("standard catalogs"))
}

pub(super) fn traversal() -> TraversalEngine {
    TraversalEngine::new(catalogs())
}

pub(super) fn scoring() -> ScoringEngine {
    ScoringEngine::new(catalogs())
}

pub(super) fn new_assessment(id: &str) -> Assessment {
    Assessment::start(
        AssessmentId::from(id),
        CompanyInfo {
            name: Some("Acme Bakery".to_string()),
            ..CompanyInfo::default()
        },
        QuestionId::from("intro_company_size"),
        at(0),
    )
}

/// Response built from the standard bank, as the service would.
pub(super) fn answer(question_id: &str, answer_id: &str, minute: i64) -> Response {
    let catalogs = catalogs();
    let question = catalogs
        .questions
        .question(&QuestionId::from(question_id))
        .expect("question in standard bank");
    let option = question
        .option(&OptionId::from(answer_id))
        .expect("option of question");
    Response::from_answer(question, option, at(minute))
}

/// Synthetic scored response for pillar arithmetic.
pub(super) fn scored(question: &str, dimension: &str, pillar: &str, score: u32) -> Response {
    Response {
        question_id: QuestionId::from(question),
        answer_id: OptionId::from("picked"),
        answer_text: "Picked".to_string(),
        dimension: Some(dimension.into()),
        pillar: Some(pillar.into()),
        score: Some(score),
        answered_at: at(1),
        updated_at: None,
    }
}

/// Gives every pillar of `dimension` the listed points, in catalog order.
pub(super) fn dimension_responses(dimension: &str, points: [u32; 4]) -> Vec<Response> {
    let catalogs = catalogs();
    let dimension = catalogs
        .dimensions
        .dimension(&dimension.into())
        .expect("known dimension");
    dimension
        .pillars
        .iter()
        .zip(points)
        .map(|(pillar, score)| {
            scored(
                &format!("{}_{}", dimension.id, pillar.id),
                dimension.id.as_str(),
                pillar.id.as_str(),
                score,
            )
        })
        .collect()
}

/// Walks the standard bank answering with `pick`, from the entry point to the end.
pub(super) fn walk_standard_bank(pick: impl Fn(&Question) -> OptionId) -> Vec<(QuestionId, OptionId)> {
    let traversal = traversal();
    let mut path = Vec::new();
    let mut current = Some(
        traversal
            .first_question()
            .expect("entry point")
            .id
            .clone(),
    );

    while let Some(question_id) = current {
        let question = traversal.question(&question_id).expect("reachable question");
        let answer_id = pick(question);
        let option = traversal
            .validate_response(&question_id, &answer_id)
            .expect("valid answer");
        let response = Response::from_answer(question, option, at(path.len() as i64));
        path.push((question_id, answer_id));
        current = traversal
            .resolve_next(&response)
            .expect("resolvable")
            .into_question_id();
    }

    path
}

/// Highest-scoring option for scored questions, first option otherwise.
pub(super) fn best_option(question: &Question) -> OptionId {
    question
        .options
        .iter()
        .max_by_key(|option| option.score.unwrap_or(0))
        .map(|option| option.id.clone())
        .expect("question has options")
}

pub(super) fn first_option(question: &Question) -> OptionId {
    question.options[0].id.clone()
}

/// Small bank whose links point at questions that do not exist.
pub(super) fn dangling_catalogs() -> Arc<Catalogs> {
    let start = Question {
        id: QuestionId::from("start"),
        kind: QuestionKind::Conditional { pillar: None },
        text: "Does your company route?".to_string(),
        options: vec![AnswerOption::plain("yes", "Yes"), AnswerOption::plain("no", "No")],
        default_next: Some(QuestionId::from("scored")),
        conditional_next: BTreeMap::from([(
            OptionId::from("yes"),
            QuestionId::from("missing_branch"),
        )]),
    };
    let scored = Question {
        id: QuestionId::from("scored"),
        kind: QuestionKind::Scored {
            pillar: PillarRef::new("strategy", "vision"),
        },
        text: "Vision?".to_string(),
        options: vec![AnswerOption::scored("full", "Full", 9)],
        default_next: Some(QuestionId::from("missing_default")),
        conditional_next: BTreeMap::new(),
    };

    Arc::new(Catalogs {
        questions: QuestionBank::new(vec![start, scored], QuestionId::from("start"))
            .expect("bank with dangling links is still constructible"),
        dimensions: DimensionCatalog::standard().expect("standard dimensions"),
    })
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<HashMap<AssessmentId, Assessment>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self, id: &AssessmentId) -> Option<Assessment> {
        self.records.lock().expect("lock").get(id).cloned()
    }
}

impl AssessmentRepository for MemoryRepository {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(assessment.id.clone(), assessment.clone());
        Ok(assessment)
    }

    fn update(&self, assessment: Assessment) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        match guard.get_mut(&assessment.id) {
            Some(existing) => {
                *existing = assessment;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        Ok(self.records.lock().expect("lock").get(id).cloned())
    }

    fn delete(&self, id: &AssessmentId) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("lock")
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<Assessment>, RepositoryError> {
        Ok(self.records.lock().expect("lock").values().cloned().collect())
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert(&self, _assessment: Assessment) -> Result<Assessment, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn update(&self, _assessment: Assessment) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn delete(&self, _id: &AssessmentId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }
}

pub(super) fn build_service() -> (Arc<AssessmentService<MemoryRepository>>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(AssessmentService::new(catalogs(), repository.clone()));
    (service, repository)
}

/// Answers every question of a fresh assessment with `pick` until completion.
pub(super) fn complete_with(
    service: &AssessmentService<MemoryRepository>,
    pick: impl Fn(&Question) -> OptionId,
) -> AssessmentId {
    let started = service
        .start(CompanyInfo {
            name: Some("Acme Bakery".to_string()),
            ..CompanyInfo::default()
        })
        .expect("assessment starts");
    let catalogs = catalogs();
    let mut question_id = started.current_question.id.clone();

    loop {
        let question = catalogs
            .questions
            .question(&question_id)
            .expect("question exists");
        match service
            .submit_answer(&started.assessment_id, &question_id, &pick(question))
            .expect("answer accepted")
        {
            crate::assessment::AnswerOutcome::Next { question, .. } => question_id = question.id,
            crate::assessment::AnswerOutcome::Completed { .. } => break,
        }
    }

    started.assessment_id
}

pub(super) async fn json_body(response: HttpResponse) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    serde_json::from_slice(&bytes).expect("json body")
}
