use std::sync::Arc;

use super::common::*;
use crate::assessment::domain::{AssessmentStatus, CompanyInfo};
use crate::assessment::scoring::Trend;
use crate::assessment::service::{AnswerOutcome, AssessmentService, ErrorClass, QuestionFilter};

fn acme() -> CompanyInfo {
    CompanyInfo {
        name: Some("Acme Bakery".to_string()),
        ..CompanyInfo::default()
    }
}

#[test]
fn start_returns_personalized_entry_question() {
    let (service, repository) = build_service();

    let started = service.start(acme()).expect("assessment starts");

    assert!(started.assessment_id.as_str().starts_with("assess_"));
    assert_eq!(started.current_question.id.as_str(), "intro_company_size");
    assert!(started.current_question.text.contains("Acme Bakery"));
    assert_eq!(started.progress.questions_answered, 0);
    assert_eq!(started.progress.progress_score, 0);

    let stored = repository
        .stored(&started.assessment_id)
        .expect("assessment persisted");
    assert_eq!(stored.status, AssessmentStatus::InProgress);
}

#[test]
fn consecutive_starts_get_distinct_ids() {
    let (service, _) = build_service();
    let first = service.start(acme()).expect("starts");
    let second = service.start(acme()).expect("starts");
    assert_ne!(first.assessment_id, second.assessment_id);
}

#[test]
fn best_answers_complete_as_leader() {
    let (service, repository) = build_service();

    let id = complete_with(&service, best_option);

    let stored = repository.stored(&id).expect("persisted");
    assert_eq!(stored.status, AssessmentStatus::Completed);
    assert!(stored.completed_at.is_some());
    assert_eq!(stored.company_info.size.as_deref(), Some("large"));
    assert_eq!(stored.company_info.sector.as_deref(), Some("other"));

    let result = service.results(&id).expect("results available");
    assert_eq!(result.global_score, 100);
    assert_eq!(result.maturity_profile.id, "leader");
    assert!(result
        .dimension_scores
        .iter()
        .all(|dimension| dimension.percentage == 100));
}

#[test]
fn first_answers_complete_as_beginner_with_profile_captured() {
    let (service, repository) = build_service();

    let id = complete_with(&service, first_option);

    let stored = repository.stored(&id).expect("persisted");
    assert_eq!(stored.company_info.size.as_deref(), Some("micro"));
    assert_eq!(stored.company_info.sector.as_deref(), Some("retail"));
    assert!(stored
        .responses
        .iter()
        .any(|response| response.question_id.as_str() == "security_compliance_gdpr"));

    let summary = service.summary(&id).expect("summary");
    assert_eq!(summary.global_score, 0);
    assert_eq!(summary.profile_id, "beginner");
}

#[test]
fn answer_moves_to_the_resolved_question() {
    let (service, repository) = build_service();
    let started = service.start(acme()).expect("starts");

    let outcome = service
        .submit_answer(&started.assessment_id, &"technology_cloud".into(), &"extensive".into())
        .expect("answer accepted");

    match outcome {
        AnswerOutcome::Next { question, progress } => {
            assert_eq!(question.id.as_str(), "technology_cloud_advanced");
            assert_eq!(progress.questions_answered, 1);
            assert_eq!(progress.progress_score, 100);
        }
        AnswerOutcome::Completed { .. } => panic!("survey should continue"),
    }
    let stored = repository.stored(&started.assessment_id).expect("persisted");
    assert_eq!(stored.current_question_id.as_str(), "technology_cloud_advanced");
}

#[test]
fn invalid_answer_is_rejected_without_side_effects() {
    let (service, repository) = build_service();
    let started = service.start(acme()).expect("starts");

    let error = service
        .submit_answer(&started.assessment_id, &"strategy_budget".into(), &"bogus".into())
        .expect_err("unknown option");
    assert_eq!(error.class(), ErrorClass::BadRequest);

    let error = service
        .submit_answer(&started.assessment_id, &"ghost".into(), &"yes".into())
        .expect_err("unknown question");
    assert_eq!(error.class(), ErrorClass::BadRequest);

    let stored = repository.stored(&started.assessment_id).expect("persisted");
    assert!(stored.responses.is_empty());
    assert_eq!(stored.current_question_id.as_str(), "intro_company_size");
}

#[test]
fn unknown_assessment_is_not_found() {
    let (service, _) = build_service();
    let missing = "assess_missing".into();

    for error in [
        service.get(&missing).map(|_| ()).expect_err("get"),
        service.progress(&missing).map(|_| ()).expect_err("progress"),
        service.results(&missing).map(|_| ()).expect_err("results"),
        service.delete(&missing).expect_err("delete"),
        service
            .submit_answer(&missing, &"intro_sector".into(), &"retail".into())
            .map(|_| ())
            .expect_err("answer"),
    ] {
        assert_eq!(error.class(), ErrorClass::NotFound);
    }
}

#[test]
fn completed_assessment_rejects_answers_and_resume() {
    let (service, _) = build_service();
    let id = complete_with(&service, best_option);

    let error = service
        .submit_answer(&id, &"strategy_vision".into(), &"none".into())
        .expect_err("closed");
    assert_eq!(error.class(), ErrorClass::BadRequest);

    let error = service.resume(&id).expect_err("already completed");
    assert_eq!(error.class(), ErrorClass::BadRequest);

    let view = service.get(&id).expect("completed view");
    assert!(view.current_question.is_none());
    assert_eq!(view.progress.estimated_time_remaining.percent_complete, 100);
}

#[test]
fn resume_returns_current_question_and_answer_path() {
    let (service, _) = build_service();
    let started = service.start(acme()).expect("starts");
    let id = started.assessment_id;
    service
        .submit_answer(&id, &"intro_company_size".into(), &"small".into())
        .expect("answered");
    service
        .submit_answer(&id, &"intro_sector".into(), &"services".into())
        .expect("answered");

    let resumed = service.resume(&id).expect("resumable");
    assert_eq!(resumed.current_question.id.as_str(), "strategy_vision");
    assert_eq!(resumed.path.len(), 2);
    assert_eq!(resumed.path[1].answer_id.as_str(), "services");
    assert!(resumed.recent_scores.is_empty());

    service
        .submit_answer(&id, &"strategy_vision".into(), &"integrated".into())
        .expect("answered");
    let resumed = service.resume(&id).expect("resumable");
    assert_eq!(resumed.current_question.id.as_str(), "strategy_objectives");
    let recent: Vec<u32> = resumed.recent_scores.iter().map(|recent| recent.score).collect();
    assert_eq!(recent, vec![9]);
    assert_eq!(resumed.path[2].score_percentage, Some(100));
}

#[test]
fn results_require_completion() {
    let (service, _) = build_service();
    let started = service.start(acme()).expect("starts");

    let error = service.results(&started.assessment_id).expect_err("not completed");
    assert_eq!(error.class(), ErrorClass::Conflict);
    let error = service
        .recalculate(&started.assessment_id)
        .expect_err("not completed");
    assert_eq!(error.class(), ErrorClass::Conflict);
}

#[test]
fn recalculate_replaces_the_stored_result() {
    let (service, repository) = build_service();
    let id = complete_with(&service, best_option);
    let before = service.results(&id).expect("results");

    let after = service.recalculate(&id).expect("recalculated");

    assert_eq!(after.result.global_score, before.global_score);
    assert!(after.result.calculated_at >= before.calculated_at);
    assert_eq!(after.comparison.global_score_change, 0);
    assert!(!after.comparison.profile_changed);
    assert_eq!(after.comparison.trend, Trend::Stable);
    assert_eq!(after.comparison.dimension_changes.len(), 6);
    let stored = repository.stored(&id).expect("persisted");
    assert_eq!(stored.scores, Some(after.result));
}

#[test]
fn question_catalog_queries_filter_the_bank() {
    let (service, _) = build_service();

    let everything = service
        .questions(&QuestionFilter::default())
        .expect("unfiltered listing");
    assert_eq!(everything.total, 30);

    let compliance = service
        .questions(&QuestionFilter {
            dimension: Some("security".into()),
            pillar: Some("compliance".into()),
            ..QuestionFilter::default()
        })
        .expect("pillar listing");
    assert_eq!(compliance.total, 3);

    let branching_scored = service
        .questions(&QuestionFilter {
            kind: Some("scored".to_string()),
            branching: true,
            ..QuestionFilter::default()
        })
        .expect("branching listing");
    let ids: Vec<&str> = branching_scored
        .questions
        .iter()
        .map(|view| view.id.as_str())
        .collect();
    assert_eq!(ids, vec!["strategy_vision", "technology_cloud"]);

    let error = service
        .questions(&QuestionFilter {
            kind: Some("essay".to_string()),
            ..QuestionFilter::default()
        })
        .expect_err("unknown kind");
    assert_eq!(error.class(), ErrorClass::BadRequest);

    let error = service
        .questions(&QuestionFilter {
            pillar: Some("compliance".into()),
            ..QuestionFilter::default()
        })
        .expect_err("pillar without dimension");
    assert_eq!(error.class(), ErrorClass::BadRequest);
}

#[test]
fn question_lookup_distinguishes_unknown_ids() {
    let (service, _) = build_service();

    let view = service
        .question(&"security_compliance".into())
        .expect("known question");
    assert_eq!(view.kind, "conditional");
    assert!(view.metadata.has_conditional_logic);

    let error = service
        .question(&"teleportation".into())
        .expect_err("unknown question");
    assert_eq!(error.class(), ErrorClass::NotFound);
}

#[test]
fn dimension_detail_reports_pillars_and_average() {
    let (service, _) = build_service();
    let id = complete_with(&service, best_option);

    let detail = service
        .dimension_detail(&id, &"technology".into())
        .expect("technology detail");
    assert_eq!(detail.dimension.percentage, 100);
    assert_eq!(detail.responses.len(), 5);
    // Nine on every pillar question plus three on the advanced cloud follow-up.
    assert_eq!(detail.average_response_score, Some(7.8));
    assert!(detail.strongest_pillar.is_some());

    let error = service
        .dimension_detail(&id, &"astrology".into())
        .expect_err("unknown dimension");
    assert_eq!(error.class(), ErrorClass::NotFound);
}

#[test]
fn delete_removes_the_assessment() {
    let (service, repository) = build_service();
    let started = service.start(acme()).expect("starts");

    service.delete(&started.assessment_id).expect("deleted");

    assert!(repository.stored(&started.assessment_id).is_none());
    let error = service.delete(&started.assessment_id).expect_err("gone");
    assert_eq!(error.class(), ErrorClass::NotFound);
}

#[test]
fn abandoned_assessment_is_closed() {
    let (service, _) = build_service();
    let started = service.start(acme()).expect("starts");
    let id = started.assessment_id;

    let abandoned = service.abandon(&id).expect("abandoned");
    assert_eq!(abandoned.status, AssessmentStatus::Abandoned);

    assert_eq!(service.resume(&id).expect_err("closed").class(), ErrorClass::BadRequest);
    assert_eq!(service.abandon(&id).expect_err("closed").class(), ErrorClass::BadRequest);
}

#[test]
fn list_orders_by_most_recent_update() {
    let (service, _) = build_service();
    let older = service.start(acme()).expect("starts").assessment_id;
    let newer = complete_with(&service, first_option);

    let listings = service.list().expect("listing");

    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].assessment_id, newer);
    assert_eq!(listings[0].global_score, Some(0));
    assert_eq!(listings[1].assessment_id, older);
    assert_eq!(listings[1].global_score, None);
    assert_eq!(listings[1].company_name.as_deref(), Some("Acme Bakery"));
}

#[test]
fn service_without_hooks_leaves_company_info_alone() {
    let repository = Arc::new(MemoryRepository::default());
    let service = AssessmentService::with_hooks(catalogs(), repository.clone(), Vec::new());
    let started = service.start(acme()).expect("starts");

    service
        .submit_answer(&started.assessment_id, &"intro_company_size".into(), &"large".into())
        .expect("answered");

    let stored = repository.stored(&started.assessment_id).expect("persisted");
    assert_eq!(stored.company_info, acme());
}

#[test]
fn repository_outage_is_an_internal_error() {
    let service = AssessmentService::new(catalogs(), Arc::new(UnavailableRepository));

    assert_eq!(service.start(acme()).map(|_| ()).expect_err("offline").class(), ErrorClass::Internal);
    assert_eq!(service.list().map(|_| ()).expect_err("offline").class(), ErrorClass::Internal);
}

#[test]
fn catalog_accessors_expose_the_standard_catalogs() {
    let (service, _) = build_service();
    assert_eq!(service.dimensions().dimensions().len(), 6);
    assert_eq!(service.question_stats().total, 30);
}
