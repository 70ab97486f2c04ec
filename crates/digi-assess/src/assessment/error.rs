use std::path::PathBuf;

use super::domain::{AssessmentId, AssessmentStatus, DimensionId, OptionId, PillarId, QuestionId};

/// Failures raised by the traversal, state and scoring engines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssessmentError {
    #[error("question {0} not found")]
    QuestionNotFound(QuestionId),
    #[error("answer {answer_id} is not an option of question {question_id}")]
    InvalidAnswer {
        question_id: QuestionId,
        answer_id: OptionId,
    },
    #[error("invalid question filter: {0}")]
    InvalidFilter(String),
    #[error("no maturity profile covers global score {0}")]
    ProfileNotFound(u32),
    #[error("dimension {0} not found")]
    DimensionNotFound(DimensionId),
    #[error("assessment {id} is {status} and no longer accepts changes")]
    AssessmentClosed {
        id: AssessmentId,
        status: AssessmentStatus,
    },
    #[error("assessment {0} has already been completed")]
    AlreadyCompleted(AssessmentId),
    #[error("assessment {0} has not been completed yet")]
    NotCompleted(AssessmentId),
    #[error("question bank is empty")]
    EmptyQuestionBank,
    #[error("entry point question {0} is missing from the bank")]
    EntryPointMissing(QuestionId),
}

/// Static catalog inconsistencies, detected once when catalogs are built.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("expected {expected} dimensions, found {found}")]
    DimensionCount { expected: usize, found: usize },
    #[error("dimension {dimension} declares {found} pillars, expected {expected}")]
    PillarCount {
        dimension: DimensionId,
        expected: usize,
        found: usize,
    },
    #[error("duplicate dimension id {0}")]
    DuplicateDimension(DimensionId),
    #[error("duplicate pillar {pillar} in dimension {dimension}")]
    DuplicatePillar {
        dimension: DimensionId,
        pillar: PillarId,
    },
    #[error("pillar {dimension}/{pillar} has max score {found}, expected {expected}")]
    PillarMaxScore {
        dimension: DimensionId,
        pillar: PillarId,
        expected: u32,
        found: u32,
    },
    #[error("maturity profiles are empty")]
    NoProfiles,
    #[error("maturity profile {profile} has an inverted range {min}..={max}")]
    InvertedProfile { profile: String, min: u32, max: u32 },
    #[error("maturity profiles leave a gap or overlap between {previous} and {next}")]
    ProfileGap { previous: String, next: String },
    #[error("maturity profiles must cover 0..=100 (covered {min}..={max})")]
    ProfileCoverage { min: u32, max: u32 },
    #[error("question bank is empty")]
    EmptyBank,
    #[error("entry point question {0} is missing from the bank")]
    MissingEntryPoint(QuestionId),
    #[error("duplicate question id {0}")]
    DuplicateQuestion(QuestionId),
    #[error("question flow loops back to {0}, the survey could never end")]
    Cycle(QuestionId),
    #[error("question {0} has no answer options")]
    NoOptions(QuestionId),
    #[error("option {option} of scored question {question} has no score")]
    MissingScore { question: QuestionId, option: OptionId },
    #[error("option {option} of unscored question {question} carries a score")]
    UnexpectedScore { question: QuestionId, option: OptionId },
    #[error("question {question} is tagged with unknown pillar {dimension}/{pillar}")]
    UnknownPillar {
        question: QuestionId,
        dimension: DimensionId,
        pillar: PillarId,
    },
    #[error("intro question {0} must not be tagged with a dimension or pillar")]
    TaggedIntroQuestion(QuestionId),
    #[error("scored question {0} must be tagged with a dimension and pillar")]
    UntaggedScoredQuestion(QuestionId),
    #[error("question {0} names a dimension without a pillar (or the reverse)")]
    PartialTag(QuestionId),
    #[error("unable to read catalog file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse catalog file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
