//! Immutable question bank and the typed question model.
//!
//! Questions are a tagged variant (`QuestionKind`) instead of a free-form type
//! string. The on-disk JSON shape keeps the flat `type`/`dimension`/`pillar`
//! fields and is converted through `QuestionRecord`, which is where per-question
//! invariants are enforced.

mod record;
mod standard;
mod view;

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::domain::{DimensionId, OptionId, PillarId, QuestionId};
use super::error::{AssessmentError, CatalogError};

pub use record::{OptionRecord, QuestionRecord, QuestionRecordKind};
pub use view::{QuestionMetadata, QuestionView};

/// Entry point of the standard bank.
pub const STANDARD_ENTRY_POINT: &str = "intro_company_size";

/// A `(dimension, pillar)` coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PillarRef {
    pub dimension: DimensionId,
    pub pillar: PillarId,
}

impl PillarRef {
    pub fn new(dimension: impl Into<String>, pillar: impl Into<String>) -> Self {
        Self {
            dimension: DimensionId::new(dimension),
            pillar: PillarId::new(pillar),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    /// Company profiling; options carry a `value`, never a score.
    Intro,
    /// Contributes points to its pillar; every option carries a score.
    Scored { pillar: PillarRef },
    /// Routing question; optionally attached to a pillar for progress tracking.
    Conditional { pillar: Option<PillarRef> },
}

impl QuestionKind {
    pub const fn label(&self) -> &'static str {
        match self {
            QuestionKind::Intro => "intro",
            QuestionKind::Scored { .. } => "scored",
            QuestionKind::Conditional { .. } => "conditional",
        }
    }

    pub fn pillar(&self) -> Option<&PillarRef> {
        match self {
            QuestionKind::Intro => None,
            QuestionKind::Scored { pillar } => Some(pillar),
            QuestionKind::Conditional { pillar } => pillar.as_ref(),
        }
    }

    pub fn dimension(&self) -> Option<&DimensionId> {
        self.pillar().map(|pillar| &pillar.dimension)
    }

    pub const fn is_scored(&self) -> bool {
        matches!(self, QuestionKind::Scored { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub id: OptionId,
    pub text: String,
    pub value: Option<String>,
    pub score: Option<u32>,
}

impl AnswerOption {
    pub fn valued(id: &str, text: &str, value: &str) -> Self {
        Self {
            id: OptionId::from(id),
            text: text.to_string(),
            value: Some(value.to_string()),
            score: None,
        }
    }

    pub fn scored(id: &str, text: &str, score: u32) -> Self {
        Self {
            id: OptionId::from(id),
            text: text.to_string(),
            value: None,
            score: Some(score),
        }
    }

    pub fn plain(id: &str, text: &str) -> Self {
        Self {
            id: OptionId::from(id),
            text: text.to_string(),
            value: None,
            score: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    pub id: QuestionId,
    pub kind: QuestionKind,
    pub text: String,
    pub options: Vec<AnswerOption>,
    pub default_next: Option<QuestionId>,
    pub conditional_next: BTreeMap<OptionId, QuestionId>,
}

impl Question {
    pub fn option(&self, answer_id: &OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|option| &option.id == answer_id)
    }

    pub fn has_conditional_logic(&self) -> bool {
        !self.conditional_next.is_empty()
    }

    pub fn is_last(&self) -> bool {
        self.default_next.is_none()
    }

    /// Every outgoing link as `(option, target)`; the default link has no option.
    pub fn links(&self) -> impl Iterator<Item = (Option<&OptionId>, &QuestionId)> {
        self.conditional_next
            .iter()
            .map(|(option, target)| (Some(option), target))
            .chain(self.default_next.iter().map(|target| (None, target)))
    }
}

/// A link whose target is not part of the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingLink {
    pub question: QuestionId,
    pub option: Option<OptionId>,
    pub target: QuestionId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DimensionQuestionStats {
    pub count: usize,
    pub by_pillar: BTreeMap<PillarId, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuestionStats {
    pub total: usize,
    pub by_kind: BTreeMap<&'static str, usize>,
    pub by_dimension: BTreeMap<DimensionId, DimensionQuestionStats>,
    pub avg_options_per_question: f64,
}

#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
    index: HashMap<QuestionId, usize>,
    entry_point: QuestionId,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>, entry_point: QuestionId) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::EmptyBank);
        }

        let mut index = HashMap::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            if index.insert(question.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateQuestion(question.id.clone()));
            }
        }

        let Some(&entry) = index.get(&entry_point) else {
            return Err(CatalogError::MissingEntryPoint(entry_point));
        };
        if let Some(question) = find_cycle(&questions, &index, entry) {
            return Err(CatalogError::Cycle(question));
        }

        Ok(Self {
            questions,
            index,
            entry_point,
        })
    }

    /// The embedded digital-maturity bank: 2 intro, 26 scored and 2 routing questions.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::new(
            standard::standard_questions(),
            QuestionId::from(STANDARD_ENTRY_POINT),
        )
    }

    pub fn entry_point(&self) -> &QuestionId {
        &self.entry_point
    }

    pub fn first_question(&self) -> Result<&Question, AssessmentError> {
        if self.questions.is_empty() {
            return Err(AssessmentError::EmptyQuestionBank);
        }
        self.question(&self.entry_point)
            .ok_or_else(|| AssessmentError::EntryPointMissing(self.entry_point.clone()))
    }

    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.index.get(id).map(|&position| &self.questions[position])
    }

    pub fn contains(&self, id: &QuestionId) -> bool {
        self.index.contains_key(id)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions_by_dimension(&self, dimension: &DimensionId) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| question.kind.dimension() == Some(dimension))
            .collect()
    }

    pub fn questions_by_pillar(&self, dimension: &DimensionId, pillar: &PillarId) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| {
                question
                    .kind
                    .pillar()
                    .map(|tag| &tag.dimension == dimension && &tag.pillar == pillar)
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn intro_questions(&self) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| matches!(question.kind, QuestionKind::Intro))
            .collect()
    }

    pub fn scored_questions(&self) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| question.kind.is_scored())
            .collect()
    }

    /// Questions carrying answer-specific links, whatever their kind.
    pub fn conditional_questions(&self) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| question.has_conditional_logic())
            .collect()
    }

    /// Walks default links from `start`, stopping at the end, a dangling link or a cycle.
    pub fn question_flow(&self, start: &QuestionId) -> Vec<&Question> {
        let mut flow = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(start);

        while let Some(id) = current {
            if !visited.insert(id) {
                break;
            }
            let Some(question) = self.question(id) else {
                break;
            };
            flow.push(question);
            current = question.default_next.as_ref();
        }

        flow
    }

    pub fn search(&self, term: &str) -> Vec<&Question> {
        let needle = term.to_lowercase();
        self.questions
            .iter()
            .filter(|question| {
                question.id.as_str().to_lowercase().contains(&needle)
                    || question.text.to_lowercase().contains(&needle)
                    || question
                        .options
                        .iter()
                        .any(|option| option.text.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn dangling_links(&self) -> Vec<DanglingLink> {
        self.questions
            .iter()
            .flat_map(|question| {
                question
                    .links()
                    .filter(|(_, target)| !self.contains(target))
                    .map(|(option, target)| DanglingLink {
                        question: question.id.clone(),
                        option: option.cloned(),
                        target: target.clone(),
                    })
            })
            .collect()
    }

    pub fn stats(&self) -> QuestionStats {
        let mut stats = QuestionStats {
            total: self.questions.len(),
            ..QuestionStats::default()
        };

        let mut total_options = 0usize;
        for question in &self.questions {
            *stats.by_kind.entry(question.kind.label()).or_default() += 1;
            total_options += question.options.len();

            if let Some(tag) = question.kind.pillar() {
                let entry = stats.by_dimension.entry(tag.dimension.clone()).or_default();
                entry.count += 1;
                *entry.by_pillar.entry(tag.pillar.clone()).or_default() += 1;
            }
        }

        if !self.questions.is_empty() {
            let average = total_options as f64 / self.questions.len() as f64;
            stats.avg_options_per_question = (average * 10.0).round() / 10.0;
        }

        stats
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Pending,
    Active,
    Done,
}

/// First question reached twice on one path from `entry`, following every existing link.
fn find_cycle(
    questions: &[Question],
    index: &HashMap<QuestionId, usize>,
    entry: usize,
) -> Option<QuestionId> {
    fn visit(
        position: usize,
        questions: &[Question],
        index: &HashMap<QuestionId, usize>,
        marks: &mut [Visit],
    ) -> Option<QuestionId> {
        marks[position] = Visit::Active;
        for (_, target) in questions[position].links() {
            let Some(&next) = index.get(target) else {
                continue;
            };
            match marks[next] {
                Visit::Active => return Some(target.clone()),
                Visit::Pending => {
                    if let Some(found) = visit(next, questions, index, marks) {
                        return Some(found);
                    }
                }
                Visit::Done => {}
            }
        }
        marks[position] = Visit::Done;
        None
    }

    let mut marks = vec![Visit::Pending; questions.len()];
    visit(entry, questions, index, &mut marks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> QuestionBank {
        QuestionBank::standard().expect("standard bank is valid")
    }

    #[test]
    fn standard_bank_starts_with_company_size() {
        let bank = bank();
        let first = bank.first_question().expect("entry point present");
        assert_eq!(first.id.as_str(), STANDARD_ENTRY_POINT);
        assert!(matches!(first.kind, QuestionKind::Intro));
    }

    #[test]
    fn standard_bank_has_no_dangling_links() {
        assert!(bank().dangling_links().is_empty());
    }

    #[test]
    fn every_pillar_has_a_scored_question() {
        let bank = bank();
        let stats = bank.stats();
        assert_eq!(stats.by_dimension.len(), 6);
        for (dimension, entry) in &stats.by_dimension {
            assert_eq!(entry.by_pillar.len(), 4, "dimension {dimension} pillars");
        }
        assert_eq!(stats.by_kind.get("intro"), Some(&2));
    }

    #[test]
    fn rejects_duplicate_ids_and_missing_entry_point() {
        let question = bank().questions()[0].clone();
        let duplicate = QuestionBank::new(
            vec![question.clone(), question.clone()],
            question.id.clone(),
        );
        assert!(matches!(duplicate, Err(CatalogError::DuplicateQuestion(_))));

        let missing = QuestionBank::new(vec![question], QuestionId::from("nope"));
        assert!(matches!(missing, Err(CatalogError::MissingEntryPoint(_))));

        assert!(matches!(
            QuestionBank::new(Vec::new(), QuestionId::from("nope")),
            Err(CatalogError::EmptyBank)
        ));
    }

    #[test]
    fn question_flow_follows_default_links_to_the_end() {
        let bank = bank();
        let flow = bank.question_flow(bank.entry_point());
        assert_eq!(flow.first().map(|q| q.id.as_str()), Some(STANDARD_ENTRY_POINT));
        assert!(flow.last().expect("non-empty flow").is_last());
        let scored = flow.iter().filter(|q| q.kind.is_scored()).count();
        assert!(scored >= 24);
    }

    #[test]
    fn rejects_cycles_reachable_from_the_entry_point() {
        let mut questions = bank().questions().to_vec();
        questions[1].default_next = Some(QuestionId::from(STANDARD_ENTRY_POINT));
        assert!(matches!(
            QuestionBank::new(questions, QuestionId::from(STANDARD_ENTRY_POINT)),
            Err(CatalogError::Cycle(id)) if id.as_str() == STANDARD_ENTRY_POINT
        ));

        let mut questions = bank().questions().to_vec();
        let last = questions.len() - 1;
        let answer = questions[last].options[0].id.clone();
        questions[last]
            .conditional_next
            .insert(answer, QuestionId::from("strategy_vision"));
        assert!(matches!(
            QuestionBank::new(questions, QuestionId::from(STANDARD_ENTRY_POINT)),
            Err(CatalogError::Cycle(_))
        ));
    }

    #[test]
    fn question_flow_stops_on_cycles_outside_the_survey_path() {
        let base = bank();
        let entry = base.questions()[0].clone();
        let mut detached = base.questions()[2].clone();
        let mut partner = base.questions()[3].clone();
        let mut entry_alone = entry.clone();
        entry_alone.default_next = None;
        entry_alone.conditional_next.clear();
        detached.conditional_next.clear();
        partner.conditional_next.clear();
        detached.default_next = Some(partner.id.clone());
        partner.default_next = Some(detached.id.clone());

        let bank = QuestionBank::new(
            vec![entry_alone, detached.clone(), partner],
            entry.id.clone(),
        )
        .expect("cycle unreachable from the entry point is tolerated");

        assert_eq!(bank.question_flow(&detached.id).len(), 2);
    }

    #[test]
    fn search_matches_option_text_case_insensitively() {
        let bank = bank();
        let hits = bank.search("CLOUD");
        assert!(hits
            .iter()
            .any(|question| question.id.as_str().starts_with("technology_cloud")));
    }

    #[test]
    fn pillar_queries_filter_by_tag() {
        let bank = bank();
        let strategy = bank.questions_by_dimension(&DimensionId::from("strategy"));
        assert!(strategy.len() >= 4);
        let compliance = bank.questions_by_pillar(
            &DimensionId::from("security"),
            &PillarId::from("compliance"),
        );
        assert_eq!(compliance.len(), 3);
        assert_eq!(bank.conditional_questions().len(), 3);
    }
}
