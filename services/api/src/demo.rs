use crate::infra::InMemoryAssessmentRepository;
use clap::{Args, Subcommand, ValueEnum};
use digi_assess::assessment::{
    AnswerOutcome, AssessmentError, AssessmentResult, AssessmentService, AssessmentServiceError,
    CatalogConfig, Catalogs, CompanyInfo, OptionId, Question, QuestionId,
};
use digi_assess::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;

/// How the scripted respondent picks an answer for each question.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum AnswerStrategy {
    /// Highest-scoring option everywhere
    #[default]
    Highest,
    /// Lowest-scoring option everywhere
    Lowest,
    /// Option closest to the middle of the scale
    Middle,
}

impl AnswerStrategy {
    /// Unscored questions always take their first option.
    pub(crate) fn pick(self, question: &Question) -> Option<OptionId> {
        let scored = question.options.iter().filter(|option| option.score.is_some());
        let chosen = match self {
            AnswerStrategy::Highest => scored.max_by_key(|option| option.score),
            AnswerStrategy::Lowest => scored.min_by_key(|option| option.score),
            AnswerStrategy::Middle => {
                scored.min_by_key(|option| option.score.unwrap_or(0).abs_diff(5))
            }
        };
        chosen
            .or_else(|| question.options.first())
            .map(|option| option.id.clone())
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Company name shown in the personalized questions
    #[arg(long, default_value = "Demo Company")]
    pub(crate) company_name: String,
    /// Answer selection used by the scripted respondent
    #[arg(long, value_enum, default_value_t = AnswerStrategy::Highest)]
    pub(crate) strategy: AnswerStrategy,
    /// Directory holding dimensions.json and questions.json (embedded catalogs otherwise)
    #[arg(long)]
    pub(crate) catalog_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum CatalogCommand {
    /// Print the default question path from a starting question
    Flow(FlowArgs),
    /// Print question counts per kind, dimension and pillar
    Stats(CatalogArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// Directory holding dimensions.json and questions.json (embedded catalogs otherwise)
    #[arg(long)]
    pub(crate) catalog_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct FlowArgs {
    /// Question to start from (defaults to the entry point)
    #[arg(long)]
    pub(crate) from: Option<String>,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
}

fn load_catalogs(catalog_dir: Option<PathBuf>) -> Result<Arc<Catalogs>, AppError> {
    let config = CatalogConfig {
        directory: catalog_dir,
    };
    Ok(Arc::new(Catalogs::initialize(&config)?))
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        company_name,
        strategy,
        catalog_dir,
    } = args;

    let catalogs = load_catalogs(catalog_dir)?;
    let service = AssessmentService::new(
        catalogs.clone(),
        Arc::new(InMemoryAssessmentRepository::default()),
    );

    println!("Digital maturity assessment demo ({strategy:?} answers)");
    let started = service.start(CompanyInfo {
        name: Some(company_name),
        ..CompanyInfo::default()
    })?;
    let assessment_id = started.assessment_id;
    let mut question_id = started.current_question.id;
    let mut step = 1;

    let result = loop {
        let question = catalogs
            .questions
            .question(&question_id)
            .ok_or_else(|| {
                AssessmentServiceError::from(AssessmentError::QuestionNotFound(question_id.clone()))
            })?;
        let Some(answer_id) = strategy.pick(question) else {
            println!("Question {} has no options, stopping", question.id);
            return Ok(());
        };
        let answer_text = question
            .option(&answer_id)
            .map(|option| option.text.as_str())
            .unwrap_or_default();
        println!("{step:>2}. {} -> {answer_text}", question.text);

        match service.submit_answer(&assessment_id, &question_id, &answer_id)? {
            AnswerOutcome::Next { question, .. } => question_id = question.id,
            AnswerOutcome::Completed { result, .. } => break result,
        }
        step += 1;
    };

    render_result(&result);
    Ok(())
}

pub(crate) fn render_result(result: &AssessmentResult) {
    println!(
        "\nGlobal score: {}% | Profile: {} ({}-{})",
        result.global_score,
        result.maturity_profile.name,
        result.maturity_profile.min_score,
        result.maturity_profile.max_score
    );
    println!("{}", result.maturity_profile.description);

    println!("\nDimension scores");
    for dimension in &result.dimension_scores {
        println!(
            "- {}: {}% ({}/{} points, {})",
            dimension.dimension_name,
            dimension.percentage,
            dimension.total_points,
            dimension.max_points,
            dimension.level().label()
        );
        for pillar in &dimension.pillar_scores {
            println!(
                "    {}: {}/{} ({}%)",
                pillar.pillar_name, pillar.points, pillar.max_points, pillar.percentage
            );
        }
    }

    println!("\nStrengths");
    for strength in &result.strengths {
        println!("- {} ({}%)", strength.dimension_name, strength.percentage);
    }

    println!("\nGaps");
    for gap in &result.gaps {
        println!(
            "- {} ({}%, {} points of headroom)",
            gap.dimension_name, gap.percentage, gap.improvement_potential
        );
    }

    if !result.priority_actions.is_empty() {
        println!("\nPriority actions");
        for action in &result.priority_actions {
            println!(
                "- [{}] {} / {} at {}%",
                action.priority.label(),
                action.dimension_name,
                action.pillar_name,
                action.current_score
            );
        }
    }

    if !result.maturity_profile.recommendations.is_empty() {
        println!("\nRecommendations");
        for recommendation in &result.maturity_profile.recommendations {
            println!("- {recommendation}");
        }
    }
}

pub(crate) fn run_catalog(command: CatalogCommand) -> Result<(), AppError> {
    match command {
        CatalogCommand::Flow(FlowArgs { from, catalog }) => {
            let catalogs = load_catalogs(catalog.catalog_dir)?;
            let start = from
                .map(QuestionId)
                .unwrap_or_else(|| catalogs.questions.entry_point().clone());
            let flow = catalogs.questions.question_flow(&start);
            if flow.is_empty() {
                println!("Question {start} is not in the bank");
                return Ok(());
            }

            println!("Default path from {start} ({} questions)", flow.len());
            for (index, question) in flow.iter().enumerate() {
                let tag = question
                    .kind
                    .pillar()
                    .map(|tag| format!(" [{}/{}]", tag.dimension, tag.pillar))
                    .unwrap_or_default();
                let branches = if question.has_conditional_logic() {
                    format!(" ({} branch(es))", question.conditional_next.len())
                } else {
                    String::new()
                };
                println!(
                    "{:>2}. {} <{}>{tag}{branches}",
                    index + 1,
                    question.id,
                    question.kind.label()
                );
            }
        }
        CatalogCommand::Stats(CatalogArgs { catalog_dir }) => {
            let catalogs = load_catalogs(catalog_dir)?;
            let stats = catalogs.questions.stats();
            println!(
                "{} questions, {:.1} options on average",
                stats.total, stats.avg_options_per_question
            );
            for (kind, count) in &stats.by_kind {
                println!("- {kind}: {count}");
            }
            for (dimension, dimension_stats) in &stats.by_dimension {
                println!("{dimension}: {} question(s)", dimension_stats.count);
                for (pillar, count) in &dimension_stats.by_pillar {
                    println!("    {pillar}: {count}");
                }
            }
            let dangling = catalogs.questions.dangling_links();
            if !dangling.is_empty() {
                println!("{} dangling link(s)", dangling.len());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str) -> Question {
        let catalogs = Catalogs::standard().expect("standard catalogs");
        catalogs
            .questions
            .question(&QuestionId::from(id))
            .cloned()
            .expect("question in bank")
    }

    #[test]
    fn strategies_pick_by_score() {
        let vision = question("strategy_vision");
        assert_eq!(
            AnswerStrategy::Highest.pick(&vision),
            Some(OptionId::from("integrated"))
        );
        assert_eq!(
            AnswerStrategy::Lowest.pick(&vision),
            Some(OptionId::from("none"))
        );
        assert_eq!(
            AnswerStrategy::Middle.pick(&vision),
            Some(OptionId::from("documented"))
        );
    }

    #[test]
    fn unscored_questions_take_the_first_option() {
        let sector = question("intro_sector");
        assert_eq!(
            AnswerStrategy::Highest.pick(&sector),
            Some(OptionId::from("retail"))
        );
    }

    #[test]
    fn demo_refuses_a_catalog_whose_flow_never_ends() {
        use digi_assess::assessment::catalog::DimensionCatalogFile;
        use digi_assess::assessment::{CatalogError, DimensionCatalog};
        use serde_json::json;

        let dir = tempfile::tempdir().expect("temp dir");
        let standard = DimensionCatalog::standard().expect("standard dimensions");
        let dimensions = DimensionCatalogFile {
            dimensions: standard.dimensions().to_vec(),
            maturity_profiles: standard.maturity_profiles().to_vec(),
        };
        let questions = json!({
            "entry_point": "vision",
            "questions": [
                {
                    "id": "vision",
                    "type": "scored",
                    "dimension": "strategy",
                    "pillar": "vision",
                    "text": "Is there a digital vision?",
                    "options": [{ "id": "full", "text": "Yes", "score": 9 }],
                    "next_question": "automation"
                },
                {
                    "id": "automation",
                    "type": "scored",
                    "dimension": "process",
                    "pillar": "automation",
                    "text": "Are repetitive tasks automated?",
                    "options": [{ "id": "systematic", "text": "Yes", "score": 9 }],
                    "next_question": "vision"
                }
            ]
        });
        std::fs::write(
            dir.path().join(CatalogConfig::DIMENSIONS_FILE),
            serde_json::to_vec(&dimensions).expect("serializable"),
        )
        .expect("dimensions written");
        std::fs::write(
            dir.path().join(CatalogConfig::QUESTIONS_FILE),
            serde_json::to_vec(&questions).expect("serializable"),
        )
        .expect("questions written");

        let outcome = run_demo(DemoArgs {
            catalog_dir: Some(dir.path().to_path_buf()),
            ..DemoArgs::default()
        });
        assert!(matches!(
            outcome,
            Err(AppError::Catalog(CatalogError::Cycle(_)))
        ));
    }

    #[test]
    fn demo_and_catalog_commands_run_on_embedded_catalogs() {
        run_demo(DemoArgs {
            company_name: "Acme Bakery".to_string(),
            strategy: AnswerStrategy::Middle,
            catalog_dir: None,
        })
        .expect("demo completes");
        run_catalog(CatalogCommand::Flow(FlowArgs::default())).expect("flow prints");
        run_catalog(CatalogCommand::Stats(CatalogArgs::default())).expect("stats print");
    }
}
