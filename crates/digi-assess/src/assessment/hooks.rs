use super::domain::{CompanyInfo, QuestionId};
use super::questions::{AnswerOption, Question};

/// Side effect applied when an answer is accepted, before it is recorded.
pub trait AnswerHook: Send + Sync {
    fn on_answer(&self, company: &mut CompanyInfo, question: &Question, option: &AnswerOption);
}

/// Copies the chosen option value of the profiling questions into the company info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyProfileHook {
    pub size_question: QuestionId,
    pub sector_question: QuestionId,
}

impl Default for CompanyProfileHook {
    fn default() -> Self {
        Self {
            size_question: QuestionId::from("intro_company_size"),
            sector_question: QuestionId::from("intro_sector"),
        }
    }
}

impl AnswerHook for CompanyProfileHook {
    fn on_answer(&self, company: &mut CompanyInfo, question: &Question, option: &AnswerOption) {
        let Some(value) = option.value.clone() else {
            return;
        };

        if question.id == self.size_question {
            company.size = Some(value);
        } else if question.id == self.sector_question {
            company.sector = Some(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::domain::OptionId;
    use crate::assessment::questions::QuestionBank;

    #[test]
    fn company_profile_hook_records_size_and_sector() {
        let bank = QuestionBank::standard().expect("standard bank");
        let hook = CompanyProfileHook::default();
        let mut company = CompanyInfo::default();

        for (question_id, answer_id) in [("intro_company_size", "medium"), ("intro_sector", "tech")] {
            let question = bank
                .question(&QuestionId::from(question_id))
                .expect("intro question");
            let option = question
                .option(&OptionId::from(answer_id))
                .expect("intro option");
            hook.on_answer(&mut company, question, option);
        }

        assert_eq!(company.size.as_deref(), Some("medium"));
        assert_eq!(company.sector.as_deref(), Some("tech"));
    }

    #[test]
    fn other_questions_leave_company_untouched() {
        let bank = QuestionBank::standard().expect("standard bank");
        let question = bank
            .question(&QuestionId::from("strategy_vision"))
            .expect("scored question");
        let mut company = CompanyInfo::default();

        CompanyProfileHook::default().on_answer(&mut company, question, &question.options[0]);

        assert_eq!(company, CompanyInfo::default());
    }
}
