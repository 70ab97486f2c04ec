use std::collections::BTreeMap;

use super::{AnswerOption, PillarRef, Question, QuestionKind};
use crate::assessment::domain::{OptionId, QuestionId};

fn question(
    id: &str,
    kind: QuestionKind,
    text: &str,
    next: Option<&str>,
    options: Vec<AnswerOption>,
) -> Question {
    Question {
        id: QuestionId::from(id),
        kind,
        text: text.to_string(),
        options,
        default_next: next.map(QuestionId::from),
        conditional_next: BTreeMap::new(),
    }
}

fn scored(
    id: &str,
    dimension: &str,
    pillar: &str,
    text: &str,
    next: Option<&str>,
    options: [(&str, &str, u32); 4],
) -> Question {
    question(
        id,
        QuestionKind::Scored {
            pillar: PillarRef::new(dimension, pillar),
        },
        text,
        next,
        options
            .into_iter()
            .map(|(option, label, score)| AnswerOption::scored(option, label, score))
            .collect(),
    )
}

fn branch(question: Question, links: &[(&str, &str)]) -> Question {
    let conditional_next = links
        .iter()
        .map(|(option, target)| (OptionId::from(*option), QuestionId::from(*target)))
        .collect();
    Question {
        conditional_next,
        ..question
    }
}

pub(super) fn standard_questions() -> Vec<Question> {
    vec![
        question(
            "intro_company_size",
            QuestionKind::Intro,
            "Hello! How many employees does your company have?",
            Some("intro_sector"),
            vec![
                AnswerOption::valued("micro", "1-10 employees", "micro"),
                AnswerOption::valued("small", "11-50 employees", "small"),
                AnswerOption::valued("medium", "51-250 employees", "medium"),
                AnswerOption::valued("large", "250+ employees", "large"),
            ],
        ),
        question(
            "intro_sector",
            QuestionKind::Intro,
            "Which sector does your company operate in?",
            Some("strategy_vision"),
            vec![
                AnswerOption::valued("retail", "Retail", "retail"),
                AnswerOption::valued("services", "Services", "services"),
                AnswerOption::valued("industry", "Industry", "industry"),
                AnswerOption::valued("tech", "Technology", "tech"),
                AnswerOption::valued("other", "Other", "other"),
            ],
        ),
        // Strategy
        branch(
            scored(
                "strategy_vision",
                "strategy",
                "vision",
                "Does your company have a defined digital vision?",
                Some("strategy_objectives"),
                [
                    ("none", "No", 0),
                    ("informal", "Informal, not written down", 3),
                    ("documented", "Documented and shared", 6),
                    ("integrated", "Integrated into the company strategy", 9),
                ],
            ),
            &[("none", "strategy_vision_priority")],
        ),
        question(
            "strategy_vision_priority",
            QuestionKind::Conditional {
                pillar: Some(PillarRef::new("strategy", "vision")),
            },
            "Is digital transformation on the leadership agenda for the next 12 months?",
            Some("strategy_objectives"),
            vec![
                AnswerOption::plain("yes", "Yes"),
                AnswerOption::plain("no", "No"),
            ],
        ),
        scored(
            "strategy_objectives",
            "strategy",
            "objectives",
            "Are digital objectives tracked with measurable KPIs?",
            Some("strategy_budget"),
            [
                ("none", "No digital objectives", 0),
                ("qualitative", "Qualitative objectives only", 3),
                ("some_kpis", "A few KPIs, reviewed occasionally", 6),
                ("managed", "KPIs reviewed in every steering meeting", 9),
            ],
        ),
        scored(
            "strategy_budget",
            "strategy",
            "budget",
            "How is your digital budget allocated?",
            Some("strategy_roadmap"),
            [
                ("none", "No dedicated budget", 0),
                ("ad_hoc", "Case by case", 3),
                ("annual", "Annual dedicated budget", 6),
                ("multi_year", "Multi-year investment plan", 9),
            ],
        ),
        scored(
            "strategy_roadmap",
            "strategy",
            "roadmap",
            "Does your company follow a digital transformation roadmap?",
            Some("culture_skills"),
            [
                ("none", "No roadmap", 0),
                ("draft", "A draft exists", 3),
                ("followed", "A roadmap is followed", 6),
                ("steered", "Roadmap steered and updated quarterly", 9),
            ],
        ),
        // Culture & people
        scored(
            "culture_skills",
            "culture",
            "skills",
            "How would you rate your teams' digital skills?",
            Some("culture_training"),
            [
                ("basic", "Basic office tools only", 0),
                ("intermediate", "Comfortable with business software", 3),
                ("advanced", "Advanced users in most teams", 6),
                ("expert", "In-house digital experts", 9),
            ],
        ),
        scored(
            "culture_training",
            "culture",
            "training",
            "How often do employees receive digital training?",
            Some("culture_change"),
            [
                ("never", "Never", 0),
                ("occasional", "Occasionally", 3),
                ("yearly", "Yearly training plan", 6),
                ("continuous", "Continuous learning programme", 9),
            ],
        ),
        scored(
            "culture_change",
            "culture",
            "change",
            "How are new digital tools introduced to your teams?",
            Some("culture_innovation"),
            [
                ("imposed", "Imposed without support", 0),
                ("announced", "Announced with a short demo", 3),
                ("supported", "Supported by champions", 6),
                ("co_built", "Co-built with the users", 9),
            ],
        ),
        scored(
            "culture_innovation",
            "culture",
            "innovation",
            "Are employees encouraged to propose digital improvements?",
            Some("customer_channels"),
            [
                ("no", "No", 0),
                ("informally", "Informally", 3),
                ("process", "Through an idea process", 6),
                ("rewarded", "Ideas are funded and rewarded", 9),
            ],
        ),
        // Customer relationship
        scored(
            "customer_channels",
            "customer",
            "channels",
            "Which digital channels do you use to reach customers?",
            Some("customer_experience"),
            [
                ("none", "None", 0),
                ("website", "A showcase website", 3),
                ("multi", "Website, social media and e-mail", 6),
                ("omnichannel", "Integrated omnichannel presence", 9),
            ],
        ),
        scored(
            "customer_experience",
            "customer",
            "experience",
            "Can customers complete their journey online (order, pay, get support)?",
            Some("customer_data_usage"),
            [
                ("no", "No", 0),
                ("partially", "Partially", 3),
                ("mostly", "Most steps", 6),
                ("fully", "End to end", 9),
            ],
        ),
        scored(
            "customer_data_usage",
            "customer",
            "data_usage",
            "How do you use customer data?",
            Some("customer_personalization"),
            [
                ("none", "We do not collect it", 0),
                ("stored", "Stored but rarely used", 3),
                ("crm", "Centralized in a CRM", 6),
                ("analyzed", "Analyzed to drive decisions", 9),
            ],
        ),
        scored(
            "customer_personalization",
            "customer",
            "personalization",
            "Do you personalize offers and communication?",
            Some("process_automation"),
            [
                ("no", "No", 0),
                ("segments", "Broad segments", 3),
                ("targeted", "Targeted campaigns", 6),
                ("individual", "Individual, real-time personalization", 9),
            ],
        ),
        // Processes
        scored(
            "process_automation",
            "process",
            "automation",
            "How automated are your repetitive tasks?",
            Some("process_integration"),
            [
                ("manual", "Mostly manual", 0),
                ("some", "A few automated tasks", 3),
                ("many", "Many automated workflows", 6),
                ("systematic", "Systematically automated", 9),
            ],
        ),
        scored(
            "process_integration",
            "process",
            "integration",
            "Do your business applications share data?",
            Some("process_agility"),
            [
                ("silos", "Isolated tools", 0),
                ("exports", "Manual exports and imports", 3),
                ("partial", "Partially connected", 6),
                ("integrated", "Fully integrated", 9),
            ],
        ),
        scored(
            "process_agility",
            "process",
            "agility",
            "How quickly can you adapt a business process?",
            Some("process_optimization"),
            [
                ("months", "Several months", 0),
                ("weeks", "A few weeks", 3),
                ("days", "A few days", 6),
                ("continuous", "Continuously", 9),
            ],
        ),
        scored(
            "process_optimization",
            "process",
            "optimization",
            "Do you measure and improve process performance?",
            Some("technology_infrastructure"),
            [
                ("never", "Never", 0),
                ("sometimes", "Occasionally", 3),
                ("regularly", "Regularly with indicators", 6),
                ("continuous", "Continuous improvement loop", 9),
            ],
        ),
        // Technology
        scored(
            "technology_infrastructure",
            "technology",
            "infrastructure",
            "How would you describe your IT infrastructure?",
            Some("technology_tools"),
            [
                ("obsolete", "Obsolete", 0),
                ("functional", "Functional but aging", 3),
                ("modern", "Modern and maintained", 6),
                ("scalable", "Modern, scalable and monitored", 9),
            ],
        ),
        scored(
            "technology_tools",
            "technology",
            "tools",
            "Which collaboration tools do your teams use?",
            Some("technology_cloud"),
            [
                ("email", "E-mail only", 0),
                ("shared_drive", "Shared drives", 3),
                ("suite", "A collaboration suite", 6),
                ("integrated", "An integrated digital workplace", 9),
            ],
        ),
        branch(
            scored(
                "technology_cloud",
                "technology",
                "cloud",
                "To what extent do you use cloud services?",
                Some("technology_analytics"),
                [
                    ("none", "Not at all", 0),
                    ("storage", "File storage only", 3),
                    ("business_apps", "Several business applications", 6),
                    ("extensive", "Most of our systems", 9),
                ],
            ),
            &[("extensive", "technology_cloud_advanced")],
        ),
        question(
            "technology_cloud_advanced",
            QuestionKind::Scored {
                pillar: PillarRef::new("technology", "cloud"),
            },
            "Do your teams work securely from anywhere on any device?",
            Some("technology_analytics"),
            vec![
                AnswerOption::scored("no", "No", 0),
                AnswerOption::scored("partially", "Some teams", 2),
                AnswerOption::scored("yes", "Everyone", 3),
            ],
        ),
        scored(
            "technology_analytics",
            "technology",
            "analytics",
            "How do you produce management reports?",
            Some("security_policies"),
            [
                ("none", "No reporting", 0),
                ("spreadsheets", "Spreadsheets", 3),
                ("dashboards", "Dashboards", 6),
                ("bi", "Self-service BI and predictive analytics", 9),
            ],
        ),
        // Security
        scored(
            "security_policies",
            "security",
            "policies",
            "Does your company have a written IT security policy?",
            Some("security_protection"),
            [
                ("none", "No", 0),
                ("informal", "Informal rules", 3),
                ("written", "Written policy", 6),
                ("audited", "Written, applied and audited", 9),
            ],
        ),
        scored(
            "security_protection",
            "security",
            "protection",
            "How are your data backed up and protected?",
            Some("security_compliance"),
            [
                ("none", "No backups", 0),
                ("manual", "Manual backups", 3),
                ("automated", "Automated backups", 6),
                ("tested", "Automated, encrypted and restore-tested", 9),
            ],
        ),
        branch(
            question(
                "security_compliance",
                QuestionKind::Conditional {
                    pillar: Some(PillarRef::new("security", "compliance")),
                },
                "Does your company process personal data of customers or employees?",
                Some("security_compliance_general"),
                vec![
                    AnswerOption::plain("yes", "Yes"),
                    AnswerOption::plain("no", "No"),
                ],
            ),
            &[
                ("yes", "security_compliance_gdpr"),
                ("no", "security_compliance_general"),
            ],
        ),
        scored(
            "security_compliance_gdpr",
            "security",
            "compliance",
            "Where do you stand on personal data regulation (e.g. GDPR)?",
            Some("security_awareness"),
            [
                ("unaware", "Not addressed", 0),
                ("started", "Work has started", 3),
                ("compliant", "Compliant with a processing register", 6),
                ("governed", "Compliant, with a data protection officer and audits", 9),
            ],
        ),
        scored(
            "security_compliance_general",
            "security",
            "compliance",
            "Do you track the regulatory requirements that apply to your systems?",
            Some("security_awareness"),
            [
                ("no", "No", 0),
                ("ad_hoc", "When an issue arises", 3),
                ("tracked", "Tracked in a register", 6),
                ("audited", "Tracked and audited", 9),
            ],
        ),
        scored(
            "security_awareness",
            "security",
            "awareness",
            "Are employees trained to recognize phishing and cyber threats?",
            None,
            [
                ("never", "Never", 0),
                ("once", "Once", 3),
                ("yearly", "Yearly sessions", 6),
                ("continuous", "Continuous programme with simulations", 9),
            ],
        ),
    ]
}
