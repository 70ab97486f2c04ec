use super::{Dimension, MaturityProfile, Pillar, MAX_PILLAR_SCORE};
use crate::assessment::domain::{DimensionId, PillarId};

fn dimension(
    id: &str,
    name: &str,
    description: &str,
    color: &str,
    pillars: [(&str, &str); 4],
) -> Dimension {
    Dimension {
        id: DimensionId::from(id),
        name: name.to_string(),
        description: description.to_string(),
        color: color.to_string(),
        pillars: pillars
            .into_iter()
            .map(|(id, name)| Pillar {
                id: PillarId::from(id),
                name: name.to_string(),
                max_score: MAX_PILLAR_SCORE,
            })
            .collect(),
    }
}

pub(super) fn dimensions() -> Vec<Dimension> {
    vec![
        dimension(
            "strategy",
            "Strategy",
            "Digital vision and planning of the company",
            "#6366f1",
            [
                ("vision", "Digital Vision"),
                ("objectives", "Objectives & KPIs"),
                ("budget", "Budget & Resources"),
                ("roadmap", "Transformation Roadmap"),
            ],
        ),
        dimension(
            "culture",
            "Culture & People",
            "Digital skills and organization",
            "#ec4899",
            [
                ("skills", "Digital Skills"),
                ("training", "Continuous Training"),
                ("change", "Change Management"),
                ("innovation", "Innovation Culture"),
            ],
        ),
        dimension(
            "customer",
            "Customer Relationship",
            "Digital customer experience and engagement",
            "#14b8a6",
            [
                ("channels", "Digital Channels"),
                ("experience", "Customer Experience"),
                ("data_usage", "Customer Data Usage"),
                ("personalization", "Personalization"),
            ],
        ),
        dimension(
            "process",
            "Processes",
            "Digitization and optimization of business processes",
            "#f97316",
            [
                ("automation", "Automation"),
                ("integration", "Systems Integration"),
                ("agility", "Operational Agility"),
                ("optimization", "Continuous Optimization"),
            ],
        ),
        dimension(
            "technology",
            "Technology",
            "Infrastructure and digital tools",
            "#0ea5e9",
            [
                ("infrastructure", "IT Infrastructure"),
                ("tools", "Digital Tools"),
                ("cloud", "Cloud & Mobility"),
                ("analytics", "Analytics & BI"),
            ],
        ),
        dimension(
            "security",
            "Security",
            "Cybersecurity and data protection",
            "#64748b",
            [
                ("policies", "Security Policies"),
                ("protection", "Data Protection"),
                ("compliance", "Regulatory Compliance"),
                ("awareness", "Security Awareness"),
            ],
        ),
    ]
}

fn profile(
    id: &str,
    name: &str,
    (min_score, max_score): (u32, u32),
    description: &str,
    recommendations: [&str; 3],
    color: &str,
) -> MaturityProfile {
    MaturityProfile {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        min_score,
        max_score,
        recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
        color: color.to_string(),
    }
}

pub(super) fn maturity_profiles() -> Vec<MaturityProfile> {
    vec![
        profile(
            "beginner",
            "Beginner",
            (0, 25),
            "Digital transformation is starting with limited initiatives",
            [
                "Define a clear digital vision",
                "Allocate a dedicated transformation budget",
                "Train teams in basic digital skills",
            ],
            "#ef4444",
        ),
        profile(
            "emergent",
            "Emergent",
            (26, 50),
            "Digital initiatives are under way with progressive adoption",
            [
                "Structure the transformation roadmap",
                "Strengthen digital skills",
                "Develop digital channels",
            ],
            "#f59e0b",
        ),
        profile(
            "challenger",
            "Challenger",
            (51, 75),
            "Advanced digital maturity with established practices",
            [
                "Optimize process automation",
                "Develop predictive analytics",
                "Innovate in the customer experience",
            ],
            "#3b82f6",
        ),
        profile(
            "leader",
            "Leader",
            (76, 100),
            "Digital excellence with continuous innovation",
            [
                "Keep the technological lead",
                "Share best practices",
                "Explore emerging technologies",
            ],
            "#10b981",
        ),
    ]
}
