//! Dimension catalog, maturity profiles and the startup catalog factory.

mod standard;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{DimensionId, PillarId, QuestionId};
use super::error::{AssessmentError, CatalogError};
use super::questions::{Question, QuestionBank, STANDARD_ENTRY_POINT};

pub const MAX_PILLAR_SCORE: u32 = 9;
pub const PILLARS_PER_DIMENSION: usize = 4;
pub const DIMENSION_COUNT: usize = 6;
pub const MAX_DIMENSION_SCORE: u32 = MAX_PILLAR_SCORE * PILLARS_PER_DIMENSION as u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pillar {
    pub id: PillarId,
    pub name: String,
    #[serde(default = "default_max_score", alias = "maxScore")]
    pub max_score: u32,
}

fn default_max_score() -> u32 {
    MAX_PILLAR_SCORE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub id: DimensionId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub color: String,
    pub pillars: Vec<Pillar>,
}

impl Dimension {
    pub fn pillar(&self, id: &PillarId) -> Option<&Pillar> {
        self.pillars.iter().find(|pillar| &pillar.id == id)
    }

    pub fn max_points(&self) -> u32 {
        self.pillars.iter().map(|pillar| pillar.max_score).sum()
    }
}

/// Qualitative band over the global score, inclusive at both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaturityProfile {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(alias = "minScore")]
    pub min_score: u32,
    #[serde(alias = "maxScore")]
    pub max_score: u32,
    pub recommendations: Vec<String>,
    pub color: String,
}

impl MaturityProfile {
    pub fn contains(&self, score: u32) -> bool {
        self.min_score <= score && score <= self.max_score
    }
}

/// Storage shape of `dimensions.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionCatalogFile {
    pub dimensions: Vec<Dimension>,
    #[serde(alias = "maturityProfiles")]
    pub maturity_profiles: Vec<MaturityProfile>,
}

/// Storage shape of `questions.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBankFile {
    #[serde(default = "default_entry_point")]
    pub entry_point: QuestionId,
    pub questions: Vec<Question>,
}

fn default_entry_point() -> QuestionId {
    QuestionId::from(STANDARD_ENTRY_POINT)
}

/// The six dimensions and the ordered maturity profiles.
#[derive(Debug, Clone)]
pub struct DimensionCatalog {
    dimensions: Vec<Dimension>,
    profiles: Vec<MaturityProfile>,
}

impl DimensionCatalog {
    pub fn new(
        dimensions: Vec<Dimension>,
        profiles: Vec<MaturityProfile>,
    ) -> Result<Self, CatalogError> {
        if dimensions.len() != DIMENSION_COUNT {
            return Err(CatalogError::DimensionCount {
                expected: DIMENSION_COUNT,
                found: dimensions.len(),
            });
        }

        let mut seen = HashSet::new();
        for dimension in &dimensions {
            if !seen.insert(&dimension.id) {
                return Err(CatalogError::DuplicateDimension(dimension.id.clone()));
            }
            if dimension.pillars.len() != PILLARS_PER_DIMENSION {
                return Err(CatalogError::PillarCount {
                    dimension: dimension.id.clone(),
                    expected: PILLARS_PER_DIMENSION,
                    found: dimension.pillars.len(),
                });
            }
            let mut pillars = HashSet::new();
            for pillar in &dimension.pillars {
                if !pillars.insert(&pillar.id) {
                    return Err(CatalogError::DuplicatePillar {
                        dimension: dimension.id.clone(),
                        pillar: pillar.id.clone(),
                    });
                }
                if pillar.max_score != MAX_PILLAR_SCORE {
                    return Err(CatalogError::PillarMaxScore {
                        dimension: dimension.id.clone(),
                        pillar: pillar.id.clone(),
                        expected: MAX_PILLAR_SCORE,
                        found: pillar.max_score,
                    });
                }
            }
        }

        validate_profiles(&profiles)?;

        Ok(Self {
            dimensions,
            profiles,
        })
    }

    pub fn standard() -> Result<Self, CatalogError> {
        Self::new(standard::dimensions(), standard::maturity_profiles())
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn maturity_profiles(&self) -> &[MaturityProfile] {
        &self.profiles
    }

    pub fn dimension(&self, id: &DimensionId) -> Option<&Dimension> {
        self.dimensions.iter().find(|dimension| &dimension.id == id)
    }

    pub fn pillar(&self, dimension: &DimensionId, pillar: &PillarId) -> Option<&Pillar> {
        self.dimension(dimension)
            .and_then(|dimension| dimension.pillar(pillar))
    }

    /// The single profile whose inclusive range holds `score`.
    pub fn profile_for(&self, score: u32) -> Result<&MaturityProfile, AssessmentError> {
        self.profiles
            .iter()
            .find(|profile| profile.contains(score))
            .ok_or(AssessmentError::ProfileNotFound(score))
    }
}

fn validate_profiles(profiles: &[MaturityProfile]) -> Result<(), CatalogError> {
    let (Some(first), Some(last)) = (profiles.first(), profiles.last()) else {
        return Err(CatalogError::NoProfiles);
    };

    for profile in profiles {
        if profile.min_score > profile.max_score {
            return Err(CatalogError::InvertedProfile {
                profile: profile.id.clone(),
                min: profile.min_score,
                max: profile.max_score,
            });
        }
    }

    for pair in profiles.windows(2) {
        if pair[0].max_score.checked_add(1) != Some(pair[1].min_score) {
            return Err(CatalogError::ProfileGap {
                previous: pair[0].id.clone(),
                next: pair[1].id.clone(),
            });
        }
    }

    if first.min_score != 0 || last.max_score != 100 {
        return Err(CatalogError::ProfileCoverage {
            min: first.min_score,
            max: last.max_score,
        });
    }

    Ok(())
}

/// Where catalogs are loaded from. `None` selects the embedded standard catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogConfig {
    pub directory: Option<PathBuf>,
}

impl CatalogConfig {
    pub const DIMENSIONS_FILE: &'static str = "dimensions.json";
    pub const QUESTIONS_FILE: &'static str = "questions.json";

    pub fn from_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
        }
    }
}

/// Read-only catalogs shared by every engine, built once at startup.
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub questions: QuestionBank,
    pub dimensions: DimensionCatalog,
}

impl Catalogs {
    pub fn initialize(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let catalogs = match &config.directory {
            Some(directory) => Self::load(directory)?,
            None => Self::standard()?,
        };

        catalogs.check_pillar_tags()?;

        let dangling = catalogs.questions.dangling_links();
        for link in &dangling {
            warn!(
                question = %link.question,
                option = ?link.option.as_ref().map(|option| option.as_str()),
                target = %link.target,
                "question links to an unknown question"
            );
        }

        info!(
            questions = catalogs.questions.len(),
            dimensions = catalogs.dimensions.dimensions().len(),
            dangling_links = dangling.len(),
            source = %config
                .directory
                .as_deref()
                .map(|dir| dir.display().to_string())
                .unwrap_or_else(|| "embedded".to_string()),
            "assessment catalogs initialized"
        );

        Ok(catalogs)
    }

    pub fn standard() -> Result<Self, CatalogError> {
        Ok(Self {
            questions: QuestionBank::standard()?,
            dimensions: DimensionCatalog::standard()?,
        })
    }

    fn load(directory: &Path) -> Result<Self, CatalogError> {
        let dimensions: DimensionCatalogFile =
            read_json(&directory.join(CatalogConfig::DIMENSIONS_FILE))?;
        let questions: QuestionBankFile =
            read_json(&directory.join(CatalogConfig::QUESTIONS_FILE))?;

        Ok(Self {
            questions: QuestionBank::new(questions.questions, questions.entry_point)?,
            dimensions: DimensionCatalog::new(dimensions.dimensions, dimensions.maturity_profiles)?,
        })
    }

    fn check_pillar_tags(&self) -> Result<(), CatalogError> {
        for question in self.questions.questions() {
            if let Some(tag) = question.kind.pillar() {
                if self.dimensions.pillar(&tag.dimension, &tag.pillar).is_none() {
                    return Err(CatalogError::UnknownPillar {
                        question: question.id.clone(),
                        dimension: tag.dimension.clone(),
                        pillar: tag.pillar.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
