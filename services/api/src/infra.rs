use digi_assess::assessment::{Assessment, AssessmentId, AssessmentRepository, RepositoryError};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    records: Arc<Mutex<HashMap<AssessmentId, Assessment>>>,
}

impl InMemoryAssessmentRepository {
    fn guard(&self) -> Result<MutexGuard<'_, HashMap<AssessmentId, Assessment>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(assessment.id.clone(), assessment.clone());
        Ok(assessment)
    }

    fn update(&self, assessment: Assessment) -> Result<(), RepositoryError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&assessment.id) {
            guard.insert(assessment.id.clone(), assessment);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        Ok(self.guard()?.get(id).cloned())
    }

    fn delete(&self, id: &AssessmentId) -> Result<(), RepositoryError> {
        self.guard()?
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<Assessment>, RepositoryError> {
        Ok(self.guard()?.values().cloned().collect())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AssessmentStore {
    #[serde(default)]
    assessments: Vec<Assessment>,
}

/// Keeps every assessment in one `assessments.json` document.
///
/// Each operation is a full read-modify-write under a single mutex, so
/// concurrent requests for the same assessment never interleave.
pub(crate) struct JsonFileAssessmentRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileAssessmentRepository {
    pub(crate) const FILE_NAME: &'static str = "assessments.json";

    pub(crate) fn open(data_dir: &Path) -> Result<Self, RepositoryError> {
        fs::create_dir_all(data_dir).map_err(|err| {
            RepositoryError::Unavailable(format!(
                "unable to create data directory {}: {err}",
                data_dir.display()
            ))
        })?;
        let path = data_dir.join(Self::FILE_NAME);
        info!(path = %path.display(), "assessment store opened");
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    fn read(&self) -> Result<AssessmentStore, RepositoryError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(AssessmentStore::default()),
            Err(err) => return Err(unavailable("read", &self.path, err)),
        };
        serde_json::from_slice(&raw).map_err(|err| unavailable("parse", &self.path, err))
    }

    fn write(&self, store: &AssessmentStore) -> Result<(), RepositoryError> {
        let raw = serde_json::to_vec_pretty(store)
            .map_err(|err| unavailable("serialize", &self.path, err))?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, raw).map_err(|err| unavailable("write", &staging, err))?;
        fs::rename(&staging, &self.path).map_err(|err| unavailable("replace", &self.path, err))?;
        debug!(assessments = store.assessments.len(), "assessment store written");
        Ok(())
    }

    fn with_store<T>(
        &self,
        apply: impl FnOnce(&mut AssessmentStore) -> Result<(T, bool), RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))?;
        let mut store = self.read()?;
        let (value, dirty) = apply(&mut store)?;
        if dirty {
            self.write(&store)?;
        }
        Ok(value)
    }
}

fn unavailable(action: &str, path: &Path, err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Unavailable(format!("unable to {action} {}: {err}", path.display()))
}

impl AssessmentRepository for JsonFileAssessmentRepository {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        self.with_store(|store| {
            if store.assessments.iter().any(|stored| stored.id == assessment.id) {
                return Err(RepositoryError::Conflict);
            }
            store.assessments.push(assessment.clone());
            Ok((assessment, true))
        })
    }

    fn update(&self, assessment: Assessment) -> Result<(), RepositoryError> {
        self.with_store(|store| {
            let slot = store
                .assessments
                .iter_mut()
                .find(|stored| stored.id == assessment.id)
                .ok_or(RepositoryError::NotFound)?;
            *slot = assessment;
            Ok(((), true))
        })
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        self.with_store(|store| {
            let found = store
                .assessments
                .iter()
                .find(|stored| &stored.id == id)
                .cloned();
            Ok((found, false))
        })
    }

    fn delete(&self, id: &AssessmentId) -> Result<(), RepositoryError> {
        self.with_store(|store| {
            let before = store.assessments.len();
            store.assessments.retain(|stored| &stored.id != id);
            if store.assessments.len() == before {
                return Err(RepositoryError::NotFound);
            }
            Ok(((), true))
        })
    }

    fn list(&self) -> Result<Vec<Assessment>, RepositoryError> {
        self.with_store(|store| Ok((store.assessments.clone(), false)))
    }
}
