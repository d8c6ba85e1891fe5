use crate::session::error::{DesignFetchError, UploadSubmissionFailure};
use crate::session::form::DesignForm;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use texture_compositor::source::encode_png_data_url;

pub type DesignId = String;

/// One save request: form fields plus the optional composite PNG.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignSubmission {
    /// Present when updating an existing design.
    pub design_id: Option<DesignId>,
    pub form: DesignForm,
    pub image: Option<Vec<u8>>,
}

impl DesignSubmission {
    /// Multipart field names and values, in submission order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let form = &self.form;
        let mut fields = vec![
            ("tshirt_type", form.tshirt_type.clone()),
            ("tshirt_color", form.tshirt_color.clone()),
            ("size", form.size.clone()),
            ("print_location", form.print_location.to_string()),
            ("quantity", form.quantity.to_string()),
            ("image_scale", form.image_scale.to_string()),
            ("image_rotation", form.image_rotation.to_string()),
        ];
        if let Some(id) = &self.design_id {
            fields.push(("designId", id.clone()));
        }
        fields
    }
}

/// Saved design as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignRecord {
    pub id: DesignId,
    #[serde(flatten)]
    pub form: DesignForm,
    pub image_url: Option<String>,
}

/// Persistence backend for designs.
pub trait DesignRepository: Send + Sync {
    fn submit(&mut self, submission: &DesignSubmission) -> Result<DesignRecord, UploadSubmissionFailure>;
    fn fetch(&self, id: &str) -> Result<DesignRecord, DesignFetchError>;
}

/// Repository used by the running app.
#[derive(Resource)]
pub struct DesignStore(pub Box<dyn DesignRepository>);

impl DesignStore {
    /// Files on native, memory in the browser.
    pub fn for_platform(directory: &str) -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self(Box::new(FileDesignRepository::new(directory)))
        }

        #[cfg(target_arch = "wasm32")]
        {
            let _ = directory;
            Self(Box::new(InMemoryDesignRepository::new()))
        }
    }
}

/// Designs kept in memory. Can be told to reject submissions.
#[derive(Debug, Default)]
pub struct InMemoryDesignRepository {
    records: HashMap<DesignId, DesignRecord>,
    next_id: u64,
    rejection: Option<String>,
}

impl InMemoryDesignRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every following submission with `message`, or stop failing with `None`.
    pub fn reject_with(&mut self, message: Option<&str>) {
        self.rejection = message.map(str::to_string);
    }
}

impl DesignRepository for InMemoryDesignRepository {
    fn submit(&mut self, submission: &DesignSubmission) -> Result<DesignRecord, UploadSubmissionFailure> {
        if let Some(message) = &self.rejection {
            return Err(UploadSubmissionFailure::retryable(message.clone()));
        }

        let id = match &submission.design_id {
            Some(id) => id.clone(),
            None => {
                self.next_id += 1;
                format!("design-{}", self.next_id)
            }
        };
        let image_url = match &submission.image {
            Some(png) => Some(encode_png_data_url(png)),
            None => self.records.get(&id).and_then(|r| r.image_url.clone()),
        };

        let record = DesignRecord {
            id: id.clone(),
            form: submission.form.clone(),
            image_url,
        };
        self.records.insert(id, record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &str) -> Result<DesignRecord, DesignFetchError> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| DesignFetchError::NotFound(id.to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileDesignRepository;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::*;
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    /// Designs stored as `<id>.json` with an optional `<id>.png` beside it.
    #[derive(Debug, Clone)]
    pub struct FileDesignRepository {
        directory: PathBuf,
    }

    impl FileDesignRepository {
        pub fn new(directory: impl Into<PathBuf>) -> Self {
            Self {
                directory: directory.into(),
            }
        }

        fn record_path(&self, id: &str) -> PathBuf {
            self.directory.join(format!("{id}.json"))
        }

        fn image_path(&self, id: &str) -> PathBuf {
            self.directory.join(format!("{id}.png"))
        }

        fn next_id(&self) -> DesignId {
            let millis = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_millis())
                .unwrap_or_default();
            let mut candidate = format!("design-{millis}");
            let mut suffix = 1;
            while self.record_path(&candidate).exists() {
                candidate = format!("design-{millis}-{suffix}");
                suffix += 1;
            }
            candidate
        }
    }

    /// Ids become file names, so anything that could escape the directory is refused.
    fn is_safe_id(id: &str) -> bool {
        !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    fn retryable(e: impl std::fmt::Display) -> UploadSubmissionFailure {
        UploadSubmissionFailure::retryable(e.to_string())
    }

    fn file_url(path: &Path) -> String {
        let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        format!("file://{}", absolute.display())
    }

    impl DesignRepository for FileDesignRepository {
        fn submit(
            &mut self,
            submission: &DesignSubmission,
        ) -> Result<DesignRecord, UploadSubmissionFailure> {
            fs::create_dir_all(&self.directory).map_err(retryable)?;

            let (id, mut image_url) = match &submission.design_id {
                Some(id) if !is_safe_id(id) => {
                    return Err(UploadSubmissionFailure {
                        message: format!("invalid design id '{id}'"),
                        retryable: false,
                    });
                }
                Some(id) => (id.clone(), self.fetch(id).ok().and_then(|r| r.image_url)),
                None => (self.next_id(), None),
            };

            if let Some(png) = &submission.image {
                let path = self.image_path(&id);
                fs::write(&path, png).map_err(retryable)?;
                image_url = Some(file_url(&path));
            }

            let record = DesignRecord {
                id,
                form: submission.form.clone(),
                image_url,
            };
            let json = serde_json::to_vec_pretty(&record).map_err(retryable)?;
            fs::write(self.record_path(&record.id), json).map_err(retryable)?;

            info!("Design {} saved to {}", record.id, self.directory.display());
            Ok(record)
        }

        fn fetch(&self, id: &str) -> Result<DesignRecord, DesignFetchError> {
            if !is_safe_id(id) {
                return Err(DesignFetchError::NotFound(id.to_string()));
            }
            let bytes = fs::read(self.record_path(id)).map_err(|e| match e.kind() {
                ErrorKind::NotFound => DesignFetchError::NotFound(id.to_string()),
                _ => DesignFetchError::Unreachable(e.to_string()),
            })?;
            serde_json::from_slice(&bytes).map_err(|e| DesignFetchError::Unreachable(e.to_string()))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::session::form::PrintLocation;
        use tempfile::tempdir;

        fn submission(image: Option<Vec<u8>>) -> DesignSubmission {
            DesignSubmission {
                design_id: None,
                form: DesignForm {
                    tshirt_type: "classic".to_string(),
                    tshirt_color: "navy".to_string(),
                    print_location: PrintLocation::Back,
                    ..DesignForm::default()
                },
                image,
            }
        }

        #[test]
        fn saved_designs_can_be_fetched_back() {
            let dir = tempdir().unwrap();
            let mut repository = FileDesignRepository::new(dir.path());

            let saved = repository.submit(&submission(Some(vec![1, 2, 3]))).unwrap();
            let image_url = saved.image_url.clone().unwrap();
            assert!(image_url.starts_with("file://"));
            assert_eq!(fs::read(repository.image_path(&saved.id)).unwrap(), vec![1, 2, 3]);

            let fetched = repository.fetch(&saved.id).unwrap();
            assert_eq!(fetched, saved);
            assert_eq!(fetched.form.print_location, PrintLocation::Back);
        }

        #[test]
        fn updates_without_image_keep_the_stored_one() {
            let dir = tempdir().unwrap();
            let mut repository = FileDesignRepository::new(dir.path());
            let first = repository.submit(&submission(Some(vec![9]))).unwrap();

            let mut update = submission(None);
            update.design_id = Some(first.id.clone());
            update.form.quantity = 4;
            let second = repository.submit(&update).unwrap();

            assert_eq!(second.id, first.id);
            assert_eq!(second.image_url, first.image_url);
            assert_eq!(repository.fetch(&first.id).unwrap().form.quantity, 4);
        }

        #[test]
        fn missing_and_unsafe_ids_are_not_found() {
            let dir = tempdir().unwrap();
            let repository = FileDesignRepository::new(dir.path());
            assert_eq!(
                repository.fetch("nope"),
                Err(DesignFetchError::NotFound("nope".to_string()))
            );
            assert!(matches!(
                repository.fetch("../etc/passwd"),
                Err(DesignFetchError::NotFound(_))
            ));
        }

        #[test]
        fn corrupt_records_are_unreachable() {
            let dir = tempdir().unwrap();
            fs::write(dir.path().join("broken.json"), b"{").unwrap();
            let repository = FileDesignRepository::new(dir.path());
            assert!(matches!(
                repository.fetch("broken"),
                Err(DesignFetchError::Unreachable(_))
            ));
        }
    }
}
