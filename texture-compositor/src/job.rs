//! Job files for the `compose-texture` command.
//!
//! A job is a small JSON document naming the inputs of one compute. Relative
//! paths resolve against the directory holding the job file.
use crate::color::ColorValue;
use crate::compositor::{ComposeOutcome, ComposeRequest, CompositorConfig, TemplateOverride};
use crate::error::JobError;
use crate::side::{SideImageSet, SideKey};
use crate::source::ImageSource;
use crate::texture::CompositeTexture;
use crate::zone::ZoneLayout;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeJob {
    pub base_color: ColorValue,
    /// Side name to image location.
    pub sides: BTreeMap<String, String>,
    pub reference_overlay: bool,
    pub template: Option<String>,
    pub template_override: Option<PathBuf>,
    pub resolution: Option<u32>,
    pub load_timeout_ms: Option<u64>,
    pub zones: Option<ZoneLayout>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl ComposeJob {
    pub fn from_path(path: &Path) -> Result<Self, JobError> {
        let text = fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or(Path::new("")).to_path_buf();
        Self::from_json_str(&text, base_dir)
    }

    pub fn from_json_str(text: &str, base_dir: impl Into<PathBuf>) -> Result<Self, JobError> {
        let mut job: ComposeJob = serde_json::from_str(text)?;
        job.base_dir = base_dir.into();
        Ok(job)
    }

    /// Compositor settings with the job's overrides applied.
    pub fn config(&self) -> Result<CompositorConfig, JobError> {
        let mut config = CompositorConfig::default();
        if let Some(resolution) = self.resolution {
            config.fallback_resolution = resolution;
        }
        if let Some(timeout) = self.load_timeout_ms {
            config.load_timeout_ms = timeout;
        }
        if let Some(zones) = self.zones {
            zones.validate()?;
            config.zones = zones;
        }
        config.template = self.template.as_deref().map(|location| self.resolve(location));
        Ok(config)
    }

    pub fn request(&self) -> Result<ComposeRequest, JobError> {
        let mut sides = SideImageSet::new();
        for (name, location) in &self.sides {
            let side: SideKey = name
                .parse()
                .map_err(|_| JobError::UnknownSide(name.clone()))?;
            sides.set(side, ImageSource::from_url(&self.resolve(location)));
        }

        let template_override = match &self.template_override {
            Some(path) => Some(TemplateOverride::new(fs::read(self.base_dir.join(path))?)),
            None => None,
        };

        Ok(ComposeRequest {
            base_color: self.base_color.clone(),
            sides,
            reference_overlay: self.reference_overlay,
            template_override,
        })
    }

    /// Anchor relative file paths to the job directory. URLs pass through.
    fn resolve(&self, location: &str) -> String {
        let location = location.trim();
        if location.is_empty() || location.contains("://") || location.starts_with("data:") {
            return location.to_string();
        }
        let path = Path::new(location);
        if path.is_absolute() {
            location.to_string()
        } else {
            self.base_dir.join(path).to_string_lossy().into_owned()
        }
    }
}

/// Machine-readable summary printed after a compute.
#[derive(Debug, Serialize)]
pub struct JobSummary {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub requested: usize,
    pub failures: Vec<String>,
}

impl JobSummary {
    pub fn new(output: &Path, outcome: &ComposeOutcome) -> Self {
        Self {
            output: output.to_path_buf(),
            width: outcome.texture.width(),
            height: outcome.texture.height(),
            requested: outcome.requested,
            failures: outcome.failures.iter().map(ToString::to_string).collect(),
        }
    }
}

pub fn write_png(texture: &CompositeTexture, output: &Path) -> Result<(), JobError> {
    let png = texture.png().map_err(JobError::Encode)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, &png)?;
    Ok(())
}
