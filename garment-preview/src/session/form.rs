use crate::session::error::FormError;
use constants::render_settings::MAX_LOGO_SCALE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Torso face the single decal is printed on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintLocation {
    #[default]
    Front,
    Back,
}

impl PrintLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            PrintLocation::Front => "front",
            PrintLocation::Back => "back",
        }
    }
}

impl fmt::Display for PrintLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrintLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(PrintLocation::Front),
            "back" => Ok(PrintLocation::Back),
            other => Err(format!("unknown print location '{other}'")),
        }
    }
}

/// Order form submitted with a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignForm {
    pub tshirt_type: String,
    pub tshirt_color: String,
    pub size: String,
    pub print_location: PrintLocation,
    pub quantity: u32,
    pub image_scale: f32,
    /// Degrees about the surface normal.
    pub image_rotation: f32,
}

impl Default for DesignForm {
    fn default() -> Self {
        Self {
            tshirt_type: String::new(),
            tshirt_color: String::new(),
            size: "M".to_string(),
            print_location: PrintLocation::Front,
            quantity: 1,
            image_scale: 1.0,
            image_rotation: 0.0,
        }
    }
}

impl DesignForm {
    pub fn validate(&self) -> Result<(), FormError> {
        for (name, value) in [
            ("tshirt_type", &self.tshirt_type),
            ("tshirt_color", &self.tshirt_color),
            ("size", &self.size),
        ] {
            if value.trim().is_empty() {
                return Err(FormError::MissingField(name));
            }
        }
        if self.quantity < 1 {
            return Err(FormError::Quantity);
        }
        if !(self.image_scale > 0.0 && self.image_scale <= MAX_LOGO_SCALE) {
            return Err(FormError::Scale(self.image_scale));
        }
        Ok(())
    }
}

/// Partial form update from the host page. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DesignFormPatch {
    pub tshirt_type: Option<String>,
    pub tshirt_color: Option<String>,
    pub size: Option<String>,
    pub print_location: Option<PrintLocation>,
    pub quantity: Option<u32>,
    pub image_scale: Option<f32>,
    pub image_rotation: Option<f32>,
}

impl DesignFormPatch {
    pub fn apply(self, form: &mut DesignForm) {
        if let Some(value) = self.tshirt_type {
            form.tshirt_type = value;
        }
        if let Some(value) = self.tshirt_color {
            form.tshirt_color = value;
        }
        if let Some(value) = self.size {
            form.size = value;
        }
        if let Some(value) = self.print_location {
            form.print_location = value;
        }
        if let Some(value) = self.quantity {
            form.quantity = value;
        }
        if let Some(value) = self.image_scale {
            form.image_scale = value;
        }
        if let Some(value) = self.image_rotation {
            form.image_rotation = value;
        }
    }
}
