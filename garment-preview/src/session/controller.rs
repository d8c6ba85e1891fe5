use crate::session::catalog::CatalogLookup;
use crate::session::design_store::{DesignId, DesignRecord, DesignSubmission};
use crate::session::error::SessionError;
use crate::session::form::DesignForm;
use bevy::prelude::*;
use texture_compositor::{
    ColorValue, ComposeRequest, CompositeSlot, CompositeTexture, CompositorError,
    GenerationTracker, ImageSource, SideImageSet, SideKey, TemplateOverride, Ticket,
};

/// Everything the user has entered for the design being edited.
///
/// Compositor inputs are private so every change goes through a setter that
/// marks the session dirty.
#[derive(Resource, Debug)]
pub struct DesignSession {
    sides: SideImageSet,
    base_color: ColorValue,
    reference_overlay: bool,
    template_override: Option<TemplateOverride>,
    form: DesignForm,
    logo: Option<ImageSource>,
    editing_id: Option<DesignId>,
    existing_image_url: Option<String>,
    tracker: GenerationTracker,
    slot: CompositeSlot,
    dirty: bool,
}

impl Default for DesignSession {
    fn default() -> Self {
        Self {
            sides: SideImageSet::new(),
            base_color: ColorValue::default(),
            reference_overlay: false,
            template_override: None,
            form: DesignForm::default(),
            logo: None,
            editing_id: None,
            existing_image_url: None,
            tracker: GenerationTracker::new(),
            slot: CompositeSlot::default(),
            // First frame renders the bare base colour.
            dirty: true,
        }
    }
}

impl DesignSession {
    pub fn set_side_image(&mut self, side: SideKey, source: ImageSource) {
        self.sides.set(side, source);
        self.mark_dirty();
    }

    pub fn clear_side_image(&mut self, side: SideKey) {
        self.sides.clear(side);
        self.mark_dirty();
    }

    pub fn set_base_color(&mut self, color: ColorValue) {
        if self.base_color != color {
            self.base_color = color;
            self.mark_dirty();
        }
    }

    /// Pick a catalog colour: drives both the form and the composite base.
    pub fn select_color(
        &mut self,
        color_id: &str,
        catalog: &dyn CatalogLookup,
    ) -> Result<(), SessionError> {
        let color = catalog
            .garment_color(color_id)
            .filter(|color| color.is_active)
            .ok_or_else(|| SessionError::UnknownColor(color_id.to_string()))?;
        self.form.tshirt_color = color.id.clone();
        self.set_base_color(ColorValue::new(color.hex_code.clone()));
        Ok(())
    }

    pub fn set_reference_overlay(&mut self, enabled: bool) {
        if self.reference_overlay != enabled {
            self.reference_overlay = enabled;
            self.mark_dirty();
        }
    }

    pub fn set_template_override(&mut self, template_override: Option<TemplateOverride>) {
        self.template_override = template_override.filter(|bytes| !bytes.is_empty());
        self.mark_dirty();
    }

    /// Form fields only steer the preview and the submission, not the composite.
    pub fn form_mut(&mut self) -> &mut DesignForm {
        &mut self.form
    }

    pub fn form(&self) -> &DesignForm {
        &self.form
    }

    pub fn set_logo(&mut self, logo: Option<ImageSource>) {
        self.logo = logo.filter(|source| !source.is_empty());
    }

    pub fn logo(&self) -> Option<&ImageSource> {
        self.logo.as_ref()
    }

    pub fn sides(&self) -> &SideImageSet {
        &self.sides
    }

    pub fn base_color(&self) -> &ColorValue {
        &self.base_color
    }

    pub fn reference_overlay(&self) -> bool {
        self.reference_overlay
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn existing_image_url(&self) -> Option<&str> {
        self.existing_image_url.as_deref()
    }

    /// Inputs changed: schedule a recompute and stale every compute in flight.
    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.tracker.invalidate();
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag, returning whether a recompute is due.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Snapshot of the compositor inputs. The compute never sees later edits.
    pub fn compose_request(&self) -> ComposeRequest {
        ComposeRequest {
            base_color: self.base_color.clone(),
            sides: self.sides.clone(),
            reference_overlay: self.reference_overlay,
            template_override: self.template_override.clone(),
        }
    }

    /// Ticket for a new compute. Every in-flight compute becomes stale.
    pub fn begin_compute(&self) -> Ticket {
        self.tracker.begin()
    }

    pub fn commit(
        &mut self,
        ticket: &Ticket,
        texture: CompositeTexture,
    ) -> Result<&CompositeTexture, CompositorError> {
        self.slot.commit(ticket, texture)
    }

    pub fn composite(&self) -> Option<&CompositeTexture> {
        self.slot.current()
    }

    /// Whether the committed composite reflects the current inputs.
    pub fn composite_is_latest(&self) -> bool {
        !self.dirty
            && self.slot.current().is_some()
            && self.slot.committed_generation() == self.tracker.latest()
    }

    /// Save payload. The composite PNG is attached only when artwork exists,
    /// and only once it has caught up with the latest edit.
    pub fn build_submission(&self) -> Result<DesignSubmission, SessionError> {
        self.form.validate()?;

        let image = if self.sides.is_empty() {
            None
        } else {
            let composite = self
                .composite()
                .filter(|_| self.composite_is_latest())
                .ok_or(SessionError::CompositeNotReady)?;
            Some(composite.png().map_err(SessionError::Encode)?.to_vec())
        };

        Ok(DesignSubmission {
            design_id: self.editing_id.clone(),
            form: self.form.clone(),
            image,
        })
    }

    /// Record a successful save. Further saves update the same design.
    pub fn apply_saved(&mut self, record: &DesignRecord) {
        self.editing_id = Some(record.id.clone());
        self.existing_image_url = record.image_url.clone();
    }

    /// Restore a saved design for editing.
    ///
    /// Side images are not restored; the saved composite stays available as
    /// `existing_image_url` until new artwork replaces it.
    pub fn rehydrate(&mut self, record: DesignRecord, catalog: &dyn CatalogLookup) {
        if catalog.garment_type(&record.form.tshirt_type).is_none() {
            warn!("Saved design {} uses unknown garment type '{}'", record.id, record.form.tshirt_type);
        }
        match catalog.garment_color(&record.form.tshirt_color) {
            Some(color) => self.base_color = ColorValue::new(color.hex_code.clone()),
            None => {
                warn!("Saved design {} uses unknown colour '{}'", record.id, record.form.tshirt_color);
                self.base_color = ColorValue::default();
            }
        }

        self.sides.clear_all();
        self.template_override = None;
        self.logo = None;
        self.form = record.form;
        self.editing_id = Some(record.id);
        self.existing_image_url = record.image_url;
        self.slot.clear();
        self.mark_dirty();
    }
}
