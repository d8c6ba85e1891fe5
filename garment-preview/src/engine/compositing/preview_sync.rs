use crate::engine::compositing::texture_binding::{replace_image, unbind_image};
use crate::engine::garment::preview_state::{GarmentPreviewState, RenderMode};
use crate::session::controller::DesignSession;
use bevy::prelude::*;
use texture_compositor::{AssetLoadError, ImageSource, SourceLoader};

/// GPU-side images and the render mode picked by the host page.
#[derive(Resource, Debug, Default, Clone)]
pub struct PreviewBindings {
    pub composite: Option<Handle<Image>>,
    pub logo: Option<Handle<Image>>,
    pub mode: RenderMode,
}

pub fn preview_state(session: &DesignSession, bindings: &PreviewBindings) -> GarmentPreviewState {
    let form = session.form();
    GarmentPreviewState {
        base_color: session.base_color().clone(),
        composite: bindings.composite.clone(),
        logo: bindings.logo.clone(),
        print_location: form.print_location,
        logo_scale: form.image_scale,
        logo_rotation_degrees: form.image_rotation,
        mode: bindings.mode,
    }
}

/// Only writes the preview state when something visible changed, so the
/// material is not rebound every frame.
pub fn sync_preview_state(
    session: Res<DesignSession>,
    bindings: Res<PreviewBindings>,
    mut state: ResMut<GarmentPreviewState>,
) {
    if !session.is_changed() && !bindings.is_changed() {
        return;
    }
    state.set_if_neq(preview_state(&session, &bindings));
}

/// Decode the logo shown in decal mode. `None` unbinds it.
pub fn bind_logo(
    images: &mut Assets<Image>,
    bindings: &mut PreviewBindings,
    logo: Option<&ImageSource>,
    loader: &dyn SourceLoader,
) -> Result<(), AssetLoadError> {
    match logo {
        Some(source) => {
            let pixels = loader.load(source)?;
            replace_image(images, &mut bindings.logo, &pixels);
        }
        None => unbind_image(images, &mut bindings.logo),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::form::PrintLocation;
    use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use std::sync::Arc;
    use texture_compositor::{ColorValue, DefaultSourceLoader};

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<DesignSession>()
            .init_resource::<PreviewBindings>()
            .init_resource::<GarmentPreviewState>()
            .add_systems(Update, sync_preview_state);
        app
    }

    #[test]
    fn form_and_colour_reach_the_preview() {
        let mut app = app();
        {
            let mut session = app.world_mut().resource_mut::<DesignSession>();
            session.set_base_color(ColorValue::new("#102030"));
            session.form_mut().print_location = PrintLocation::Back;
            session.form_mut().image_rotation = 90.0;
        }
        app.update();

        let state = app.world().resource::<GarmentPreviewState>();
        assert_eq!(state.base_color, ColorValue::new("#102030"));
        assert_eq!(state.print_location, PrintLocation::Back);
        assert_eq!(state.logo_rotation_degrees, 90.0);
    }

    #[test]
    fn unchanged_inputs_leave_the_state_untouched() {
        let mut app = app();
        app.update();
        let tick = app.world().resource_ref::<GarmentPreviewState>().last_changed();

        app.update();
        assert_eq!(
            app.world().resource_ref::<GarmentPreviewState>().last_changed(),
            tick
        );
    }

    #[test]
    fn logo_binds_and_unbinds() {
        let mut images = Assets::<Image>::default();
        let mut bindings = PreviewBindings::default();
        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 2, Rgba([0, 0, 255, 255])))
            .write_to(&mut png, ImageOutputFormat::Png)
            .unwrap();
        let source = ImageSource::Bytes(Arc::from(png.into_inner()));

        bind_logo(&mut images, &mut bindings, Some(&source), &DefaultSourceLoader).unwrap();
        let handle = bindings.logo.clone().unwrap();
        assert_eq!(images.get(&handle).map(Image::width), Some(3));

        bind_logo(&mut images, &mut bindings, None, &DefaultSourceLoader).unwrap();
        assert!(bindings.logo.is_none());
        assert!(images.get(&handle).is_none());
    }

    #[test]
    fn unreadable_logo_keeps_the_previous_one() {
        let mut images = Assets::<Image>::default();
        let mut bindings = PreviewBindings::default();
        let broken = ImageSource::Bytes(Arc::from(vec![1u8, 2, 3]));

        let result = bind_logo(&mut images, &mut bindings, Some(&broken), &DefaultSourceLoader);
        assert!(matches!(result, Err(AssetLoadError::Decode(_))));
        assert!(bindings.logo.is_none());
    }
}
