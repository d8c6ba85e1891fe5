/// Customizer manifest, relative to the asset root
pub const CUSTOMIZER_MANIFEST_PATH: &str = "customizer/manifest.json";

/// UV reference template, relative to the asset root
pub const REFERENCE_TEMPLATE_PATH: &str = "customizer/uv_template.png";

/// Directory (native only) where saved designs are written
pub const DEFAULT_DESIGN_STORE_DIR: &str = "designs";
