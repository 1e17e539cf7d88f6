//! Procedural generation of the ShowTracker packaging assets: the app icon set
//! and the DMG installer background.

pub mod background;
pub mod compositor;
pub mod export;
pub mod icon;
pub mod raster;
pub mod report;
pub mod superellipse;
pub mod text;

/// File name of the installer background inside the build directory.
pub const BACKGROUND_FILENAME: &str = "dmg-background.png";

/// Directory, relative to the build directory, that receives the iconset.
pub const ICON_DIR: &str = "icon";

/// File name of the packed icon family inside the build directory.
pub const ICNS_FILENAME: &str = "icon.icns";
