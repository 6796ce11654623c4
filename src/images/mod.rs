//! Image index: screenshot discovery, path conventions, and dimensions.

pub mod layout;
pub mod walker;

pub use layout::{
    infer_locale_and_device, looks_like_locale, relative_slash_path, review_key, screenshot_id,
};
pub use walker::{collect_images, is_image_file, read_image_dimensions, IMAGE_EXTENSIONS};
