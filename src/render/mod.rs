//! Rendering of parse results: stitched question images and exam JSON.

mod json;
mod stitch;

pub use json::{from_json, to_json, JsonFormat};
pub use stitch::{
    compose_question_image, crop_band, pixel_band, stitch_vertical, PixelBand, StitchLayout,
};
