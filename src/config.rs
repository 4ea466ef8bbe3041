//! Run configuration.

use std::path::PathBuf;

/// Default directory for stitched question images.
pub const DEFAULT_IMAGE_DIR: &str = "output_images";

/// Default directory for the persisted exam JSON.
pub const DEFAULT_DATA_DIR: &str = "data";

/// File name of the persisted exam document inside the data directory.
pub const EXAM_DATA_FILE: &str = "exam_data.json";

/// Paths consumed by one processing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamConfig {
    /// Input PDF
    pub input: PathBuf,

    /// Directory that receives `q_<id>.png` files
    pub image_dir: PathBuf,

    /// Directory that receives `exam_data.json`
    pub data_dir: PathBuf,
}

impl ExamConfig {
    /// Create a config for `input` with the default output directories.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }

    /// Replace the input PDF.
    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    /// Set the image output directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = dir.into();
        self
    }

    /// Set the data output directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Location of the persisted exam document.
    pub fn exam_data_path(&self) -> PathBuf {
        self.data_dir.join(EXAM_DATA_FILE)
    }

    /// Route prefix under which question images are referenced, e.g. `/output_images/`.
    pub fn image_route(&self) -> String {
        let name = self
            .image_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_IMAGE_DIR.to_string());
        format!("/{}/", name)
    }

    /// The `imagePath` recorded for an image file name.
    pub fn image_path_for(&self, file_name: &str) -> String {
        format!("{}{}", self.image_route(), file_name)
    }

    /// Filesystem location of an image file name.
    pub fn image_file(&self, file_name: &str) -> PathBuf {
        self.image_dir.join(file_name)
    }
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self::new(PathBuf::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dirs() {
        let config = ExamConfig::new("exam.pdf");
        assert_eq!(config.image_dir, PathBuf::from("output_images"));
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.exam_data_path(), PathBuf::from("data/exam_data.json"));
    }

    #[test]
    fn test_image_path_uses_dir_name() {
        let config = ExamConfig::new("exam.pdf");
        assert_eq!(config.image_path_for("q_1.png"), "/output_images/q_1.png");

        let config = config.with_image_dir("/srv/exams/images");
        assert_eq!(config.image_route(), "/images/");
        assert_eq!(
            config.image_file("q_3.png"),
            PathBuf::from("/srv/exams/images/q_3.png")
        );
    }

    #[test]
    fn test_builder_chain() {
        let config = ExamConfig::default()
            .with_input("uploads/mock.pdf")
            .with_data_dir("out/data");
        assert_eq!(config.input, PathBuf::from("uploads/mock.pdf"));
        assert_eq!(config.data_dir, PathBuf::from("out/data"));
    }
}
