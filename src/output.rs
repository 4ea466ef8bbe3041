//! Output directory lifecycle and persistence of parse results.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{ExamConfig, DEFAULT_IMAGE_DIR};
use crate::error::{Error, Result};
use crate::model::{ExamDocument, ExamOutput, QuestionImage};
use crate::render::{from_json, to_json, JsonFormat};

/// Default public address of the service that serves question images.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Route under which the service serves the image directory.
pub const SERVED_IMAGE_ROUTE: &str = "/images/";

/// Writes parse results to the configured image and data directories.
#[derive(Debug, Clone)]
pub struct OutputStore {
    config: ExamConfig,
}

impl OutputStore {
    /// Create a store for the directories in `config`.
    pub fn new(config: &ExamConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Write every question image and the exam JSON.
    ///
    /// Images are written into a staging directory next to the image
    /// directory and the JSON into a temporary file. Only once both are
    /// complete does the staging directory replace the image directory and
    /// the JSON replace `exam_data.json`, so a failed run leaves the previous
    /// output as it was.
    ///
    /// A question whose image cannot be written is removed from the document
    /// before the JSON is saved. Returns the document as persisted.
    pub fn persist(&self, output: ExamOutput) -> Result<ExamDocument> {
        let ExamOutput {
            mut document,
            images,
        } = output;

        let staging = self.sibling_dir("staging");
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;

        let result = self.stage_and_commit(&staging, &mut document, &images);
        if staging.exists() {
            if let Err(e) = fs::remove_dir_all(&staging) {
                log::warn!("Failed to remove {}: {}", staging.display(), e);
            }
        }
        result?;

        log::info!(
            "Saved {} questions to {}",
            document.question_count(),
            self.config.exam_data_path().display()
        );
        Ok(document)
    }

    fn stage_and_commit(
        &self,
        staging: &Path,
        document: &mut ExamDocument,
        images: &[QuestionImage],
    ) -> Result<()> {
        let mut failed = Vec::new();
        for image in images {
            let path = staging.join(&image.file_name);
            if let Err(e) = image.image.save_with_format(&path, image::ImageFormat::Png) {
                log::warn!("Failed to save {}: {}", image.file_name, e);
                failed.push(image.question_id);
            }
        }
        if !failed.is_empty() {
            document.questions.retain(|q| !failed.contains(&q.id));
        }

        fs::create_dir_all(&self.config.data_dir)?;
        let path = self.config.exam_data_path();
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, to_json(document, JsonFormat::Pretty)?)?;

        if let Err(e) = self.commit(staging, &tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(())
    }

    /// Swap the staged images and the temporary JSON into place, restoring
    /// the previous image directory if either rename fails.
    fn commit(&self, staging: &Path, tmp: &Path, path: &Path) -> Result<()> {
        let image_dir = &self.config.image_dir;
        let previous = self.sibling_dir("previous");
        if previous.exists() {
            fs::remove_dir_all(&previous)?;
        }
        let had_previous = image_dir.exists();
        if had_previous {
            fs::rename(image_dir, &previous)?;
        }

        let swapped = fs::rename(staging, image_dir).and_then(|()| {
            fs::rename(tmp, path).map_err(|e| {
                let _ = fs::remove_dir_all(image_dir);
                e
            })
        });
        if let Err(e) = swapped {
            if had_previous {
                if let Err(restore) = fs::rename(&previous, image_dir) {
                    log::warn!("Failed to restore {}: {}", image_dir.display(), restore);
                }
            }
            return Err(e.into());
        }

        if had_previous {
            if let Err(e) = fs::remove_dir_all(&previous) {
                log::warn!("Failed to remove {}: {}", previous.display(), e);
            }
        }
        Ok(())
    }

    /// `.<image-dir-name>.<suffix>` next to the image directory.
    fn sibling_dir(&self, suffix: &str) -> PathBuf {
        let image_dir = &self.config.image_dir;
        let name = image_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_IMAGE_DIR.to_string());
        let parent = image_dir.parent().unwrap_or_else(|| Path::new(""));
        parent.join(format!(".{}.{}", name, suffix))
    }

    /// Read the persisted exam document.
    pub fn load(&self) -> Result<ExamDocument> {
        let path = self.config.exam_data_path();
        if !path.is_file() {
            return Err(Error::ExamDataNotFound(path));
        }
        from_json(&fs::read_to_string(&path)?)
    }

    /// Read the persisted exam document with image paths rewritten to URLs
    /// under `base_url`.
    pub fn load_for_serving(&self, base_url: &str) -> Result<ExamDocument> {
        let mut document = self.load()?;
        rewrite_image_urls(&mut document, &self.config.image_route(), base_url);
        Ok(document)
    }
}

/// Replace the `route` prefix of each image path with
/// `<base_url>/images/`.
pub fn rewrite_image_urls(document: &mut ExamDocument, route: &str, base_url: &str) {
    let target = format!("{}{}", base_url.trim_end_matches('/'), SERVED_IMAGE_ROUTE);
    for question in &mut document.questions {
        if !question.image_path.is_empty() {
            question.image_path = question.image_path.replace(route, &target);
        }
    }
}
