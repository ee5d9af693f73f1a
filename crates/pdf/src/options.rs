use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Crop and stamp geometry.
///
/// Stamp ratios are relative to the cropped image: `stamp_x_ratio` and
/// `stamp_y_ratio` place the stamp's top-left corner, `stamp_w_ratio` sets
/// its width (height follows the stamp's aspect ratio).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StampOptions {
    /// Fraction of the page height kept, measured from the top
    pub top_ratio: f64,
    /// Render resolution of the first page
    pub dpi: u32,
    pub stamp_x_ratio: f64,
    pub stamp_y_ratio: f64,
    pub stamp_w_ratio: f64,
    /// 1.0 is opaque
    pub stamp_opacity: f64,
    /// Appended to the input file stem to name the output
    pub output_suffix: String,
}

impl Default for StampOptions {
    fn default() -> Self {
        Self {
            top_ratio: 0.42,
            dpi: 400,
            stamp_x_ratio: 0.75,
            stamp_y_ratio: 0.60,
            stamp_w_ratio: 0.15,
            stamp_opacity: 1.0,
            output_suffix: "_截图_盖章".to_string(),
        }
    }
}

impl StampOptions {
    /// Render scale: PDF user space is 72 units per inch
    pub fn render_scale(&self) -> f32 {
        self.dpi as f32 / 72.0
    }

    /// Output file name for an input PDF
    pub fn output_name(&self, input: &Path) -> String {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}{}.pdf", stem, self.output_suffix)
    }
}

/// Where the stamp stage reads from and writes to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StampConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Stamp image; relative paths are looked up in `input_dir`.
    /// `None` crops without stamping.
    pub stamp_file: Option<PathBuf>,
    #[serde(flatten)]
    pub options: StampOptions,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("output_docs"),
            output_dir: PathBuf::from("毕业生转递单"),
            stamp_file: Some(PathBuf::from("stamp.png")),
            options: StampOptions::default(),
        }
    }
}

impl StampConfig {
    /// Anchor relative directories to `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.input_dir.is_relative() {
            self.input_dir = base.join(&self.input_dir);
        }
        if self.output_dir.is_relative() {
            self.output_dir = base.join(&self.output_dir);
        }
    }

    /// Full path of the stamp image, if stamping is enabled
    pub fn stamp_path(&self) -> Option<PathBuf> {
        self.stamp_file.as_ref().map(|file| {
            if file.is_absolute() {
                file.clone()
            } else {
                self.input_dir.join(file)
            }
        })
    }
}
