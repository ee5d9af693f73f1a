use crate::compose::compose_page;
use crate::error::{PdfError, Result};
use crate::options::StampOptions;
use crate::writer::write_single_page_pdf;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// A PDF that could not be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of a stamp batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StampReport {
    /// (input, output) pairs
    pub processed: Vec<(PathBuf, PathBuf)>,
    pub failures: Vec<FileFailure>,
}

/// The `*.pdf` files directly inside `dir`, sorted by path
pub fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PdfError::InputDirNotFound(dir.to_path_buf()));
    }

    let mut pdfs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }

    if pdfs.is_empty() {
        return Err(PdfError::NoPdfs(dir.to_path_buf()));
    }
    pdfs.sort();
    Ok(pdfs)
}

/// Renders, crops and stamps the first page of each PDF
pub struct Stamper {
    pdfium: Pdfium,
    options: StampOptions,
    stamp: Option<DynamicImage>,
}

impl Stamper {
    /// Bind PDFium (next to the binary first, then the system library) and
    /// load the stamp image once.
    ///
    /// A missing or unreadable stamp is not an error: pages are cropped
    /// without stamping.
    pub fn new(options: StampOptions, stamp_path: Option<&Path>) -> Result<Self> {
        let bindings =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library())
                .map_err(|e| PdfError::PdfiumUnavailable(e.to_string()))?;

        let stamp = stamp_path.and_then(load_stamp);
        Ok(Self {
            pdfium: Pdfium::new(bindings),
            options,
            stamp,
        })
    }

    pub fn has_stamp(&self) -> bool {
        self.stamp.is_some()
    }

    fn render_first_page(&self, pdf: &Path) -> Result<DynamicImage> {
        let render_error = |e: PdfiumError| PdfError::Render {
            path: pdf.to_path_buf(),
            message: e.to_string(),
        };

        let document = self
            .pdfium
            .load_pdf_from_file(pdf, None)
            .map_err(render_error)?;
        let page = document.pages().get(0).map_err(render_error)?;

        let config = PdfRenderConfig::new().scale_page_by_factor(self.options.render_scale());
        let image = page
            .render_with_config(&config)
            .map_err(render_error)?
            .as_image();
        Ok(image)
    }

    /// Process one PDF into `out_dir`; returns the output path
    pub fn process(&self, pdf: &Path, out_dir: &Path) -> Result<PathBuf> {
        let page = self.render_first_page(pdf)?;
        let composed = compose_page(&page, self.stamp.as_ref(), &self.options);

        fs::create_dir_all(out_dir)?;
        let output = out_dir.join(self.options.output_name(pdf));
        write_single_page_pdf(&composed, &output)?;
        Ok(output)
    }

    /// Process every PDF; failures are recorded and the batch continues
    pub fn process_all(&self, pdfs: &[PathBuf], out_dir: &Path) -> StampReport {
        let mut report = StampReport::default();
        for pdf in pdfs {
            match self.process(pdf, out_dir) {
                Ok(output) => {
                    tracing::debug!("{} -> {}", pdf.display(), output.display());
                    report.processed.push((pdf.clone(), output));
                }
                Err(e) => {
                    tracing::warn!("Failed to process {}: {}", pdf.display(), e);
                    report.failures.push(FileFailure {
                        path: pdf.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Processed {} PDFs ({} failed)",
            report.processed.len(),
            report.failures.len()
        );
        report
    }

    /// [`list_pdfs`] then [`Stamper::process_all`]
    pub fn process_dir(&self, input: &Path, out_dir: &Path) -> Result<StampReport> {
        let pdfs = list_pdfs(input)?;
        tracing::info!("Found {} PDFs in {}", pdfs.len(), input.display());
        Ok(self.process_all(&pdfs, out_dir))
    }
}

fn load_stamp(path: &Path) -> Option<DynamicImage> {
    if !path.exists() {
        tracing::warn!("Stamp image not found: {}; pages will not be stamped", path.display());
        return None;
    }
    match image::open(path) {
        Ok(stamp) => Some(stamp),
        Err(e) => {
            tracing::warn!(
                "Failed to read stamp {}: {}; pages will not be stamped",
                path.display(),
                e
            );
            None
        }
    }
}
