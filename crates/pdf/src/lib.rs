//! # dossier-pdf
//!
//! Turns each transfer-slip PDF into a single-page PDF of its top part,
//! optionally carrying a seal image.
//!
//! The first page is rendered with PDFium, cropped to a top fraction of its
//! height, composited with the stamp, flattened onto white and written back
//! as a one-page PDF sized to the image.
//!
//! ```no_run
//! use dossier_pdf::{StampConfig, Stamper};
//!
//! let config = StampConfig::default();
//! let stamper = Stamper::new(config.options.clone(), config.stamp_path().as_deref()).unwrap();
//! let report = stamper.process_dir(&config.input_dir, &config.output_dir).unwrap();
//! println!("{} processed", report.processed.len());
//! ```

pub mod compose;
pub mod error;
pub mod options;
pub mod stamper;
pub mod writer;

pub use compose::{compose_page, crop_top, flatten_on_white, paste_stamp};
pub use error::{PdfError, Result};
pub use options::{StampConfig, StampOptions};
pub use stamper::{list_pdfs, FileFailure, StampReport, Stamper};
pub use writer::write_single_page_pdf;
