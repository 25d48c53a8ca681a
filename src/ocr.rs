//! OCR engine seam
//!
//! The pipeline treats character recognition as a black box behind the
//! [`PlateReader`] trait: a cropped grayscale region in, raw UTF-8 text out.
//! The production backend is Tesseract via `leptess`, compiled in with the
//! `tesseract` cargo feature; it is initialized once per process with the
//! configured language and a plate-alphabet whitelist.

use image::GrayImage;

use crate::error::PlateError;

/// Raw text recognition over one cropped plate region.
pub trait PlateReader {
    fn recognize(&mut self, region: &GrayImage) -> Result<String, PlateError>;
}

#[cfg(feature = "tesseract")]
pub use tesseract_backend::TesseractReader;

#[cfg(feature = "tesseract")]
mod tesseract_backend {
    use std::io::Cursor;

    use image::{DynamicImage, GrayImage, ImageFormat};
    use leptess::{LepTess, Variable};
    use tracing::info;

    use super::PlateReader;
    use crate::error::PlateError;

    /// Scoped Tesseract engine; the underlying handles are released when the
    /// reader is dropped, on every exit path.
    pub struct TesseractReader {
        engine: LepTess,
    }

    impl TesseractReader {
        /// Initialize the engine for the given language and restrict it to
        /// the plate alphabet. Failure here is fatal for the pipeline.
        pub fn new(language: &str, whitelist: &str) -> Result<Self, PlateError> {
            info!("initializing Tesseract OCR (language: {language})");
            let mut engine = LepTess::new(None, language)
                .map_err(|err| PlateError::OcrInit(err.to_string()))?;
            engine
                .set_variable(Variable::TesseditCharWhitelist, whitelist)
                .map_err(|err| PlateError::OcrInit(err.to_string()))?;
            Ok(Self { engine })
        }
    }

    impl PlateReader for TesseractReader {
        fn recognize(&mut self, region: &GrayImage) -> Result<String, PlateError> {
            let mut encoded = Vec::new();
            DynamicImage::ImageLuma8(region.clone())
                .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
                .map_err(|err| PlateError::OcrRead(err.to_string()))?;
            self.engine
                .set_image_from_mem(&encoded)
                .map_err(|err| PlateError::OcrRead(err.to_string()))?;
            self.engine
                .get_utf8_text()
                .map_err(|err| PlateError::OcrRead(err.to_string()))
        }
    }
}
