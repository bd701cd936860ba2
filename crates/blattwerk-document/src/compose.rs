// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page compositor — scales a source image into a printer's printable
// rectangle and produces a single-page PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: the page is a `PdfPage` holding
// a `Vec<Op>` operation list, serialised via `PdfDocument::save()`.

use std::path::Path;

use image::{DynamicImage, imageops::FilterType};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info};

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::types::{PaperSize, PrintableRectangle};
use blattwerk_core::units::{mm_to_pt, mm_to_px, px_to_mm};

/// A finished single-page document, ready for submission. Transient —
/// written out, handed to the spooler, and discarded.
#[derive(Debug, Clone)]
pub struct CompositedDocument {
    /// Encoded single-page PDF.
    pub pdf_bytes: Vec<u8>,
    /// Full sheet size in device pixels (margins included as blank border).
    pub page_width_px: u32,
    pub page_height_px: u32,
    /// Placed image size in device pixels.
    pub image_width_px: u32,
    pub image_height_px: u32,
    /// Placed image offset from the page's top-left corner, in pixels.
    pub offset_x_px: u32,
    pub offset_y_px: u32,
}

impl CompositedDocument {
    /// Write the PDF to a file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), &self.pdf_bytes)?;
        debug!(path = %path.as_ref().display(), bytes = self.pdf_bytes.len(), "wrote composited PDF");
        Ok(())
    }
}

/// Composites one source image for one resolved page geometry.
pub struct PageCompositor {
    paper: PaperSize,
    rect: PrintableRectangle,
    /// Title for the PDF /Info dictionary.
    title: Option<String>,
}

impl PageCompositor {
    /// Create a compositor for a paper size and its printable rectangle,
    /// both produced by the geometry resolver.
    pub fn new(paper: PaperSize, rect: PrintableRectangle) -> Self {
        Self {
            paper,
            rect,
            title: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Decode an image file and compose it.
    pub fn compose_path(&self, path: impl AsRef<Path>) -> Result<CompositedDocument> {
        let img = image::open(path.as_ref()).map_err(|err| {
            BlattwerkError::UnsupportedFormat(format!(
                "cannot decode {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        self.compose(img)
    }

    /// Decode encoded image bytes and compose them.
    pub fn compose_bytes(&self, data: &[u8]) -> Result<CompositedDocument> {
        let img = image::load_from_memory(data).map_err(|err| {
            BlattwerkError::UnsupportedFormat(format!("cannot decode image: {err}"))
        })?;
        self.compose(img)
    }

    /// Compose a decoded image into a single-page PDF.
    ///
    /// The page canvas is the full sheet at device DPI; the image is
    /// scaled uniformly (upscaling permitted) to the largest size that
    /// fits the printable rectangle, then centred within it.
    pub fn compose(&self, image: DynamicImage) -> Result<CompositedDocument> {
        let res = self.rect.resolution;
        let hdpi = res.horizontal_dpi;
        let vdpi = res.vertical_dpi;

        let page_width_px = mm_to_px(self.paper.width_mm, hdpi);
        let page_height_px = mm_to_px(self.paper.height_mm, vdpi);

        let (scaled_w, scaled_h) = fit_within(
            image.width(),
            image.height(),
            self.rect.width_px,
            self.rect.height_px,
        );

        info!(
            paper = %self.paper.name,
            source_w = image.width(),
            source_h = image.height(),
            scaled_w,
            scaled_h,
            %res,
            "compositing image onto sheet"
        );

        let resized = image.resize_exact(scaled_w, scaled_h, FilterType::Lanczos3);
        let (pixels, data_format) = into_raw_pixels(resized);
        let raw = RawImage {
            pixels: RawImageData::U8(pixels),
            width: scaled_w as usize,
            height: scaled_h as usize,
            data_format,
            tag: Vec::new(),
        };

        // Pixel-space placement, from the page's top-left corner.
        let offset_x_px = mm_to_px(self.rect.offset_left_mm, hdpi)
            + (self.rect.width_px - scaled_w) / 2;
        let offset_y_px = mm_to_px(self.rect.offset_top_mm, vdpi)
            + (self.rect.height_px - scaled_h) / 2;

        // Page-space placement, from the PDF's bottom-left origin.
        let scaled_w_mm = px_to_mm(scaled_w, hdpi);
        let scaled_h_mm = px_to_mm(scaled_h, vdpi);
        let x_mm =
            self.rect.offset_left_mm + (self.rect.width_mm - scaled_w_mm) / 2.0;
        let bottom_margin_mm =
            self.paper.height_mm - self.rect.offset_top_mm - self.rect.height_mm;
        let y_mm = bottom_margin_mm + (self.rect.height_mm - scaled_h_mm) / 2.0;

        let title = self.title.as_deref().unwrap_or("Blattwerk Print");
        let mut doc = PdfDocument::new(title);
        let xobject_id = doc.add_image(&raw);

        // The transform's dpi maps image pixels to points on the horizontal
        // axis; scale_y corrects the vertical axis for non-square DPI.
        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(mm_to_pt(x_mm) as f32)),
                translate_y: Some(Pt(mm_to_pt(y_mm) as f32)),
                scale_x: Some(1.0),
                scale_y: Some(hdpi as f32 / vdpi as f32),
                dpi: Some(hdpi as f32),
                rotate: None,
            },
        }];

        let page = PdfPage::new(
            Mm(self.paper.width_mm as f32),
            Mm(self.paper.height_mm as f32),
            ops,
        );
        doc.with_pages(vec![page]);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let pdf_bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);

        debug!(
            page_width_px,
            page_height_px,
            offset_x_px,
            offset_y_px,
            pdf_len = pdf_bytes.len(),
            "composited page encoded"
        );

        Ok(CompositedDocument {
            pdf_bytes,
            page_width_px,
            page_height_px,
            image_width_px: scaled_w,
            image_height_px: scaled_h,
            offset_x_px,
            offset_y_px,
        })
    }
}

/// Largest uniform scaling of `src` that fits entirely within `bound`.
/// Aspect ratio is preserved; upscaling is permitted.
pub fn fit_within(src_w: u32, src_h: u32, bound_w: u32, bound_h: u32) -> (u32, u32) {
    let scale = f64::min(
        f64::from(bound_w) / f64::from(src_w),
        f64::from(bound_h) / f64::from(src_h),
    );
    let w = ((f64::from(src_w) * scale).round() as u32).clamp(1, bound_w);
    let h = ((f64::from(src_h) * scale).round() as u32).clamp(1, bound_h);
    (w, h)
}

/// Convert a decoded image into raw pixel data for embedding.
///
/// Grayscale sources stay single-channel; alpha is flattened onto a white
/// background (paper is white); everything else becomes RGB8.
fn into_raw_pixels(image: DynamicImage) -> (Vec<u8>, RawImageFormat) {
    match image {
        DynamicImage::ImageLuma8(gray) => (gray.into_raw(), RawImageFormat::R8),
        img if img.color().has_alpha() => {
            let rgba = img.to_rgba8();
            let mut rgb = Vec::with_capacity((rgba.width() * rgba.height() * 3) as usize);
            for px in rgba.pixels() {
                let [r, g, b, a] = px.0;
                let alpha = u32::from(a);
                // out = a*c + (1-a)*white, in integer arithmetic
                rgb.push(((u32::from(r) * alpha + 255 * (255 - alpha)) / 255) as u8);
                rgb.push(((u32::from(g) * alpha + 255 * (255 - alpha)) / 255) as u8);
                rgb.push(((u32::from(b) * alpha + 255 * (255 - alpha)) / 255) as u8);
            }
            (rgb, RawImageFormat::RGB8)
        }
        img => (img.to_rgb8().into_raw(), RawImageFormat::RGB8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blattwerk_core::types::{Margins, Resolution};

    fn small_geometry() -> (PaperSize, PrintableRectangle) {
        let paper = PaperSize {
            name: "Card".into(),
            width_mm: 100.0,
            height_mm: 150.0,
            margins: Margins {
                left_mm: 5.0,
                right_mm: 5.0,
                top_mm: 5.0,
                bottom_mm: 5.0,
            },
            default: true,
        };
        let rect = PrintableRectangle::from_paper(&paper, Resolution::square(72));
        (paper, rect)
    }

    #[test]
    fn fit_by_width_centres_vertically() {
        // A square image in a portrait rectangle fits by width.
        let (w, h) = fit_within(100, 100, 4762, 6817);
        assert_eq!((w, h), (4762, 4762));
        let offset_y = (6817 - h) / 2;
        assert_eq!(offset_y, 1027);
    }

    #[test]
    fn fit_downscales_wide_sources() {
        let (w, h) = fit_within(200, 100, 100, 100);
        assert_eq!((w, h), (100, 50));
    }

    #[test]
    fn fit_upscales_small_sources() {
        let (w, h) = fit_within(10, 20, 100, 100);
        assert_eq!((w, h), (50, 100));
    }

    #[test]
    fn fit_never_overflows_bounds() {
        for (sw, sh) in [(1, 1), (3, 7), (640, 480), (10_000, 1)] {
            let (w, h) = fit_within(sw, sh, 4762, 6817);
            assert!(w >= 1 && h >= 1);
            assert!(w <= 4762 && h <= 6817);
        }
    }

    #[test]
    fn composes_single_page_pdf() {
        let (paper, rect) = small_geometry();
        let compositor = PageCompositor::new(paper, rect);

        let img = DynamicImage::new_rgb8(40, 40);
        let doc = compositor.compose(img).unwrap();

        assert!(doc.pdf_bytes.starts_with(b"%PDF"));
        // 100mm at 72dpi = 283.5px; 150mm = 425.2px
        assert_eq!(doc.page_width_px, 283);
        assert_eq!(doc.page_height_px, 425);
        // Square image in a portrait rectangle: fits by width.
        assert_eq!(doc.image_width_px, rect.width_px);
        assert_eq!(doc.image_width_px, doc.image_height_px);
    }

    #[test]
    fn centering_invariant_holds() {
        let (paper, rect) = small_geometry();
        let compositor = PageCompositor::new(paper, rect);
        let doc = compositor.compose(DynamicImage::new_rgb8(33, 77)).unwrap();

        let rect_left = blattwerk_core::units::mm_to_px(rect.offset_left_mm, 72);
        let rect_top = blattwerk_core::units::mm_to_px(rect.offset_top_mm, 72);
        assert!(doc.offset_x_px >= rect_left);
        assert!(doc.offset_y_px >= rect_top);
        assert!(doc.offset_x_px - rect_left + doc.image_width_px <= rect.width_px);
        assert!(doc.offset_y_px - rect_top + doc.image_height_px <= rect.height_px);
    }

    #[test]
    fn grayscale_stays_single_channel() {
        let gray = DynamicImage::new_luma8(8, 8);
        let (pixels, format) = into_raw_pixels(gray);
        assert_eq!(format, RawImageFormat::R8);
        assert_eq!(pixels.len(), 64);
    }

    #[test]
    fn alpha_flattens_onto_white() {
        let mut rgba = image::RgbaImage::new(1, 1);
        rgba.put_pixel(0, 0, image::Rgba([0, 0, 0, 0])); // fully transparent black
        let (pixels, format) = into_raw_pixels(DynamicImage::ImageRgba8(rgba));
        assert_eq!(format, RawImageFormat::RGB8);
        assert_eq!(pixels, vec![255, 255, 255]);
    }

    #[test]
    fn undecodable_bytes_are_unsupported_format() {
        let (paper, rect) = small_geometry();
        let compositor = PageCompositor::new(paper, rect);
        let err = compositor.compose_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, BlattwerkError::UnsupportedFormat(_)));
    }

    #[test]
    fn writes_pdf_to_disk() {
        let (paper, rect) = small_geometry();
        let compositor = PageCompositor::new(paper, rect);
        let doc = compositor.compose(DynamicImage::new_rgb8(16, 16)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        doc.write_to(&path).unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), doc.pdf_bytes);
    }
}
