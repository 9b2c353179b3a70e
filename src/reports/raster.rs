//! Rasterized single-page export: embeds an externally captured bitmap of
//! the rendered table into a one-page PDF, preserving aspect ratio on an
//! A4 landscape page.
//!
//! This is a faithful visual snapshot, not a text-searchable document; the
//! capture itself (equivalent of a 2x-upscaled canvas grab) is produced by
//! a rendering collaborator outside this crate.

use super::{ExportArtifact, ExportError};

pub const RASTER_FILE_NAME: &str = "report.pdf";
pub const RASTER_MIME: &str = "application/pdf";

/// Fixed upscaling factor the capturing collaborator is expected to use.
pub const CAPTURE_SCALE: u32 = 2;

// A4 landscape in PDF points (1 mm = 72/25.4 pt).
const PAGE_WIDTH_PT: f64 = 841.89;
const PAGE_HEIGHT_PT: f64 = 595.28;

/// Bitmap capture of the rendered table region, JPEG-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCapture {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub jpeg: Vec<u8>,
}

impl TableCapture {
    fn validate(&self) -> Result<(), ExportError> {
        if self.pixel_width == 0 || self.pixel_height == 0 {
            return Err(ExportError::InvalidCapture(
                "capture has zero width or height".into(),
            ));
        }
        if self.jpeg.len() < 4 || self.jpeg[0] != 0xFF || self.jpeg[1] != 0xD8 {
            return Err(ExportError::InvalidCapture(
                "capture bytes are not JPEG data".into(),
            ));
        }
        Ok(())
    }

    /// Image box on the page: full page width, height scaled to keep the
    /// capture's aspect ratio.
    pub fn scaled_size(&self) -> (f64, f64) {
        let width = PAGE_WIDTH_PT;
        let height = f64::from(self.pixel_height) * width / f64::from(self.pixel_width);
        (width, height)
    }
}

pub fn export_raster(capture: &TableCapture) -> Result<ExportArtifact, ExportError> {
    capture.validate()?;
    Ok(ExportArtifact {
        file_name: RASTER_FILE_NAME.to_string(),
        mime_type: RASTER_MIME.to_string(),
        bytes: write_single_page_pdf(capture),
    })
}

/// Minimal PDF writer: catalog, page tree, one page, one DCTDecode image
/// XObject, one content stream drawing it anchored at the top-left.
fn write_single_page_pdf(capture: &TableCapture) -> Vec<u8> {
    let (image_width, image_height) = capture.scaled_size();
    // PDF y axis grows upward; anchor the image at the top edge.
    let image_y = PAGE_HEIGHT_PT - image_height;
    let content = format!(
        "q\n{image_width:.2} 0 0 {image_height:.2} 0 {image_y:.2} cm\n/Im0 Do\nQ\n"
    );

    let mut pdf = PdfWriter::new();
    pdf.object(1, b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
    pdf.object(2, b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_vec());
    pdf.object(
        3,
        format!(
            "<< /Type /Page /Parent 2 0 R \
             /MediaBox [0 0 {PAGE_WIDTH_PT} {PAGE_HEIGHT_PT}] \
             /Resources << /XObject << /Im0 4 0 R >> /ProcSet [/PDF /ImageC] >> \
             /Contents 5 0 R >>"
        )
        .into_bytes(),
    );
    pdf.stream_object(
        4,
        format!(
            "<< /Type /XObject /Subtype /Image \
             /Width {} /Height {} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 \
             /Filter /DCTDecode /Length {} >>",
            capture.pixel_width,
            capture.pixel_height,
            capture.jpeg.len()
        )
        .into_bytes(),
        &capture.jpeg,
    );
    pdf.stream_object(
        5,
        format!("<< /Length {} >>", content.len()).into_bytes(),
        content.as_bytes(),
    );
    pdf.finish()
}

struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        Self {
            buf: b"%PDF-1.4\n".to_vec(),
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, id: u32, body: Vec<u8>) {
        self.offsets.push(self.buf.len());
        self.buf.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
        self.buf.extend_from_slice(&body);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    fn stream_object(&mut self, id: u32, dictionary: Vec<u8>, stream: &[u8]) {
        self.offsets.push(self.buf.len());
        self.buf.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
        self.buf.extend_from_slice(&dictionary);
        self.buf.extend_from_slice(b"\nstream\n");
        self.buf.extend_from_slice(stream);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn finish(mut self) -> Vec<u8> {
        let xref_offset = self.buf.len();
        let count = self.offsets.len() + 1;
        self.buf
            .extend_from_slice(format!("xref\n0 {count}\n").as_bytes());
        self.buf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &self.offsets {
            self.buf
                .extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        self.buf.extend_from_slice(
            format!(
                "trailer\n<< /Size {count} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
            )
            .as_bytes(),
        );
        self.buf
    }
}
