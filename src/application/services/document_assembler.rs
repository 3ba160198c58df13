//! Document assembly - story text plus illustration into one PDF
//!
//! Produces a paginated A4 document: the normalized story as a flowed text
//! block that continues onto fresh pages as needed, then the illustration
//! below the last text block at a fixed width (or on its own page when the
//! remaining space is too small). The caller hands over already-fetched
//! image bytes; decoding and embedding stay scoped to this call and nothing
//! is staged on disk.

use printpdf::image_crate::{self, GenericImageView};
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const FONT_SIZE_PT: f32 = 12.0;
const LINE_HEIGHT_PT: f32 = 14.0;
const LINE_HEIGHT_MM: f32 = LINE_HEIGHT_PT * 0.3528;
/// Characters per wrapped line for Helvetica 12pt inside the margins
const WRAP_COLUMNS: usize = 90;
/// Vertical gap between the text block and the illustration
const IMAGE_GAP_MM: f32 = 10.0;

/// Document serialization failed; fatal to the run
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("PDF serialization failed: {0}")]
    Pdf(String),
}

/// Result of one assembly call
#[derive(Debug)]
pub struct AssembledDocument {
    /// Serialized PDF, independently valid as a document
    pub bytes: Vec<u8>,
    /// Set when image bytes were provided but could not be decoded or
    /// embedded; the document is still produced text-only
    pub embed_failure: Option<String>,
}

/// Assembles normalized story text and optional image bytes into a PDF
pub struct DocumentAssembler {
    image_width_mm: f32,
}

impl DocumentAssembler {
    pub fn new() -> Self {
        Self {
            image_width_mm: 100.0,
        }
    }
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentAssembler {
    /// Build the paginated document.
    ///
    /// `text` must already be normalized to the restricted character set.
    /// `image` is `None` when the upstream fetch failed; a decode failure
    /// here is likewise recoverable and recorded in `embed_failure`.
    pub fn assemble(
        &self,
        text: &str,
        image: Option<&[u8]>,
    ) -> Result<AssembledDocument, AssemblyError> {
        let (doc, page, layer) = PdfDocument::new(
            "Generated Adventure",
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "story",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AssemblyError::Pdf(e.to_string()))?;

        let mut layer = doc.get_page(page).get_layer(layer);
        let lines = wrap_lines(text, WRAP_COLUMNS);
        let mut lines_on_last_page = 0;

        for (page_idx, chunk) in lines.chunks(lines_per_page()).enumerate() {
            if page_idx > 0 {
                let (next_page, next_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "story");
                layer = doc.get_page(next_page).get_layer(next_layer);
            }

            layer.begin_text_section();
            layer.set_font(&font, FONT_SIZE_PT);
            layer.set_line_height(LINE_HEIGHT_PT);
            layer.set_text_cursor(Mm(MARGIN_MM), Mm(PAGE_HEIGHT_MM - MARGIN_MM - LINE_HEIGHT_MM));
            for line in chunk {
                layer.write_text(line.as_str(), &font);
                layer.add_line_break();
            }
            layer.end_text_section();

            lines_on_last_page = chunk.len();
        }

        let mut embed_failure = None;
        if let Some(bytes) = image {
            match image_crate::load_from_memory(bytes) {
                Ok(decoded) => {
                    let (px_w, px_h) = decoded.dimensions();
                    // flatten alpha; builtin PDF image XObjects are RGB
                    let decoded = image_crate::DynamicImage::ImageRgb8(decoded.to_rgb8());
                    let pdf_image = Image::from_dynamic_image(&decoded);

                    // dpi chosen so the rendered width is exactly image_width_mm
                    let dpi = px_w as f32 * 25.4 / self.image_width_mm;
                    let image_height_mm = px_h as f32 * 25.4 / dpi;

                    let y = match image_y_below_text(lines_on_last_page, image_height_mm) {
                        Some(y) => y,
                        None => {
                            // not enough room under the text block; the
                            // illustration gets its own page
                            let (next_page, next_layer) =
                                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "story");
                            layer = doc.get_page(next_page).get_layer(next_layer);
                            (PAGE_HEIGHT_MM - MARGIN_MM - image_height_mm).max(MARGIN_MM)
                        }
                    };

                    pdf_image.add_to_layer(
                        layer.clone(),
                        ImageTransform {
                            translate_x: Some(Mm(MARGIN_MM)),
                            translate_y: Some(Mm(y)),
                            dpi: Some(dpi),
                            ..Default::default()
                        },
                    );
                }
                Err(e) => {
                    embed_failure = Some(format!("could not decode image: {e}"));
                }
            }
        }

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| AssemblyError::Pdf(e.to_string()))?;

        Ok(AssembledDocument {
            bytes,
            embed_failure,
        })
    }
}

/// How many wrapped lines fit between the top and bottom margins
fn lines_per_page() -> usize {
    ((PAGE_HEIGHT_MM - 2.0 * MARGIN_MM) / LINE_HEIGHT_MM) as usize
}

/// Bottom edge of the text block after `lines_on_page` wrapped lines
fn text_bottom_mm(lines_on_page: usize) -> f32 {
    PAGE_HEIGHT_MM - MARGIN_MM - (lines_on_page as f32 + 1.0) * LINE_HEIGHT_MM
}

/// Y position that puts the image fully below the text block on the same
/// page, or `None` when the remaining space cannot hold it
fn image_y_below_text(lines_on_last_page: usize, image_height_mm: f32) -> Option<f32> {
    let y = text_bottom_mm(lines_on_last_page) - IMAGE_GAP_MM - image_height_mm;
    (y >= MARGIN_MM).then_some(y)
}

/// Greedy word wrap at a fixed column width, preserving paragraph breaks
fn wrap_lines(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty() && current.len() + 1 + word.len() > columns {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use printpdf::image_crate::ImageOutputFormat;

    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image_crate::DynamicImage::new_rgb8(8, 8);
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageOutputFormat::Png)
            .expect("encode test png");
        bytes.into_inner()
    }

    /// Roughly a 3,800-character story, the length a typical generation
    /// produces; wraps to around 40 lines
    fn typical_story() -> String {
        let sentence = "Eliana soared over the shimmering waves and wondered what the day would bring. ";
        sentence.repeat(48)
    }

    #[test]
    fn test_text_only_document_is_valid_pdf() {
        let doc = DocumentAssembler::new()
            .assemble("Eliana found a cave.", None)
            .unwrap();
        assert!(doc.bytes.starts_with(b"%PDF"));
        assert!(doc.embed_failure.is_none());
    }

    #[test]
    fn test_image_is_embedded() {
        let png = tiny_png();
        let doc = DocumentAssembler::new()
            .assemble("Eliana found a cave.", Some(&png))
            .unwrap();
        assert!(doc.bytes.starts_with(b"%PDF"));
        assert!(doc.embed_failure.is_none());

        // the illustrated document carries an image XObject the text-only
        // variant does not
        let text_only = DocumentAssembler::new()
            .assemble("Eliana found a cave.", None)
            .unwrap();
        assert!(doc.bytes.len() > text_only.bytes.len());
    }

    #[test]
    fn test_undecodable_image_still_produces_document() {
        let doc = DocumentAssembler::new()
            .assemble("Eliana found a cave.", Some(b"not an image"))
            .unwrap();
        assert!(doc.bytes.starts_with(b"%PDF"));
        assert!(doc.embed_failure.is_some());
    }

    #[test]
    fn test_image_never_overlaps_short_text() {
        // a 100 mm image after a few lines stays on the page, below the text
        let y = image_y_below_text(5, 100.0).expect("image fits on the page");
        assert!(y >= MARGIN_MM);
        assert!(y + 100.0 + IMAGE_GAP_MM <= text_bottom_mm(5) + 0.01);
    }

    #[test]
    fn test_full_text_page_pushes_image_to_next_page() {
        // a typical story fills most of the page; a square 100 mm
        // illustration cannot go below it without overprinting the text
        let lines = wrap_lines(&typical_story(), WRAP_COLUMNS);
        assert!(lines.len() >= 40);
        assert!(image_y_below_text(lines.len(), 100.0).is_none());
    }

    #[test]
    fn test_long_story_flows_across_pages() {
        // twice the typical story exceeds one page of lines; the text must
        // paginate rather than run off the bottom edge
        let story = typical_story().repeat(2);
        let lines = wrap_lines(&story, WRAP_COLUMNS);
        assert!(lines.len() > lines_per_page());

        let doc = DocumentAssembler::new()
            .assemble(&story, Some(&tiny_png()))
            .unwrap();
        assert!(doc.bytes.starts_with(b"%PDF"));
        assert!(doc.embed_failure.is_none());

        // every page holds at most a margin-to-margin block of lines
        for chunk in lines.chunks(lines_per_page()) {
            assert!(text_bottom_mm(chunk.len()) >= 0.0);
        }
    }

    #[test]
    fn test_wrap_lines_respects_column_width() {
        let text = "one two three four five six seven eight nine ten";
        let lines = wrap_lines(text, 20);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.len() <= 20));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_lines_preserves_paragraph_breaks() {
        let lines = wrap_lines("first paragraph\n\nsecond paragraph", 40);
        assert_eq!(lines, vec!["first paragraph", "", "second paragraph"]);
    }

    #[test]
    fn test_wrap_lines_keeps_overlong_word_whole() {
        let word = "a".repeat(50);
        let lines = wrap_lines(&word, 20);
        assert_eq!(lines, vec![word]);
    }
}
