use anyhow::Context as _;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::domain::agreement_template::AgreementDocument;
use crate::domain::repository::PdfRenderer;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN_MM: f32 = 20.0;
const BODY_PT: f32 = 10.0;
const TITLE_PT: f32 = 16.0;
const LINE_MM: f32 = 5.5;
/// Rough capacity of one body line in Helvetica at `BODY_PT`.
const WRAP_CHARS: usize = 95;

/// A4 Helvetica renderer built on printpdf's builtin fonts.
#[derive(Clone, Copy, Default)]
pub struct PrintPdfRenderer;

/// Greedy word wrap on character count.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
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
    lines
}

struct Cursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl Cursor {
    fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        if self.y < MARGIN_MM {
            self.pages += 1;
            let (page, layer) = self
                .doc
                .add_page(PAGE_WIDTH, PAGE_HEIGHT, format!("Page {}", self.pages));
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT.0 - MARGIN_MM;
        }
        self.layer
            .use_text(text, size, Mm(MARGIN_MM), Mm(self.y), font);
        self.y -= LINE_MM;
    }

    fn gap(&mut self) {
        self.y -= LINE_MM;
    }
}

impl PdfRenderer for PrintPdfRenderer {
    fn render(&self, document: &AgreementDocument) -> anyhow::Result<Vec<u8>> {
        let (doc, page, layer) =
            PdfDocument::new(document.title.as_str(), PAGE_WIDTH, PAGE_HEIGHT, "Page 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .context("load Helvetica")?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .context("load Helvetica-Bold")?;
        let layer = doc.get_page(page).get_layer(layer);
        let mut cursor = Cursor {
            doc,
            layer,
            y: PAGE_HEIGHT.0 - MARGIN_MM,
            pages: 1,
        };

        cursor.line(&document.title, TITLE_PT, &bold);
        cursor.gap();
        for party in &document.parties {
            for line in wrap(party, WRAP_CHARS) {
                cursor.line(&line, BODY_PT, &regular);
            }
            cursor.gap();
        }
        for (i, clause) in document.clauses.iter().enumerate() {
            let numbered = format!("{}. {clause}", i + 1);
            for line in wrap(&numbered, WRAP_CHARS) {
                cursor.line(&line, BODY_PT, &regular);
            }
        }
        cursor.gap();
        cursor.gap();
        for signature in &document.signatures {
            cursor.line(signature, BODY_PT, &bold);
            cursor.gap();
        }

        cursor.doc.save_to_bytes().context("serialize agreement pdf")
    }
}
