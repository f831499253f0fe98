//! Printable guide assembly and export

use crate::error::{AppError, Result};
use crate::models::{AppMode, GeneratedContent, Preserve};
use crate::paths::get_export_dir;
use chrono::{DateTime, Local};
use log::info;
use printpdf::image_crate;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex, Rgb,
};
use std::path::PathBuf;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
/// Cursor position at the top of a fresh page
const TOP_MM: f32 = 20.0;
const QR_SIZE_MM: f32 = 40.0;
const QR_PIXELS: u32 = 150;

const PT_TO_MM: f32 = 0.352_778;
/// Average Helvetica glyph advance as a fraction of the font size. The
/// estimate errs wide, wrapping a little early rather than overflowing.
const AVG_GLYPH_EM: f32 = 0.55;

const SCHOOL_NAME: &str = "Escuela 4-188 Padre Eduardo Sergio Iácono";

/// Estimated rendered width of one line, in millimeters
fn text_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * PT_TO_MM * AVG_GLYPH_EM
}

/// Greedy word wrap against the width estimate. A single word wider than
/// the limit is emitted on its own line rather than split.
fn wrap_text(text: &str, font_size: f32, max_width_mm: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if current.is_empty() || text_width_mm(&candidate, font_size) <= max_width_mm {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Export filename, whitespace replaced with underscores
fn guide_filename(preserve_name: &str) -> String {
    let cleaned: String = preserve_name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("Guia_{}.pdf", cleaned)
}

fn header_line(mode: AppMode, generated_at: DateTime<Local>) -> String {
    format!(
        "Descargado: {} - {}",
        generated_at.format("%d/%m/%Y %H:%M"),
        mode.label()
    )
}

#[derive(Clone, Copy)]
enum Face {
    Regular,
    Bold,
    Italic,
}

/// Page writer with a top-down cursor. Pages are tracked so the running
/// header can be stamped on all of them once the total count is known.
struct GuideWriter {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    /// Distance from the top edge, in mm
    y: f32,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl GuideWriter {
    fn new(title: &str) -> std::result::Result<Self, String> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "contenido");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| format!("Failed to load font: {}", e))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| format!("Failed to load font: {}", e))?;
        let italic = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(|e| format!("Failed to load font: {}", e))?;
        Ok(Self {
            doc,
            pages: vec![(page, layer)],
            y: TOP_MM,
            regular,
            bold,
            italic,
        })
    }

    fn layer(&self) -> PdfLayerReference {
        let (page, layer) = self.pages[self.pages.len() - 1];
        self.doc.get_page(page).get_layer(layer)
    }

    fn font(&self, face: Face) -> &IndirectFontRef {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
            Face::Italic => &self.italic,
        }
    }

    fn add_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "contenido");
        self.pages.push((page, layer));
        self.y = TOP_MM;
    }

    /// Starts a new page unless `needed_mm` still fits above the bottom margin
    fn ensure_room(&mut self, needed_mm: f32) {
        if self.y + needed_mm > PAGE_HEIGHT_MM - MARGIN_MM {
            self.add_page();
        }
    }

    /// Draws one line at the cursor without advancing it
    fn write_line(&self, text: &str, size: f32, face: Face, x: f32) {
        self.layer()
            .use_text(text, size, Mm(x), Mm(PAGE_HEIGHT_MM - self.y), self.font(face));
    }

    fn write_centered(&self, text: &str, size: f32, face: Face) {
        let x = (PAGE_WIDTH_MM - text_width_mm(text, size)).max(0.0) / 2.0;
        self.write_line(text, size, face, x);
    }

    fn heading(&mut self, title: &str) {
        self.write_line(title, 16.0, Face::Bold, MARGIN_MM);
        self.y += 8.0;
    }

    fn set_text_color(&self, r: f32, g: f32, b: f32) {
        self.layer().set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
    }

    /// Stamps the running header on every page and serializes the document
    fn finish(self, header: &str) -> std::result::Result<Vec<u8>, String> {
        let total = self.pages.len();
        for (index, (page, layer)) in self.pages.iter().enumerate() {
            let layer = self.doc.get_page(*page).get_layer(*layer);
            layer.set_fill_color(Color::Rgb(Rgb::new(0.588, 0.588, 0.588, None)));
            layer.use_text(
                header,
                8.0,
                Mm(MARGIN_MM),
                Mm(PAGE_HEIGHT_MM - 10.0),
                &self.regular,
            );
            let page_label = format!("Página {} de {}", index + 1, total);
            let x = PAGE_WIDTH_MM - MARGIN_MM - text_width_mm(&page_label, 8.0);
            layer.use_text(
                page_label,
                8.0,
                Mm(x),
                Mm(PAGE_HEIGHT_MM - 10.0),
                &self.regular,
            );
            layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        }
        self.doc
            .save_to_bytes()
            .map_err(|e| format!("Failed to serialize PDF: {}", e))
    }
}

/// Assembles the complete guide document in memory
fn build_guide(
    preserve: &Preserve,
    content: &GeneratedContent,
    mode: AppMode,
    playlist_url: &str,
    qr_png: &[u8],
    generated_at: DateTime<Local>,
) -> std::result::Result<Vec<u8>, String> {
    let mut writer = GuideWriter::new(&preserve.name)?;
    let body_width = PAGE_WIDTH_MM - MARGIN_MM * 2.0;

    writer.write_centered(&preserve.name, 22.0, Face::Bold);
    writer.y += 15.0;

    writer.heading("Definición del Producto");
    for line in wrap_text(&content.definition, 11.0, body_width) {
        writer.write_line(&line, 11.0, Face::Regular, MARGIN_MM);
        writer.y += 5.0;
    }
    writer.y += 10.0;

    if let Some(points) = &preserve.critical_points {
        writer.ensure_room(25.0);
        writer.heading("Puntos Críticos de Control");
        if let Some(ph) = &points.ph {
            writer.write_line(&format!("- pH Objetivo: {}", ph), 11.0, Face::Regular, MARGIN_MM);
            writer.y += 6.0;
        }
        if let Some(brix) = &points.brix {
            writer.write_line(
                &format!("- Brix Objetivo: {}", brix),
                11.0,
                Face::Regular,
                MARGIN_MM,
            );
            writer.y += 6.0;
        }
        writer.y += 10.0;
    }

    writer.ensure_room(25.0);
    writer.heading("Proceso de Elaboración");
    for step in &content.process {
        let title_lines = wrap_text(&format!("{}. {}", step.id, step.title), 12.0, body_width);
        let desc_lines = wrap_text(&step.description, 11.0, body_width - 5.0);
        // Each step block stays on one page
        let block_height = title_lines.len() as f32 * 6.0 + desc_lines.len() as f32 * 5.0 + 8.0;
        writer.ensure_room(block_height);

        for line in &title_lines {
            writer.write_line(line, 12.0, Face::Bold, MARGIN_MM);
            writer.y += 6.0;
        }
        for line in &desc_lines {
            writer.write_line(line, 11.0, Face::Regular, MARGIN_MM + 5.0);
            writer.y += 5.0;
        }
        writer.y += 8.0;
    }

    writer.ensure_room(65.0);
    writer.heading("Tutoriales en Video");
    writer.set_text_color(0.0, 0.0, 0.933);
    writer.write_line(playlist_url, 11.0, Face::Regular, MARGIN_MM);
    writer.set_text_color(0.0, 0.0, 0.0);
    writer.y += 10.0;

    let decoded = image_crate::load_from_memory(qr_png)
        .map_err(|e| format!("Failed to decode QR image: {}", e))?;
    let rgb = decoded.to_rgb8();
    let (px_width, px_height) = rgb.dimensions();
    if px_width == 0 || px_height == 0 {
        return Err("QR image has no pixels".to_string());
    }
    let qr_image = Image::from_dynamic_image(&image_crate::DynamicImage::ImageRgb8(rgb));
    // Images are anchored at their lower-left corner
    let dpi = px_width as f32 * 25.4 / QR_SIZE_MM;
    qr_image.add_to_layer(
        writer.layer(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN_MM)),
            translate_y: Some(Mm(PAGE_HEIGHT_MM - (writer.y + QR_SIZE_MM))),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
    writer.y += QR_SIZE_MM + 10.0;

    writer.ensure_room(20.0);
    let attribution = format!("Extraído de la App Hecho por Mi de la {}.", SCHOOL_NAME);
    let saved_y = writer.y;
    writer.y = PAGE_HEIGHT_MM - 20.0;
    writer.write_centered(&attribution, 10.0, Face::Italic);
    writer.y = saved_y;

    writer.finish(&header_line(mode, generated_at))
}

/// Fetches the scannable code image for the playlist URL
async fn fetch_qr_png(payload_url: &str) -> std::result::Result<Vec<u8>, String> {
    let request_url = format!(
        "https://api.qrserver.com/v1/create-qr-code/?size={}x{}&data={}",
        QR_PIXELS,
        QR_PIXELS,
        urlencoding::encode(payload_url)
    );

    let response = reqwest::get(&request_url)
        .await
        .map_err(|e| format!("QR download failed: {}", e))?;

    if !response.status().is_success() {
        return Err(format!(
            "QR download failed with status: {}",
            response.status()
        ));
    }

    response
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|e| format!("Failed to read QR response: {}", e))
}

/// Builds the guide for a recipe and writes it to the downloads directory.
/// Nothing is written unless every stage, including the remote code fetch,
/// succeeded. Returns the path of the saved document.
pub async fn export_guide(
    preserve: &Preserve,
    content: &GeneratedContent,
    mode: AppMode,
) -> Result<PathBuf> {
    let playlist_url = format!(
        "https://www.youtube.com/playlist?list={}",
        content.youtube_playlist_id
    );
    let qr_png = fetch_qr_png(&playlist_url).await.map_err(AppError::Export)?;
    let bytes = build_guide(preserve, content, mode, &playlist_url, &qr_png, Local::now())
        .map_err(AppError::Export)?;

    let export_dir = get_export_dir().map_err(AppError::Export)?;
    let path = export_dir.join(guide_filename(&preserve.name));
    std::fs::write(&path, &bytes)
        .map_err(|e| AppError::Export(format!("Failed to save PDF: {}", e)))?;

    info!("[export] guide saved to {:?} ({} bytes)", path, bytes.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CriticalPoints, FlowchartStep, StepShape};
    use chrono::TimeZone;

    fn sample_preserve() -> Preserve {
        Preserve {
            id: "mermelada-frutilla".to_string(),
            name: "Mermelada de Frutilla".to_string(),
            image: String::new(),
            critical_points: Some(CriticalPoints {
                ph: Some("Menor a 3,8".to_string()),
                brix: Some("Mínimo 65° Brix".to_string()),
            }),
            sterilization_times: Vec::new(),
        }
    }

    fn sample_content(steps: usize) -> GeneratedContent {
        let process = (1..=steps as u32)
            .map(|id| FlowchartStep {
                id,
                title: format!("Paso {}", id),
                description: "Lavar y desinfectar los frascos con agua caliente, \
                              revisando que no queden restos de producto anterior."
                    .to_string(),
                shape: StepShape::Rectangle,
            })
            .collect();
        GeneratedContent {
            definition: "Se entiende por mermelada de frutilla a la confitura elaborada \
                         por cocción de frutilla con azúcares hasta lograr una \
                         consistencia untable."
                .to_string(),
            process,
            youtube_playlist_id: "PL123".to_string(),
        }
    }

    fn tiny_png() -> Vec<u8> {
        let img = image_crate::DynamicImage::new_rgb8(8, 8);
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image_crate::ImageOutputFormat::Png,
        )
        .unwrap();
        bytes
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_guide_filename_replaces_whitespace() {
        assert_eq!(
            guide_filename("Mermelada de Frutilla"),
            "Guia_Mermelada_de_Frutilla.pdf"
        );
        assert_eq!(guide_filename("Kétchup Casero"), "Guia_Kétchup_Casero.pdf");
    }

    #[test]
    fn test_header_line_format() {
        assert_eq!(
            header_line(AppMode::Principiante, fixed_time()),
            "Descargado: 01/05/2024 10:30 - Modo Principiante"
        );
    }

    #[test]
    fn test_wrap_text_respects_width() {
        let text = "El correcto cumplimiento de los tiempos de esterilización es \
                    crucial para eliminar la carga microbiana y garantizar la \
                    inocuidad del producto final";
        let lines = wrap_text(text, 11.0, 60.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, 11.0) <= 60.0, "line too wide: {}", line);
        }
        // no words lost
        let rejoined = lines.join(" ");
        assert_eq!(rejoined.split_whitespace().count(), text.split_whitespace().count());
    }

    #[test]
    fn test_wrap_text_overlong_word_stands_alone() {
        let lines = wrap_text("ab supercalifragilisticoespialidoso cd", 11.0, 20.0);
        assert!(lines.contains(&"supercalifragilisticoespialidoso".to_string()));
    }

    #[test]
    fn test_wrap_text_empty_input() {
        assert_eq!(wrap_text("", 11.0, 100.0), vec![String::new()]);
    }

    #[test]
    fn test_build_guide_produces_pdf_bytes() {
        let bytes = build_guide(
            &sample_preserve(),
            &sample_content(3),
            AppMode::Profesional,
            "https://www.youtube.com/playlist?list=PL123",
            &tiny_png(),
            fixed_time(),
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_build_guide_paginates_long_processes() {
        let short = build_guide(
            &sample_preserve(),
            &sample_content(1),
            AppMode::Principiante,
            "https://www.youtube.com/playlist?list=PL123",
            &tiny_png(),
            fixed_time(),
        )
        .unwrap();
        let long = build_guide(
            &sample_preserve(),
            &sample_content(40),
            AppMode::Principiante,
            "https://www.youtube.com/playlist?list=PL123",
            &tiny_png(),
            fixed_time(),
        )
        .unwrap();
        assert!(long.starts_with(b"%PDF"));
        assert!(long.len() > short.len());
    }

    #[test]
    fn test_build_guide_rejects_undecodable_image() {
        let result = build_guide(
            &sample_preserve(),
            &sample_content(1),
            AppMode::Profesional,
            "https://www.youtube.com/playlist?list=PL123",
            b"not a png",
            fixed_time(),
        );
        assert!(result.is_err());
    }
}
