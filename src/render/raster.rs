use std::sync::Arc;

use image::ImageEncoder as _;

use crate::{
    format::RasterTarget,
    foundation::error::{PlaceholdError, PlaceholdResult},
    render::{font::FontData, layout::SvgDocument},
};

/// Rasterizes the canonical document into an encoded image.
pub trait RasterEncoder: Send + Sync {
    fn encode(
        &self,
        doc: &SvgDocument,
        font: &FontData,
        target: RasterTarget,
    ) -> PlaceholdResult<Vec<u8>>;
}

/// Lossy codec settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderOpts {
    /// JPEG quality, 1..=100.
    pub jpeg_quality: u8,
    /// AVIF encoder speed, 1 (slow) ..= 10 (fast).
    pub avif_speed: u8,
    /// AVIF quality, 1..=100.
    pub avif_quality: u8,
}

impl Default for EncoderOpts {
    fn default() -> Self {
        Self {
            jpeg_quality: 85,
            avif_speed: 8,
            avif_quality: 80,
        }
    }
}

/// `resvg` rasterizer feeding the `image` codecs.
///
/// Text is shaped against a font database holding only the request's font, so output does
/// not depend on fonts installed on the host.
#[derive(Clone, Debug, Default)]
pub struct ResvgEncoder {
    pub opts: EncoderOpts,
}

impl ResvgEncoder {
    pub fn new(opts: EncoderOpts) -> Self {
        Self { opts }
    }

    /// Render to straight-alpha RGBA8, `width * height * 4` bytes.
    pub fn rasterize(&self, doc: &SvgDocument, font: &FontData) -> PlaceholdResult<Vec<u8>> {
        let opts = usvg::Options {
            fontdb: Arc::new(font.database()),
            font_resolver: single_font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&doc.svg, &opts)
            .map_err(|e| PlaceholdError::render(format!("parse svg document: {e}")))?;

        let (w, h) = (doc.canvas.width, doc.canvas.height);
        let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
            .ok_or_else(|| PlaceholdError::render(format!("failed to allocate {w}x{h} pixmap")))?;

        let sx = (w as f32) / tree.size().width();
        let sy = (h as f32) / tree.size().height();
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::from_scale(sx, sy),
            &mut pixmap.as_mut(),
        );

        let mut out = Vec::with_capacity(pixmap.data().len());
        for px in pixmap.pixels() {
            let c = px.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Ok(out)
    }
}

impl RasterEncoder for ResvgEncoder {
    #[tracing::instrument(skip(self, doc, font), fields(canvas = %doc.canvas))]
    fn encode(
        &self,
        doc: &SvgDocument,
        font: &FontData,
        target: RasterTarget,
    ) -> PlaceholdResult<Vec<u8>> {
        let rgba = self.rasterize(doc, font)?;
        let (w, h) = (doc.canvas.width, doc.canvas.height);
        let mut buf = Vec::new();

        let res = match target {
            RasterTarget::Png => image::codecs::png::PngEncoder::new(&mut buf).write_image(
                &rgba,
                w,
                h,
                image::ExtendedColorType::Rgba8,
            ),
            RasterTarget::Jpeg => {
                let rgb = drop_alpha(&rgba);
                image::codecs::jpeg::JpegEncoder::new_with_quality(
                    &mut buf,
                    self.opts.jpeg_quality.clamp(1, 100),
                )
                .write_image(&rgb, w, h, image::ExtendedColorType::Rgb8)
            }
            RasterTarget::WebpLossless => image::codecs::webp::WebPEncoder::new_lossless(&mut buf)
                .write_image(&rgba, w, h, image::ExtendedColorType::Rgba8),
            RasterTarget::Avif => image::codecs::avif::AvifEncoder::new_with_speed_quality(
                &mut buf,
                self.opts.avif_speed.clamp(1, 10),
                self.opts.avif_quality.clamp(1, 100),
            )
            .write_image(&rgba, w, h, image::ExtendedColorType::Rgba8),
        };
        res.map_err(|e| PlaceholdError::render(format!("encode {target:?}: {e}")))?;

        tracing::debug!(bytes = buf.len(), ?target, "encoded raster");
        Ok(buf)
    }
}

fn drop_alpha(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}

/// Resolve requested families against the database, then fall back to its first face.
fn single_font_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let families: Vec<usvg::fontdb::Family<'_>> = font
                .families()
                .iter()
                .map(|family| match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                })
                .collect();

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };

            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
