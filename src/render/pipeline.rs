use std::sync::Arc;
use std::time::Duration;

use crate::{
    foundation::core::Canvas,
    foundation::error::{PlaceholdError, PlaceholdResult},
    params::ValidatedParameters,
    render::{
        font::{FontData, FontSource, RetryPolicy},
        layout::{LayoutEngine, SvgLayout},
        raster::{RasterEncoder, ResvgEncoder},
    },
    visual,
};

/// Encoded placeholder plus the metadata a transport needs to serve it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
    pub is_binary: bool,
    pub canvas: Canvas,
}

/// Validated parameters → font → canonical document → optional transcode.
///
/// Cheap to clone; the layout engine and encoder are shared.
#[derive(Clone)]
pub struct Renderer {
    layout: Arc<dyn LayoutEngine>,
    encoder: Arc<dyn RasterEncoder>,
    font: FontSource,
    retry: RetryPolicy,
    client: reqwest::Client,
}

impl Renderer {
    /// Renderer with the built-in SVG layout and `resvg` encoder.
    pub fn new(font: FontSource) -> PlaceholdResult<Self> {
        Self::with_fetch_timeout(font, Duration::from_secs(5))
    }

    /// Like [`Renderer::new`], bounding each HTTP font request by `timeout`.
    pub fn with_fetch_timeout(font: FontSource, timeout: Duration) -> PlaceholdResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlaceholdError::config(format!("build http client: {e}")))?;
        Ok(Self {
            layout: Arc::new(SvgLayout::default()),
            encoder: Arc::new(ResvgEncoder::default()),
            font,
            retry: RetryPolicy::default(),
            client,
        })
    }

    pub fn layout(mut self, layout: Arc<dyn LayoutEngine>) -> Self {
        self.layout = layout;
        self
    }

    pub fn encoder(mut self, encoder: Arc<dyn RasterEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn font_source(&self) -> &FontSource {
        &self.font
    }

    /// Fetch the font, then run the CPU stages on the blocking pool.
    pub async fn render(&self, params: &ValidatedParameters) -> PlaceholdResult<RenderedArtifact> {
        self.render_holding(params, ()).await
    }

    /// Like [`Renderer::render`], keeping `guard` alive until the CPU stages finish.
    ///
    /// Blocking stages are not cancelled when the caller stops waiting; `guard` is dropped only
    /// once they return.
    #[tracing::instrument(skip(self, params, guard), fields(token = %params))]
    pub async fn render_holding<G: Send + 'static>(
        &self,
        params: &ValidatedParameters,
        guard: G,
    ) -> PlaceholdResult<RenderedArtifact> {
        let font = match self.font.load(&self.client, &self.retry).await {
            Ok(font) => font,
            Err(err) => {
                tracing::error!(token = %params, error = %err, "font fetch failed");
                return Err(err);
            }
        };

        let this = self.clone();
        let params = *params;
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            this.render_with_font(&params, &font)
        })
        .await
        .map_err(|e| PlaceholdError::render(format!("render task failed: {e}")))?
    }

    /// Synchronous pipeline against an already loaded font.
    pub fn render_with_font(
        &self,
        params: &ValidatedParameters,
        font: &FontData,
    ) -> PlaceholdResult<RenderedArtifact> {
        let result = self.run_stages(params, font);
        match &result {
            Ok(artifact) => tracing::debug!(
                token = %params,
                bytes = artifact.bytes.len(),
                media_type = artifact.media_type,
                "rendered"
            ),
            Err(err) => tracing::error!(token = %params, error = %err, "render failed"),
        }
        result
    }

    fn run_stages(
        &self,
        params: &ValidatedParameters,
        font: &FontData,
    ) -> PlaceholdResult<RenderedArtifact> {
        let spec = visual::build(params);
        let canvas = params.canvas();
        let doc = self
            .layout
            .layout(&spec, canvas, font)
            .map_err(as_render_error)?;

        let format = params.format();
        let bytes = match format.raster_target() {
            None => doc.svg.into_bytes(),
            Some(target) => self
                .encoder
                .encode(&doc, font, target)
                .map_err(as_render_error)?,
        };

        let entry = format.entry();
        Ok(RenderedArtifact {
            bytes,
            media_type: entry.media_type,
            is_binary: entry.is_binary,
            canvas,
        })
    }
}

/// Stage failures surface as render errors regardless of what the collaborator returned.
fn as_render_error(err: PlaceholdError) -> PlaceholdError {
    match err {
        PlaceholdError::Render(_) => err,
        other => PlaceholdError::render(other.to_string()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
