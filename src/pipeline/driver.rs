//! The staged single-card pipeline.

use crate::{
    compose::{
        caption::CaptionRenderer,
        layers::{LayerStack, composite},
    },
    config::options::{CardOptions, CardRequest, OutputFormat, PipelineSettings},
    foundation::error::CardResult,
    geometry::quad::Distortion,
    pipeline::sink::CardSink,
    raster::{image::RasterImage, ingest::normalize_source},
    transform::{homography::Homography, warp::warp_with_distortion},
};

/// Steps of one card run, in the order they are reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Options parsed and validated into a card spec.
    ReceivedOptions,
    /// Source cover-fitted to the card size.
    Resized,
    /// Layer stack built and its geometry checked.
    LayersBuilt,
    /// Layers flattened into one premultiplied raster.
    Composited,
    /// Perspective warp applied; skipped for flat cards.
    Warped,
    /// Card encoded and handed to the sink.
    EncodedAndStored,
    /// Run finished.
    Done,
}

/// Entry in a run's transition history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineState {
    /// The stage completed.
    Reached(Stage),
    /// The run aborted.
    Failed {
        /// Step that was being attempted.
        stage: Stage,
        /// Display form of the error.
        reason: String,
    },
}

/// A composited card before encoding.
#[derive(Clone, Debug)]
pub struct CardOutput {
    /// Straight RGBA8.
    pub image: RasterImage,
    /// Set when the card was perspective-warped.
    pub homography: Option<Homography>,
}

impl CardOutput {
    /// Final width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width
    }

    /// Final height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height
    }
}

/// What a completed run hands back to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardReceipt {
    /// Location string returned by the sink.
    pub location: String,
    /// Final width in pixels.
    pub width: u32,
    /// Final height in pixels.
    pub height: u32,
    /// Encoding the card was stored in.
    pub format: OutputFormat,
}

/// Drives one request through resize, layering, compositing, warping and storage.
///
/// Each run starts a fresh history; the first failure aborts the run and is recorded as
/// [`PipelineState::Failed`].
#[derive(Clone, Debug, Default)]
pub struct CardPipeline {
    settings: PipelineSettings,
    history: Vec<PipelineState>,
}

impl CardPipeline {
    /// Pipeline with explicit settings; [`Default`] uses [`PipelineSettings::default`].
    pub fn new(settings: PipelineSettings) -> Self {
        Self {
            settings,
            history: Vec::new(),
        }
    }

    /// Transitions of the most recent run.
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Last entry of the history, if any.
    pub fn state(&self) -> Option<&PipelineState> {
        self.history.last()
    }

    /// Full run: build the card, then encode and store it through `sink`.
    #[tracing::instrument(
        skip_all,
        fields(width = source.width, height = source.height, format = ?request.output_format)
    )]
    pub fn run(
        &mut self,
        source: RasterImage,
        request: &CardRequest,
        captions: &mut dyn CaptionRenderer,
        sink: &mut dyn CardSink,
    ) -> CardResult<CardReceipt> {
        let out = self.build_card(source, &request.options, captions)?;
        let location = self.attempt(
            Stage::EncodedAndStored,
            sink.store(&out.image, request.output_format),
        )?;
        self.reach(Stage::Done);

        Ok(CardReceipt {
            location,
            width: out.width(),
            height: out.height(),
            format: request.output_format,
        })
    }

    /// Build the card raster without touching any storage.
    pub fn build_card(
        &mut self,
        source: RasterImage,
        options: &CardOptions,
        captions: &mut dyn CaptionRenderer,
    ) -> CardResult<CardOutput> {
        self.history.clear();

        let spec = self.attempt(Stage::ReceivedOptions, options.resolve(&self.settings))?;
        let resized = self.attempt(
            Stage::Resized,
            normalize_source(source, self.settings.max_width),
        )?;
        let size = resized.dimensions();
        let stack = self.attempt(Stage::LayersBuilt, LayerStack::for_card(resized, &spec))?;
        let card = self.attempt(Stage::Composited, composite(size, &stack, captions))?;

        if spec.distortion == Distortion::None {
            return Ok(CardOutput {
                image: card.into_straight(),
                homography: None,
            });
        }

        let warped = self.attempt(Stage::Warped, warp_with_distortion(&card, &spec.distortion))?;
        Ok(match warped {
            Some(w) => CardOutput {
                image: w.image.into_straight(),
                homography: Some(w.homography),
            },
            None => CardOutput {
                image: card.into_straight(),
                homography: None,
            },
        })
    }

    fn reach(&mut self, stage: Stage) {
        tracing::debug!(?stage, "pipeline stage reached");
        self.history.push(PipelineState::Reached(stage));
    }

    fn attempt<T>(&mut self, stage: Stage, result: CardResult<T>) -> CardResult<T> {
        match result {
            Ok(v) => {
                self.reach(stage);
                Ok(v)
            }
            Err(e) => {
                tracing::warn!(?stage, kind = ?e.kind(), error = %e, "pipeline failed");
                self.history.push(PipelineState::Failed {
                    stage,
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

/// Run one request with default settings.
pub fn render_card(
    source: RasterImage,
    request: &CardRequest,
    captions: &mut dyn CaptionRenderer,
    sink: &mut dyn CardSink,
) -> CardResult<CardReceipt> {
    CardPipeline::default().run(source, request, captions, sink)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/driver.rs"]
mod tests;
