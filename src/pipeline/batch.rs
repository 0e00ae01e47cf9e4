//! Parallel card batches on a dedicated rayon pool.

use rayon::prelude::*;

use crate::{
    compose::caption::CaptionRenderer,
    config::options::{CardRequest, PipelineSettings},
    foundation::error::{CardError, CardResult},
    pipeline::{
        driver::{CardOutput, CardPipeline},
        sink::encode_card,
    },
    raster::image::RasterImage,
};

/// One independent card to build.
#[derive(Clone, Debug)]
pub struct BatchJob {
    /// Decoded source photo.
    pub source: RasterImage,
    /// Options and output format for this card.
    pub request: CardRequest,
}

/// A finished batch card, already encoded in its requested format.
#[derive(Clone, Debug)]
pub struct EncodedCard {
    /// The card raster and its warp, if any.
    pub output: CardOutput,
    /// The card encoded as `request.output_format`.
    pub bytes: Vec<u8>,
}

/// Thread pool configuration for [`render_batch`].
#[derive(Clone, Debug, Default)]
pub struct BatchThreading {
    /// Worker count; `None` lets rayon decide.
    pub threads: Option<usize>,
}

/// Build and encode many cards in parallel.
///
/// Every worker owns one caption renderer from `make_captions`. Results come back in job
/// order; one failing job does not stop the others.
#[tracing::instrument(level = "debug", skip_all, fields(jobs = jobs.len()))]
pub fn render_batch<C, F>(
    jobs: Vec<BatchJob>,
    settings: PipelineSettings,
    threading: &BatchThreading,
    make_captions: F,
) -> CardResult<Vec<CardResult<EncodedCard>>>
where
    C: CaptionRenderer,
    F: Fn() -> C + Sync + Send,
{
    let pool = build_thread_pool(threading.threads)?;
    let results = pool.install(|| {
        jobs.into_par_iter()
            .map_init(
                || (make_captions(), CardPipeline::new(settings)),
                |(captions, pipeline), job| -> CardResult<EncodedCard> {
                    let output = pipeline.build_card(job.source, &job.request.options, captions)?;
                    let bytes = encode_card(&output.image, job.request.output_format)?;
                    Ok(EncodedCard { output, bytes })
                },
            )
            .collect::<Vec<_>>()
    });

    let failed = results.iter().filter(|r| r.is_err()).count();
    tracing::debug!(done = results.len() - failed, failed, "batch finished");
    Ok(results)
}

fn build_thread_pool(threads: Option<usize>) -> CardResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CardError::invalid_configuration(
            "batch threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CardError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/batch.rs"]
mod tests;
