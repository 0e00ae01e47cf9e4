use super::*;
use crate::{
    compose::caption::NoCaption,
    config::options::DistortionOption,
    foundation::{core::Dimensions, error::CardError},
    geometry::quad::{CornerOffset, CornerOffsets},
    pipeline::sink::MemorySink,
};

fn white(w: u32, h: u32) -> RasterImage {
    RasterImage::filled(Dimensions::new(w, h).unwrap(), [255, 255, 255, 255])
}

fn reached(stages: &[Stage]) -> Vec<PipelineState> {
    stages.iter().copied().map(PipelineState::Reached).collect()
}

#[test]
fn flat_card_walks_every_stage_but_warp() {
    let mut pipeline = CardPipeline::default();
    let mut sink = MemorySink::new();
    let receipt = pipeline
        .run(white(400, 400), &CardRequest::default(), &mut NoCaption, &mut sink)
        .unwrap();

    assert_eq!(receipt.location, "memory://card-0.png");
    assert_eq!((receipt.width, receipt.height), (400, 400));
    assert_eq!(
        pipeline.history(),
        reached(&[
            Stage::ReceivedOptions,
            Stage::Resized,
            Stage::LayersBuilt,
            Stage::Composited,
            Stage::EncodedAndStored,
            Stage::Done,
        ])
    );
    assert_eq!(pipeline.state(), Some(&PipelineState::Reached(Stage::Done)));
}

#[test]
fn tilted_card_is_warped_into_its_bounding_box() {
    let mut pipeline = CardPipeline::default();
    let options = CardOptions {
        distortion: Some(DistortionOption::Flag(true)),
        ..CardOptions::default()
    };
    let out = pipeline
        .build_card(white(400, 400), &options, &mut NoCaption)
        .unwrap();

    assert!(out.homography.is_some());
    assert_eq!((out.width(), out.height()), (400, 370));
    assert!(!out.image.premultiplied);
    assert_eq!(pipeline.state(), Some(&PipelineState::Reached(Stage::Warped)));
    // Above the leaning top edge nothing is mapped.
    assert_eq!(out.image.pixel(2, 0).unwrap()[3], 0);
}

#[test]
fn bad_options_fail_before_any_pixel_work() {
    let mut pipeline = CardPipeline::default();
    let mut sink = MemorySink::new();
    let request = CardRequest {
        options: CardOptions {
            border_style: "ridge".to_owned(),
            ..CardOptions::default()
        },
        ..CardRequest::default()
    };
    let err = pipeline
        .run(white(40, 40), &request, &mut NoCaption, &mut sink)
        .unwrap_err();

    assert!(matches!(err, CardError::InvalidConfiguration(_)));
    assert!(matches!(
        pipeline.history(),
        [PipelineState::Failed {
            stage: Stage::ReceivedOptions,
            ..
        }]
    ));
    assert!(sink.cards().is_empty());
}

#[test]
fn oversized_border_fails_at_layers() {
    let mut pipeline = CardPipeline::default();
    let options = CardOptions {
        stroke_width: 1000.0,
        ..CardOptions::default()
    };
    let err = pipeline
        .build_card(white(40, 40), &options, &mut NoCaption)
        .unwrap_err();

    assert!(matches!(err, CardError::InvalidGeometry(_)));
    assert_eq!(
        pipeline.state(),
        Some(&PipelineState::Failed {
            stage: Stage::LayersBuilt,
            reason: err.to_string(),
        })
    );
}

#[test]
fn collapsed_corners_fail_at_warp_without_fallback() {
    let mut pipeline = CardPipeline::default();
    let options = CardOptions {
        distortion: Some(DistortionOption::Offsets(CornerOffsets {
            tr: CornerOffset { x: -400.0, y: 0.0 },
            ..CornerOffsets::default()
        })),
        ..CardOptions::default()
    };
    let err = pipeline
        .build_card(white(400, 400), &options, &mut NoCaption)
        .unwrap_err();

    assert!(matches!(err, CardError::SingularTransform(_)));
    assert!(matches!(
        pipeline.state(),
        Some(PipelineState::Failed {
            stage: Stage::Warped,
            ..
        })
    ));
}

#[test]
fn history_resets_between_runs() {
    let mut pipeline = CardPipeline::new(PipelineSettings {
        max_width: 20,
        ..PipelineSettings::default()
    });
    let bad = CardOptions {
        stroke_width: -1.0,
        ..CardOptions::default()
    };
    assert!(pipeline.build_card(white(40, 40), &bad, &mut NoCaption).is_err());

    let out = pipeline
        .build_card(white(40, 40), &CardOptions::default(), &mut NoCaption)
        .unwrap();
    assert_eq!((out.width(), out.height()), (20, 20));
    assert_eq!(pipeline.history().len(), 4);
}

#[test]
fn runaway_offsets_fail_at_warp_with_invalid_geometry() {
    let mut pipeline = CardPipeline::default();
    let options = CardOptions {
        distortion: Some(DistortionOption::Offsets(CornerOffsets {
            br: CornerOffset {
                x: 30_000.0,
                y: 30_000.0,
            },
            ..CornerOffsets::default()
        })),
        ..CardOptions::default()
    };
    let err = pipeline
        .build_card(white(200, 100), &options, &mut NoCaption)
        .unwrap_err();

    assert!(matches!(err, CardError::InvalidGeometry(_)));
    assert!(matches!(
        pipeline.state(),
        Some(PipelineState::Failed {
            stage: Stage::Warped,
            ..
        })
    ));
}
