//! Encoding finished cards and handing them to storage.

use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    config::options::OutputFormat,
    foundation::error::{CardError, CardResult},
    raster::image::RasterImage,
};

/// Destination for encoded cards. Both methods return a location string for the stored card.
pub trait CardSink {
    /// Store already encoded bytes.
    fn store_encoded(&mut self, bytes: Vec<u8>, format: OutputFormat) -> CardResult<String>;

    /// Encode `card` with [`encode_card`] and store the result.
    fn store(&mut self, card: &RasterImage, format: OutputFormat) -> CardResult<String> {
        let bytes = encode_card(card, format)?;
        self.store_encoded(bytes, format)
    }
}

/// Encode a card raster. JPEG drops the alpha channel.
pub fn encode_card(card: &RasterImage, format: OutputFormat) -> CardResult<Vec<u8>> {
    let straight = card.clone().into_straight().with_alpha()?;
    let (w, h) = (straight.width, straight.height);
    let rgba = image::RgbaImage::from_raw(w, h, straight.data).ok_or_else(|| {
        CardError::invalid_geometry(format!("card buffer does not match {w}x{h}"))
    })?;

    let img = match format {
        OutputFormat::Jpg => image::DynamicImage::ImageRgb8(image::DynamicImage::ImageRgba8(rgba).to_rgb8()),
        OutputFormat::Png | OutputFormat::Webp => image::DynamicImage::ImageRgba8(rgba),
    };

    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format.image_format())
        .with_context(|| format!("encode card as {}", format.extension()))?;
    Ok(buf)
}

/// Writes `card-<uuid>.<ext>` files into a directory.
#[derive(Clone, Debug)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Sink writing into `dir`, created on first store.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CardSink for FileSink {
    fn store_encoded(&mut self, bytes: Vec<u8>, format: OutputFormat) -> CardResult<String> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir {}", self.dir.display()))?;

        let name = format!("card-{}.{}", uuid::Uuid::new_v4(), format.extension());
        let path = self.dir.join(name);
        std::fs::write(&path, &bytes).with_context(|| format!("write {}", path.display()))?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "card stored");
        Ok(path.display().to_string())
    }
}

/// A card kept in memory by [`MemorySink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredCard {
    /// Location string returned from the store call.
    pub key: String,
    /// Encoding of `bytes`.
    pub format: OutputFormat,
    /// Encoded card.
    pub bytes: Vec<u8>,
}

/// Keeps encoded cards in memory; keys look like `memory://card-<n>.<ext>`.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    cards: Vec<StoredCard>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cards stored so far, in order.
    pub fn cards(&self) -> &[StoredCard] {
        &self.cards
    }

    /// Take the stored cards.
    pub fn into_cards(self) -> Vec<StoredCard> {
        self.cards
    }
}

impl CardSink for MemorySink {
    fn store_encoded(&mut self, bytes: Vec<u8>, format: OutputFormat) -> CardResult<String> {
        let key = format!("memory://card-{}.{}", self.cards.len(), format.extension());
        self.cards.push(StoredCard {
            key: key.clone(),
            format,
            bytes,
        });
        Ok(key)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/sink.rs"]
mod tests;
