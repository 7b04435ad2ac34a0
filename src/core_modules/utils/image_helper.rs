use crate::core_modules::pixel_buffer::PixelBuffer;
use anyhow::{Context, Result, bail};
use image::ImageFormat;
use log::warn;
use std::path::{Path, PathBuf};

/// Formats tried by `save_preferred`, in order of preference.
const PREFERRED_FORMATS: [(&str, ImageFormat); 2] =
    [("png", ImageFormat::Png), ("jpg", ImageFormat::Jpeg)];

/// Decodes an image file into a `PixelBuffer`, converting to RGB.
pub fn load(path: impl AsRef<Path>) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let image = image::open(path)
        .with_context(|| format!("Couldn't open image: {}", path.display()))?;

    Ok(PixelBuffer::from_rgb_image(&image.to_rgb8()))
}

/// Encodes a `PixelBuffer` to the given path. The codec picks the format
/// from the file extension.
pub fn save(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    buffer
        .to_rgb_image()
        .save(path)
        .with_context(|| format!("Couldn't save image: {}", path.display()))
}

/// Saves the buffer under `stem`, trying each preferred format in turn and
/// returning the path of the first one that encodes successfully.
pub fn save_preferred(buffer: &PixelBuffer, stem: impl AsRef<Path>) -> Result<PathBuf> {
    let image = buffer.to_rgb_image();

    for (extension, format) in PREFERRED_FORMATS {
        let path = stem.as_ref().with_extension(extension);
        match image.save_with_format(&path, format) {
            Ok(()) => return Ok(path),
            Err(error) => warn!("Couldn't save {}: {error}", path.display()),
        }
    }

    bail!("No suitable format found to save the result image");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel::Pixel;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                buffer.set(x, y, Pixel::new((x * 30) as u8, (y * 50) as u8, 120));
            }
        }
        buffer
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("Couldn't create temp dir");
        let path = dir.path().join("roundtrip.png");
        let buffer = gradient(6, 4);

        save(&buffer, &path).expect("Couldn't save image");
        let loaded = load(&path).expect("Couldn't load image");

        assert_eq!(loaded, buffer);
    }

    #[test]
    fn save_preferred_picks_png_first() {
        let dir = tempfile::tempdir().expect("Couldn't create temp dir");

        let written = save_preferred(&gradient(3, 3), dir.path().join("result"))
            .expect("Couldn't save image");

        assert_eq!(
            written.extension().and_then(|ext| ext.to_str()),
            Some("png")
        );
        assert!(written.exists());
    }

    #[test]
    fn load_reports_missing_files() {
        let dir = tempfile::tempdir().expect("Couldn't create temp dir");

        assert!(load(dir.path().join("missing.png")).is_err());
    }
}
