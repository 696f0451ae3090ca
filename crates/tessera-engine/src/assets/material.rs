use std::path::{Path, PathBuf};

use crate::backend::RenderBackend;
use crate::error::RenderError;

const BYTES_PER_PIXEL: u32 = 4;

/// Decoded RGBA8 pixels, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl TextureImage {
    /// Wraps raw RGBA8 pixels, checking the length against the dimensions.
    pub fn from_rgba8(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::asset(None, format!("image has zero size ({width}x{height})")));
        }
        let expected = width as usize * height as usize * BYTES_PER_PIXEL as usize;
        if rgba.len() != expected {
            return Err(RenderError::asset(
                None,
                format!("expected {expected} bytes for {width}x{height} RGBA8, got {}", rgba.len()),
            ));
        }
        Ok(Self { width, height, rgba })
    }

    /// Two-color checkerboard with `cell`-pixel squares.
    pub fn checkerboard(size: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> Self {
        let size = size.max(1);
        let cell = cell.max(1);
        let mut rgba = Vec::with_capacity((size * size * BYTES_PER_PIXEL) as usize);
        for y in 0..size {
            for x in 0..size {
                let even = ((x / cell) + (y / cell)) % 2 == 0;
                rgba.extend_from_slice(if even { &a } else { &b });
            }
        }
        Self { width: size, height: size, rgba }
    }

    /// Decodes an encoded image (PNG or JPEG).
    pub fn decode(bytes: &[u8]) -> Result<Self, RenderError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| RenderError::asset(None, e.to_string()))?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        Self::from_rgba8(width, height, decoded.into_raw())
    }

    /// Reads and decodes the image at `path`.
    pub fn open(path: &Path) -> Result<Self, RenderError> {
        let with_path = |e: RenderError| match e {
            RenderError::AssetLoad { reason, .. } => RenderError::asset(Some(path.to_path_buf()), reason),
            other => other,
        };
        let bytes =
            std::fs::read(path).map_err(|e| RenderError::asset(Some(path.to_path_buf()), e.to_string()))?;
        Self::decode(&bytes).map_err(with_path)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.rgba
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * BYTES_PER_PIXEL
    }

    /// Rejects images whose width or height exceeds `max` texels.
    pub fn check_dimension_limit(&self, max: u32) -> Result<(), RenderError> {
        if self.width > max || self.height > max {
            return Err(RenderError::asset(
                None,
                format!(
                    "image is {}x{}, device allows at most {max}x{max}",
                    self.width, self.height
                ),
            ));
        }
        Ok(())
    }
}

/// Where the material's texture comes from.
#[derive(Debug, Clone)]
pub enum MaterialSource {
    File(PathBuf),
    Pixels(TextureImage),
}

impl MaterialSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }
}

/// Texture view and sampler bound at slots 1 and 2.
pub struct Material<B: RenderBackend> {
    view: B::TextureView,
    sampler: B::Sampler,
    width: u32,
    height: u32,
}

impl<B: RenderBackend> Material<B> {
    /// Loads the texture from `source` and uploads it with its sampler.
    ///
    /// The file read and decode run synchronously on the polling thread; the
    /// future completes on its first poll. Failures, including images larger
    /// than the device allows, are reported as [`RenderError::AssetLoad`] and
    /// there is no fallback texture.
    pub async fn load(backend: &B, source: &MaterialSource) -> Result<Self, RenderError> {
        match source {
            MaterialSource::File(path) => {
                log::info!("loading texture {}", path.display());
                let image = TextureImage::open(path)?;
                Self::upload(backend, &image).map_err(|e| match e {
                    RenderError::AssetLoad { reason, .. } => {
                        RenderError::asset(Some(path.clone()), reason)
                    }
                    other => other,
                })
            }
            MaterialSource::Pixels(image) => Self::upload(backend, image),
        }
    }

    pub fn upload(backend: &B, image: &TextureImage) -> Result<Self, RenderError> {
        let view = backend.create_texture("material texture", image)?;
        let sampler = backend.create_sampler(&sampler_descriptor());

        log::debug!("material uploaded ({}x{})", image.width(), image.height());

        Ok(Self {
            view,
            sampler,
            width: image.width(),
            height: image.height(),
        })
    }

    pub fn view(&self) -> &B::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &B::Sampler {
        &self.sampler
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Repeat addressing, linear magnification, nearest minification.
pub fn sampler_descriptor() -> wgpu::SamplerDescriptor<'static> {
    wgpu::SamplerDescriptor {
        label: Some("material sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Nearest,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Call, RecordingBackend};

    fn backend() -> RecordingBackend {
        RecordingBackend::new(320, 240, wgpu::TextureFormat::Bgra8UnormSrgb)
    }

    #[test]
    fn rgba_length_is_validated() {
        assert!(TextureImage::from_rgba8(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            TextureImage::from_rgba8(2, 2, vec![0; 15]),
            Err(RenderError::AssetLoad { .. })
        ));
        assert!(TextureImage::from_rgba8(0, 4, vec![]).is_err());
    }

    #[test]
    fn checkerboard_alternates_cells() {
        let white = [255, 255, 255, 255];
        let black = [0, 0, 0, 255];
        let img = TextureImage::checkerboard(4, 2, white, black);
        assert_eq!(img.bytes_per_row(), 16);
        assert_eq!(&img.pixels()[0..4], &white);
        // pixel (2, 0) is in the second cell of the first row
        assert_eq!(&img.pixels()[8..12], &black);
        // pixel (2, 2) is back to the first color
        let idx = (2 * 4 + 2) * 4;
        assert_eq!(&img.pixels()[idx..idx + 4], &white);
    }

    #[test]
    fn missing_file_is_asset_error_with_path() {
        let source = MaterialSource::file("definitely/not/here.png");
        let result = pollster::block_on(Material::load(&backend(), &source));
        match result {
            Err(RenderError::AssetLoad { path: Some(path), .. }) => {
                assert!(path.ends_with("here.png"));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("missing file must not load"),
        }
    }

    #[test]
    fn undecodable_bytes_are_rejected() {
        assert!(matches!(
            TextureImage::decode(b"not an image"),
            Err(RenderError::AssetLoad { path: None, .. })
        ));
    }

    #[test]
    fn png_bytes_decode_to_rgba() {
        let mut img = image::RgbaImage::new(3, 2);
        img.put_pixel(1, 0, image::Rgba([10, 20, 30, 255]));
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("encode png");

        let decoded = TextureImage::decode(&png).expect("decode png");
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
        assert_eq!(&decoded.pixels()[4..8], &[10, 20, 30, 255]);
    }

    #[test]
    fn pixels_source_uploads_texture_then_sampler() {
        let backend = backend();
        let image = TextureImage::checkerboard(8, 4, [255; 4], [0, 0, 0, 255]);
        let material =
            pollster::block_on(Material::load(&backend, &MaterialSource::Pixels(image))).expect("load");

        assert_eq!(material.size(), (8, 8));
        let calls = backend.calls();
        assert!(matches!(
            calls.as_slice(),
            [Call::CreateTexture { width: 8, height: 8, .. }, Call::CreateSampler { .. }]
        ));
    }

    #[test]
    fn sampler_repeats_and_filters() {
        let desc = sampler_descriptor();
        assert_eq!(desc.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(desc.address_mode_v, wgpu::AddressMode::Repeat);
        assert_eq!(desc.mag_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.min_filter, wgpu::FilterMode::Nearest);
        assert_eq!(desc.mipmap_filter, wgpu::MipmapFilterMode::Nearest);
    }

    #[test]
    fn oversized_image_is_rejected_before_upload() {
        let backend = backend().with_max_texture_dimension(2048);
        let wide = TextureImage::from_rgba8(4096, 1, vec![0; 4096 * 4]).expect("pixels");

        let result = pollster::block_on(Material::load(&backend, &MaterialSource::Pixels(wide)));
        match result {
            Err(RenderError::AssetLoad { path: None, reason }) => assert!(reason.contains("4096x1")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("oversized image must not upload"),
        }
        assert!(backend.calls().is_empty());

        let edge = TextureImage::from_rgba8(2048, 1, vec![0; 2048 * 4]).expect("pixels");
        assert!(Material::upload(&backend, &edge).is_ok());
    }
}
