pub type Channel = u8;

/// A single RGB pixel. The layout matches the `image::Rgb` pixels the codec
/// hands us, so conversions in either direction are free of surprises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pixel {
    pub red: Channel,
    pub green: Channel,
    pub blue: Channel,
}

impl Pixel {
    pub fn new(red: Channel, green: Channel, blue: Channel) -> Self {
        Pixel { red, green, blue }
    }
}

impl From<image::Rgb<u8>> for Pixel {
    fn from(rgb: image::Rgb<u8>) -> Self {
        Pixel::new(rgb.0[0], rgb.0[1], rgb.0[2])
    }
}

impl From<Pixel> for image::Rgb<u8> {
    fn from(pixel: Pixel) -> Self {
        image::Rgb([pixel.red, pixel.green, pixel.blue])
    }
}
