/// Number of channels in every frame; pixel data is always packed RGB.
pub const RGB_CHANNELS: usize = 3;

/// A decoded image: contiguous RGB bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; estimators and
/// visualizers work on this type.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * RGB_CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// A frame of the given size filled with a single colour.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixels * RGB_CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&rgb);
        }
        Self::new(data, width, height)
    }

    /// A white frame with the same dimensions as `self`.
    pub fn blank_like(&self) -> Self {
        Self::new(vec![255; self.data.len()], self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * RGB_CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

impl From<image::RgbImage> for Frame {
    fn from(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height)
    }
}

impl From<Frame> for image::RgbImage {
    fn from(frame: Frame) -> Self {
        let (width, height) = (frame.width, frame.height);
        image::RgbImage::from_raw(width, height, frame.data)
            .expect("Frame data length must match dimensions")
    }
}
