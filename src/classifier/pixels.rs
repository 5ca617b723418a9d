use image::{DynamicImage, RgbImage, imageops::FilterType};

/// Side length of the square frame every classifier path works on.
pub const FRAME_SIZE: u32 = 128;

/// Width over height of the region cropped from the input before resizing.
const FRAME_ASPECT: f64 = 9.0 / 14.0;

const SAMPLE_STEP: usize = 5;

/// Fraction of the frame trimmed from each edge before sampling.
const BORDER: f64 = 0.2;

/// Center-crop to a 9:14 portrait and resize to [`FRAME_SIZE`] squared.
pub fn prepare_frame(image: &DynamicImage) -> RgbImage {
    let (width, height) = (image.width().max(1), image.height().max(1));
    let aspect = width as f64 / height as f64;

    let (crop_w, crop_h) = if aspect > FRAME_ASPECT {
        ((height as f64 * FRAME_ASPECT).round() as u32, height)
    } else {
        (width, (width as f64 / FRAME_ASPECT).round() as u32)
    };
    let crop_w = crop_w.clamp(1, width);
    let crop_h = crop_h.clamp(1, height);
    let x = (width - crop_w) / 2;
    let y = (height - crop_h) / 2;

    image
        .crop_imm(x, y, crop_w, crop_h)
        .resize_exact(FRAME_SIZE, FRAME_SIZE, FilterType::Triangle)
        .to_rgb8()
}

/// Mean color statistics over the sampled pixels, each in `[0, 1]` except
/// `redness`, which is a ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PixelStats {
    pub brightness: f64,
    pub saturation: f64,
    pub redness: f64,
    /// Standard deviation of brightness.
    pub texture: f64,
    /// Share of samples that look like skin.
    pub skin_coverage: f64,
    pub samples: usize,
}

impl PixelStats {
    /// Sample every fifth pixel of the central 60% of `frame`.
    pub fn from_frame(frame: &RgbImage) -> Self {
        let (w, h) = (frame.width() as usize, frame.height() as usize);
        let (x0, x1) = central_span(w);
        let (y0, y1) = central_span(h);

        let samples = (y0..y1).step_by(SAMPLE_STEP).flat_map(|y| {
            (x0..x1)
                .step_by(SAMPLE_STEP)
                .map(move |x| frame.get_pixel(x as u32, y as u32).0)
        });
        Self::from_pixels(samples)
    }

    pub fn from_pixels<I>(pixels: I) -> Self
    where
        I: IntoIterator<Item = [u8; 3]>,
    {
        let mut count = 0usize;
        let mut brightness_sum = 0.0;
        let mut brightness_sq = 0.0;
        let mut saturation_sum = 0.0;
        let mut redness_sum = 0.0;
        let mut skin = 0usize;

        for [r, g, b] in pixels {
            let max = r.max(g).max(b) as f64;
            let min = r.min(g).min(b) as f64;
            let value = max / 255.0;
            let saturation = if max == 0.0 { 0.0 } else { (max - min) / max };

            brightness_sum += value;
            brightness_sq += value * value;
            saturation_sum += saturation;
            redness_sum += r as f64 / (g as f64 + b as f64 + 1.0);
            if is_skin_tone(r, g, b) {
                skin += 1;
            }
            count += 1;
        }

        if count == 0 {
            return Self::default();
        }

        let n = count as f64;
        let brightness = brightness_sum / n;
        let variance = (brightness_sq / n - brightness * brightness).max(0.0);
        Self {
            brightness,
            saturation: saturation_sum / n,
            redness: redness_sum / n,
            texture: variance.sqrt(),
            skin_coverage: skin as f64 / n,
            samples: count,
        }
    }
}

fn central_span(len: usize) -> (usize, usize) {
    let start = (len as f64 * BORDER).floor() as usize;
    let end = (len as f64 * (1.0 - BORDER)).ceil() as usize;
    (start.min(len), end.min(len))
}

/// RGB skin rule for daylight illumination (Peer et al.).
pub fn is_skin_tone(r: u8, g: u8, b: u8) -> bool {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    r > 95 && g > 40 && b > 20 && max - min > 15 && r.abs_diff(g) > 15 && r > g && r > b
}
