//! CPU framebuffer and 2D raster primitives

use glam::Vec2;

use crate::color::Rgb;

/// Packed 0x00RRGGBB pixel buffer
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Raw pixel bytes for handing to a presentation surface
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color.to_u32());
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(Rgb::from_u32(self.pixels[y * self.width + x]))
        } else {
            None
        }
    }

    #[inline]
    fn put(&mut self, x: i32, y: i32, packed: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = packed;
        }
    }

    /// Vertical sky gradient, darkening and cooling toward the bottom
    pub fn sky_gradient(&mut self, sky: Rgb) {
        let h = self.height.max(1) as f32;
        for y in 0..self.height {
            let t = y as f32 / h;
            let row = Rgb::new(
                (sky.r as f32 * (1.0 - t * 0.4) + 10.0 * t).clamp(0.0, 255.0) as u8,
                (sky.g as f32 * (1.0 - t * 0.4) + 10.0 * t).clamp(0.0, 255.0) as u8,
                (sky.b as f32 * (1.0 - t * 0.3) + 20.0 * t).clamp(0.0, 255.0) as u8,
            )
            .to_u32();
            let start = y * self.width;
            self.pixels[start..start + self.width].fill(row);
        }
    }

    /// Scanline fill of a simple polygon (even-odd rule, pixel centers)
    pub fn fill_polygon(&mut self, points: &[Vec2], color: Rgb) {
        if points.len() < 3 || self.width == 0 || self.height == 0 {
            return;
        }
        let packed = color.to_u32();
        let (min_y, max_y) = points
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        let y0 = (min_y.floor() as i32).max(0);
        let y1 = (max_y.ceil() as i32).min(self.height as i32 - 1);

        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for y in y0..=y1 {
            let sample = y as f32 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                // Half-open so shared vertices count once
                if (a.y <= sample && b.y > sample) || (b.y <= sample && a.y > sample) {
                    let t = (sample - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
            crossings.sort_by(f32::total_cmp);

            for span in crossings.chunks_exact(2) {
                let xa = ((span[0] - 0.5).ceil() as i32).max(0);
                let xb = ((span[1] - 0.5).ceil() as i32).min(self.width as i32);
                if xa >= xb {
                    continue;
                }
                let row = y as usize * self.width;
                self.pixels[row + xa as usize..row + xb as usize].fill(packed);
            }
        }
    }

    /// Bresenham line, clipped per pixel
    pub fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgb) {
        let packed = color.to_u32();
        let (mut x0, mut y0) = (from.x.round() as i32, from.y.round() as i32);
        let (x1, y1) = (to.x.round() as i32, to.y.round() as i32);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x0, y0, packed);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    pub fn stroke_polygon(&mut self, points: &[Vec2], color: Rgb) {
        for (i, a) in points.iter().enumerate() {
            self.draw_line(*a, points[(i + 1) % points.len()], color);
        }
    }

    /// Binary PPM (P6) encoding
    pub fn to_ppm(&self) -> Vec<u8> {
        let header = format!("P6\n{} {}\n255\n", self.width, self.height);
        let mut out = Vec::with_capacity(header.len() + self.pixels.len() * 3);
        out.extend_from_slice(header.as_bytes());
        for &px in &self.pixels {
            let c = Rgb::from_u32(px);
            out.extend_from_slice(&[c.r, c.g, c.b]);
        }
        out
    }
}
