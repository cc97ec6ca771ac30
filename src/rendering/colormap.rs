//! Palettes, prana color schemes and continuous colormaps.
//!
//! Every gradient is a fixed ordered list of hex colors. Selection is a
//! table lookup: a palette by frame index, a scheme by prana band.

use glam::Vec3;

/// Cycled frame palettes (matplotlib-style)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Palette {
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Twilight,
    Cividis,
}

/// Palette cycle order
pub const PALETTES: [Palette; 6] = [
    Palette::Viridis,
    Palette::Plasma,
    Palette::Inferno,
    Palette::Magma,
    Palette::Twilight,
    Palette::Cividis,
];

impl Palette {
    /// Palette for a frame: cycles one step per rendered frame
    pub fn for_frame(frame_index: usize) -> Self {
        PALETTES[frame_index % PALETTES.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Palette::Viridis => "viridis",
            Palette::Plasma => "plasma",
            Palette::Inferno => "inferno",
            Palette::Magma => "magma",
            Palette::Twilight => "twilight",
            Palette::Cividis => "cividis",
        }
    }

    pub fn stops(self) -> &'static [u32] {
        match self {
            Palette::Viridis => &[0x440154, 0x3b528b, 0x21918c, 0x5ec962, 0xfde725],
            Palette::Plasma => &[0x0d0887, 0x7e03a8, 0xcc4778, 0xf89540, 0xf0f921],
            Palette::Inferno => &[0x000004, 0x420a68, 0x932667, 0xdd513a, 0xfca50a, 0xfcffa4],
            Palette::Magma => &[0x000004, 0x3b0f70, 0x8c2981, 0xde4968, 0xfe9f6d, 0xfcfdbf],
            Palette::Twilight => &[0xe2d9e2, 0x6b8bc4, 0x3b2c6e, 0x7c2d4f, 0xd5a99b, 0xe2d9e2],
            Palette::Cividis => &[0x00224e, 0x3d4e6c, 0x7c7b78, 0xbcaf6f, 0xfee838],
        }
    }
}

/// Qualitative gradients picked by prana band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    /// prana < 0.3
    Ember,
    /// 0.3 <= prana < 0.6
    Lotus,
    /// prana >= 0.6 (and NaN)
    Aurora,
}

/// Exclusive upper bound of each prana band, in order
const SCHEME_BANDS: [(f64, ColorScheme); 2] =
    [(0.3, ColorScheme::Ember), (0.6, ColorScheme::Lotus)];

impl ColorScheme {
    pub fn for_prana(prana: f64) -> Self {
        SCHEME_BANDS
            .iter()
            .find(|(upper, _)| prana < *upper)
            .map(|&(_, scheme)| scheme)
            .unwrap_or(ColorScheme::Aurora)
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorScheme::Ember => "ember",
            ColorScheme::Lotus => "lotus",
            ColorScheme::Aurora => "aurora",
        }
    }

    pub fn stops(self) -> &'static [u32] {
        match self {
            ColorScheme::Ember => &[0x1a0000, 0x5c0a0a, 0xb3261e, 0xf27d0c, 0xffd35c],
            ColorScheme::Lotus => &[0x120d31, 0x4b2a7b, 0xa23e8c, 0xe98bb6, 0xfbe3ef],
            ColorScheme::Aurora => &[0x03111f, 0x0b4f6c, 0x01baef, 0x20bf55, 0xf5f7dc],
        }
    }
}

/// Identifier of the colormap a display should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColormapId {
    Palette(Palette),
    Scheme(ColorScheme),
}

impl ColormapId {
    pub fn name(self) -> &'static str {
        match self {
            ColormapId::Palette(p) => p.name(),
            ColormapId::Scheme(s) => s.name(),
        }
    }

    pub fn stops(self) -> &'static [u32] {
        match self {
            ColormapId::Palette(p) => p.stops(),
            ColormapId::Scheme(s) => s.stops(),
        }
    }

    pub fn colormap(self) -> Colormap {
        Colormap::from_hex(self.stops())
    }
}

/// Continuous colormap: linear interpolation between evenly spaced stops
#[derive(Debug, Clone)]
pub struct Colormap {
    stops: Vec<Vec3>,
}

impl Colormap {
    /// Build from 0xRRGGBB stops (an empty list maps everything to black)
    pub fn from_hex(stops: &[u32]) -> Self {
        let mut stops: Vec<Vec3> = stops.iter().map(|&hex| hex_to_rgb(hex)).collect();
        if stops.is_empty() {
            stops.push(Vec3::ZERO);
        }
        Self { stops }
    }

    /// Color at `t` in [0, 1] (clamped; NaN maps to the first stop)
    pub fn sample(&self, t: f64) -> [u8; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let t = t as f32;
        let last = self.stops.len() - 1;
        if last == 0 {
            return to_bytes(self.stops[0]);
        }

        let position = t * last as f32;
        let index = (position.floor() as usize).min(last - 1);
        let frac = position - index as f32;
        to_bytes(self.stops[index].lerp(self.stops[index + 1], frac))
    }
}

fn hex_to_rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32,
        ((hex >> 8) & 0xff) as f32,
        (hex & 0xff) as f32,
    ) / 255.0
}

fn to_bytes(color: Vec3) -> [u8; 3] {
    let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8]
}
