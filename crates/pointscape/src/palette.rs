//! Height-banded color palette for sampled points.
//!
//! The numbers are visual tuning, not derived quantities. Each band covers
//! normalized heights below `below`; within a band a uniform draw picks the
//! first choice whose cumulative `below` exceeds it.

use rand::Rng;

/// How a palette choice turns random draws into a color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tint {
    /// Each channel independently: `base[c] + U·spread[c]`.
    Ranged { base: [f32; 3], spread: [f32; 3] },
    /// One luminance `l = base + U·spread` shared by all channels, plus a
    /// fixed per-channel offset and an extra random blue lift.
    Luma {
        base: f32,
        spread: f32,
        offset: [f32; 3],
        blue_lift: f32,
    },
}

impl Tint {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> [f32; 3] {
        match *self {
            Tint::Ranged { base, spread } => [
                base[0] + rng.gen::<f32>() * spread[0],
                base[1] + rng.gen::<f32>() * spread[1],
                base[2] + rng.gen::<f32>() * spread[2],
            ],
            Tint::Luma {
                base,
                spread,
                offset,
                blue_lift,
            } => {
                let l = base + rng.gen::<f32>() * spread;
                let lift = if blue_lift > 0.0 {
                    rng.gen::<f32>() * blue_lift
                } else {
                    0.0
                };
                [l + offset[0], l + offset[1], l + offset[2] + lift]
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteChoice {
    /// Cumulative upper threshold for the in-band draw.
    pub below: f32,
    pub tint: Tint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBand {
    /// Upper bound (exclusive) of normalized height.
    pub below: f32,
    pub choices: &'static [PaletteChoice],
}

/// Ordered bands; the last one must have `below > 1.0` to catch the top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub bands: &'static [ColorBand],
}

const fn ranged(below: f32, base: [f32; 3], spread: [f32; 3]) -> PaletteChoice {
    PaletteChoice {
        below,
        tint: Tint::Ranged { base, spread },
    }
}

const fn luma(below: f32, base: f32, spread: f32, offset: [f32; 3], blue_lift: f32) -> PaletteChoice {
    PaletteChoice {
        below,
        tint: Tint::Luma {
            base,
            spread,
            offset,
            blue_lift,
        },
    }
}

// Ground: mostly dark moss, some brown soil.
const GROUND: &[PaletteChoice] = &[
    ranged(0.6, [0.02, 0.12, 0.10], [0.06, 0.15, 0.12]),
    ranged(f32::INFINITY, [0.15, 0.08, 0.02], [0.12, 0.06, 0.03]),
];

// Middle: cyan, gold, pale silver.
const MIDDLE: &[PaletteChoice] = &[
    ranged(0.45, [0.0, 0.5, 0.6], [0.1, 0.4, 0.35]),
    ranged(0.75, [0.7, 0.5, 0.05], [0.25, 0.25, 0.1]),
    luma(f32::INFINITY, 0.5, 0.35, [0.0, 0.0, 0.0], 0.1),
];

// Top: graphite, cyan, orange, amber, white.
const TOP: &[PaletteChoice] = &[
    luma(0.35, 0.08, 0.12, [0.02, 0.0, 0.04], 0.0),
    ranged(0.55, [0.0, 0.6, 0.7], [0.0, 0.35, 0.3]),
    ranged(0.72, [0.8, 0.3, 0.02], [0.2, 0.25, 0.05]),
    ranged(0.85, [0.75, 0.6, 0.1], [0.2, 0.2, 0.1]),
    luma(f32::INFINITY, 0.75, 0.25, [0.0, 0.0, 0.0], 0.0),
];

pub const DEFAULT_PALETTE: Palette = Palette {
    bands: &[
        ColorBand {
            below: 0.15,
            choices: GROUND,
        },
        ColorBand {
            below: 0.35,
            choices: MIDDLE,
        },
        ColorBand {
            below: f32::INFINITY,
            choices: TOP,
        },
    ],
};

impl Palette {
    /// Index of the band containing `height` (normalized to [0, 1]).
    pub fn band_index(&self, height: f32) -> usize {
        self.bands
            .iter()
            .position(|b| height < b.below)
            .unwrap_or(self.bands.len().saturating_sub(1))
    }

    /// Picks a color for a point at the given normalized height.
    pub fn color_at<R: Rng + ?Sized>(&self, height: f32, rng: &mut R) -> [f32; 3] {
        let Some(band) = self.bands.get(self.band_index(height)) else {
            return [1.0; 3];
        };

        let pick: f32 = rng.gen();
        let choice = band
            .choices
            .iter()
            .find(|c| pick < c.below)
            .or_else(|| band.choices.last());

        match choice {
            Some(c) => c.tint.sample(rng),
            None => [1.0; 3],
        }
    }
}
