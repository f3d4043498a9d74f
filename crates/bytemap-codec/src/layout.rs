use std::num::NonZeroU32;

use crate::error::{CodecError, Result};

/// Default width ceiling for [`LayoutPolicy::Bounded`].
pub const DEFAULT_MAX_WIDTH: NonZeroU32 = match NonZeroU32::new(4096) {
    Some(width) => width,
    None => unreachable!(),
};

/// How a pixel count is arranged into a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutPolicy {
    /// Smallest square that holds every pixel.
    Square,
    /// Rows of at most `max_width` pixels, as many rows as needed.
    Bounded { max_width: NonZeroU32 },
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        LayoutPolicy::Bounded {
            max_width: DEFAULT_MAX_WIDTH,
        }
    }
}

/// Raster dimensions chosen for a pixel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    /// Zero-valued pixels appended after the real data.
    pub pad_pixels: u64,
}

impl Layout {
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl LayoutPolicy {
    /// Choose dimensions for `total_pixels`. Always at least 1x1.
    pub fn layout(self, total_pixels: u64) -> Result<Layout> {
        let too_large = || CodecError::RasterTooLarge {
            pixels: total_pixels,
        };

        let (width, height) = match self {
            LayoutPolicy::Square => {
                let side = ceil_sqrt(total_pixels).max(1);
                (side, side)
            }
            LayoutPolicy::Bounded { max_width } => {
                let width = u64::from(max_width.get()).min(total_pixels.max(1));
                (width, total_pixels.div_ceil(width).max(1))
            }
        };

        let width = u32::try_from(width).map_err(|_| too_large())?;
        let height = u32::try_from(height).map_err(|_| too_large())?;
        let layout = Layout {
            width,
            height,
            pad_pixels: u64::from(width) * u64::from(height) - total_pixels,
        };

        // Samples must be addressable in memory on this platform.
        usize::try_from(layout.pixel_count())
            .ok()
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(too_large)?;

        tracing::debug!(
            policy = ?self,
            total_pixels,
            width,
            height,
            pad_pixels = layout.pad_pixels,
            "chose raster layout"
        );
        Ok(layout)
    }
}

fn ceil_sqrt(n: u64) -> u64 {
    let root = n.isqrt();
    if root * root < n {
        root + 1
    } else {
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded(max_width: u32) -> LayoutPolicy {
        LayoutPolicy::Bounded {
            max_width: NonZeroU32::new(max_width).unwrap(),
        }
    }

    #[test]
    fn square_single_pixel() {
        let layout = LayoutPolicy::Square.layout(1).unwrap();
        assert_eq!(
            layout,
            Layout {
                width: 1,
                height: 1,
                pad_pixels: 0
            }
        );
    }

    #[test]
    fn square_rounds_up() {
        let layout = LayoutPolicy::Square.layout(10).unwrap();
        assert_eq!((layout.width, layout.height, layout.pad_pixels), (4, 4, 6));

        let layout = LayoutPolicy::Square.layout(16).unwrap();
        assert_eq!((layout.width, layout.height, layout.pad_pixels), (4, 4, 0));
    }

    #[test]
    fn square_zero_is_one_pixel() {
        let layout = LayoutPolicy::Square.layout(0).unwrap();
        assert_eq!((layout.width, layout.height, layout.pad_pixels), (1, 1, 1));
    }

    #[test]
    fn bounded_narrow_payload_is_one_row() {
        let layout = bounded(4096).layout(100).unwrap();
        assert_eq!((layout.width, layout.height, layout.pad_pixels), (100, 1, 0));
    }

    #[test]
    fn bounded_wraps_at_max_width() {
        let layout = bounded(4096).layout(10_000).unwrap();
        assert_eq!((layout.width, layout.height), (4096, 3));
        assert_eq!(layout.pad_pixels, 4096 * 3 - 10_000);
    }

    #[test]
    fn bounded_zero_is_one_pixel() {
        let layout = bounded(8).layout(0).unwrap();
        assert_eq!((layout.width, layout.height, layout.pad_pixels), (1, 1, 1));
    }

    #[test]
    fn square_rejects_oversized() {
        let err = LayoutPolicy::Square.layout(u64::MAX).unwrap_err();
        assert!(matches!(err, CodecError::RasterTooLarge { .. }));
    }

    #[test]
    fn ceil_sqrt_edges() {
        assert_eq!(ceil_sqrt(0), 0);
        assert_eq!(ceil_sqrt(1), 1);
        assert_eq!(ceil_sqrt(2), 2);
        assert_eq!(ceil_sqrt(9), 3);
        assert_eq!(ceil_sqrt(10), 4);
    }

    #[test]
    fn default_is_bounded_4096() {
        assert_eq!(LayoutPolicy::default(), bounded(4096));
    }

    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn layout_covers_and_is_deterministic(
                pixels in 0u64..5_000_000,
                max_width in 1u32..10_000,
                square in any::<bool>(),
            ) {
                let policy = if square { LayoutPolicy::Square } else { bounded(max_width) };
                let first = policy.layout(pixels).unwrap();
                let second = policy.layout(pixels).unwrap();

                prop_assert_eq!(first, second);
                prop_assert!(first.pixel_count() >= pixels);
                prop_assert_eq!(first.pad_pixels, first.pixel_count() - pixels);
                if let LayoutPolicy::Bounded { max_width } = policy {
                    prop_assert!(first.width <= max_width.get());
                } else {
                    prop_assert_eq!(first.width, first.height);
                }
            }
        }
    }
}
