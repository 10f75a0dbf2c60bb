use std::time::Duration;

use thiserror::Error;

use super::easing::Easing;

/// Smallest replication factor that still hides the loop seam.
pub const MIN_REPLICATION: usize = 3;

/// Largest replication factor accepted from callers or config.
pub const MAX_REPLICATION: usize = 64;

/// Upper bound on cards in the replicated render list.
pub const MAX_RENDER_LIST: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("carousel has no items")]
    NoItems,
    #[error("item width must be a positive, finite number")]
    InvalidItemWidth,
    #[error("gap must be a non-negative, finite number")]
    InvalidGap,
    #[error("velocity must be a positive, finite number")]
    InvalidVelocity,
    #[error("replication factor must be at least 3")]
    ReplicationTooLow,
    #[error("replication factor must be at most 64")]
    ReplicationTooHigh,
    #[error("render list would exceed 4096 cards")]
    RenderListTooLong,
    #[error("step duration must be non-zero")]
    ZeroStepDuration,
}

/// Static layout constants for a carousel instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub item_width: f64,
    pub gap: f64,
    /// Pixels advanced per tick by the continuous driver.
    pub velocity: f64,
    /// How many times the item sequence is repeated in the render list.
    pub replication: usize,
    pub step_duration: Duration,
    pub easing: Easing,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            item_width: 320.0,
            gap: 24.0,
            velocity: 0.5,
            replication: MIN_REPLICATION,
            step_duration: Duration::from_millis(400),
            easing: Easing::EaseOut,
        }
    }
}

impl Layout {
    /// Distance between the left edges of two adjacent cards.
    pub fn stride(&self) -> f64 {
        self.item_width + self.gap
    }

    /// Width of one full, non-repeated pass through `item_count` items.
    pub fn loop_width(&self, item_count: usize) -> f64 {
        item_count as f64 * self.stride()
    }

    pub fn validate(&self, item_count: usize) -> Result<(), LayoutError> {
        if item_count == 0 {
            return Err(LayoutError::NoItems);
        }
        if !self.item_width.is_finite() || self.item_width <= 0.0 {
            return Err(LayoutError::InvalidItemWidth);
        }
        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(LayoutError::InvalidGap);
        }
        if !self.velocity.is_finite() || self.velocity <= 0.0 {
            return Err(LayoutError::InvalidVelocity);
        }
        if self.replication < MIN_REPLICATION {
            return Err(LayoutError::ReplicationTooLow);
        }
        if self.replication > MAX_REPLICATION {
            return Err(LayoutError::ReplicationTooHigh);
        }
        if item_count
            .checked_mul(self.replication)
            .is_none_or(|len| len > MAX_RENDER_LIST)
        {
            return Err(LayoutError::RenderListTooLong);
        }
        if self.step_duration.is_zero() {
            return Err(LayoutError::ZeroStepDuration);
        }
        Ok(())
    }

    /// Largest replication factor `validate` accepts for `item_count` items.
    pub fn max_replication(item_count: usize) -> usize {
        match MAX_RENDER_LIST.checked_div(item_count) {
            Some(per_item) => per_item.min(MAX_REPLICATION),
            None => MAX_REPLICATION,
        }
    }

    /// Smallest replication factor (never below [`MIN_REPLICATION`]) whose
    /// render list covers `viewport_width` plus one full loop of travel.
    pub fn required_replication(&self, item_count: usize, viewport_width: f64) -> usize {
        let loop_width = self.loop_width(item_count);
        if loop_width <= 0.0 || !viewport_width.is_finite() {
            return MIN_REPLICATION;
        }
        let needed = ((viewport_width.max(0.0) + loop_width) / loop_width).ceil() as usize;
        needed.max(MIN_REPLICATION)
    }
}

/// Map any finite offset into `[0, loop_width)`.
pub fn wrap(offset: f64, loop_width: f64) -> f64 {
    if loop_width <= 0.0 || !offset.is_finite() {
        return 0.0;
    }
    let wrapped = offset.rem_euclid(loop_width);
    // rem_euclid rounds tiny negative inputs up to exactly loop_width
    if wrapped >= loop_width { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_layout_is_valid() {
        assert_eq!(Layout::default().validate(4), Ok(()));
    }

    #[test]
    fn test_loop_width() {
        let layout = Layout::default();
        assert_eq!(layout.stride(), 344.0);
        assert_eq!(layout.loop_width(4), 1376.0);
    }

    #[test]
    fn test_validate_rejects_bad_inputs() {
        let layout = Layout::default();
        assert_eq!(layout.validate(0), Err(LayoutError::NoItems));

        let bad_width = Layout {
            item_width: 0.0,
            ..layout
        };
        assert_eq!(bad_width.validate(4), Err(LayoutError::InvalidItemWidth));

        let nan_width = Layout {
            item_width: f64::NAN,
            ..layout
        };
        assert_eq!(nan_width.validate(4), Err(LayoutError::InvalidItemWidth));

        let bad_gap = Layout { gap: -1.0, ..layout };
        assert_eq!(bad_gap.validate(4), Err(LayoutError::InvalidGap));

        let bad_velocity = Layout {
            velocity: -0.5,
            ..layout
        };
        assert_eq!(bad_velocity.validate(4), Err(LayoutError::InvalidVelocity));

        let low_replication = Layout {
            replication: 2,
            ..layout
        };
        assert_eq!(
            low_replication.validate(4),
            Err(LayoutError::ReplicationTooLow)
        );

        let instant_step = Layout {
            step_duration: Duration::ZERO,
            ..layout
        };
        assert_eq!(instant_step.validate(4), Err(LayoutError::ZeroStepDuration));
    }

    #[test]
    fn test_validate_caps_replication() {
        let layout = Layout::default();
        let huge = Layout {
            replication: usize::MAX,
            ..layout
        };
        assert_eq!(huge.validate(4), Err(LayoutError::ReplicationTooHigh));

        let at_cap = Layout {
            replication: MAX_REPLICATION,
            ..layout
        };
        assert_eq!(at_cap.validate(4), Ok(()));
        assert_eq!(at_cap.validate(65), Err(LayoutError::RenderListTooLong));
        assert_eq!(at_cap.validate(usize::MAX), Err(LayoutError::RenderListTooLong));
    }

    #[test]
    fn test_max_replication() {
        assert_eq!(Layout::max_replication(4), MAX_REPLICATION);
        assert_eq!(Layout::max_replication(1000), 4);
        assert_eq!(Layout::max_replication(0), MAX_REPLICATION);
    }

    #[test]
    fn test_zero_gap_is_allowed() {
        let layout = Layout {
            gap: 0.0,
            ..Layout::default()
        };
        assert_eq!(layout.validate(1), Ok(()));
    }

    #[test]
    fn test_required_replication() {
        let layout = Layout::default();
        // 1376px loop easily covers a 1280px window with three copies
        assert_eq!(layout.required_replication(4, 1280.0), 3);
        // A single card needs more copies to span a wide viewport
        assert_eq!(layout.required_replication(1, 1920.0), 7);
    }

    #[test]
    fn test_wrap_negative_and_boundary() {
        assert_eq!(wrap(-344.0, 1376.0), 1032.0);
        assert_eq!(wrap(1376.0, 1376.0), 0.0);
        assert_eq!(wrap(0.0, 1376.0), 0.0);
        assert_eq!(wrap(-1e-18, 1376.0), 0.0);
        assert_eq!(wrap(10.0, 0.0), 0.0);
        assert_eq!(wrap(f64::INFINITY, 1376.0), 0.0);
    }

    proptest! {
        #[test]
        fn wrap_stays_in_range(offset in -1.0e7f64..1.0e7, loop_width in 1.0f64..1.0e5) {
            let wrapped = wrap(offset, loop_width);
            prop_assert!(wrapped >= 0.0);
            prop_assert!(wrapped < loop_width);
        }
    }
}
