//! Continuous-loop horizontal carousel.
//!
//! A [`Carousel`] owns the scroll offset and decides, tick by tick, who may
//! write it: the constant-velocity driver, or an in-flight manual step. The
//! render list it exposes through [`Surface`] is the item sequence repeated
//! enough times that wrapping the offset is never visible.

pub mod easing;
pub mod layout;
pub mod stepper;
pub mod surface;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::frame_loop::{FrameHandle, FrameLoop, Tick};

pub use easing::Easing;
pub use layout::{
    Layout, LayoutError, MAX_RENDER_LIST, MAX_REPLICATION, MIN_REPLICATION, wrap,
};
pub use stepper::{Direction, StepTransition};
pub use surface::{CardPlacement, Surface};

/// Which writer currently owns the offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Authority {
    /// Constant-velocity driver; advances only while unpaused.
    Driver,
    /// Eased manual step. `origin` is the rest offset the step was issued
    /// from; superseding requests keep it so rapid presses coalesce.
    Step {
        origin: f64,
        transition: StepTransition,
    },
}

#[derive(Debug, Clone)]
pub struct Carousel<T> {
    items: Vec<T>,
    layout: Layout,
    animated: bool,
    offset: f64,
    paused: bool,
    authority: Authority,
}

impl<T> Carousel<T> {
    /// Build a carousel. An invalid layout yields a static carousel that
    /// renders one copy of the items and ignores ticks and steps.
    pub fn new(items: Vec<T>, layout: Layout) -> Self {
        let animated = match layout.validate(items.len()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "carousel will not animate");
                false
            }
        };
        Self {
            items,
            layout,
            animated,
            offset: 0.0,
            paused: false,
            authority: Authority::Driver,
        }
    }

    pub fn try_new(items: Vec<T>, layout: Layout) -> Result<Self, LayoutError> {
        layout.validate(items.len())?;
        Ok(Self::new(items, layout))
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn is_animated(&self) -> bool {
        self.animated
    }

    pub fn loop_width(&self) -> f64 {
        self.layout.loop_width(self.items.len())
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Offset the carousel will settle on once any in-flight step lands.
    pub fn resting_offset(&self) -> f64 {
        match self.authority {
            Authority::Driver => self.offset,
            Authority::Step { transition, .. } => wrap(transition.target(), self.loop_width()),
        }
    }

    pub fn authority(&self) -> Authority {
        self.authority
    }

    pub fn is_stepping(&self) -> bool {
        matches!(self.authority, Authority::Step { .. })
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Prev/next controls are shown exactly while paused.
    pub fn controls_visible(&self) -> bool {
        self.paused
    }

    pub fn surface(&self) -> Surface<'_, T> {
        let copies = if self.animated {
            self.layout.replication
        } else {
            1
        };
        Surface::new(&self.items, &self.layout, copies)
    }

    /// Grow the replication factor so the render list spans `viewport_width`
    /// plus one loop of travel, up to [`Layout::max_replication`]. Never
    /// shrinks it. Returns true when the factor changed.
    pub fn cover_viewport(&mut self, viewport_width: f64) -> bool {
        if !self.animated {
            return false;
        }
        let n = self.items.len();
        let required = self.layout.required_replication(n, viewport_width);
        let ceiling = Layout::max_replication(n);
        if required > ceiling {
            tracing::warn!(
                required,
                ceiling,
                viewport_width,
                "viewport wider than render list cap"
            );
        }
        let target = required.min(ceiling);
        if target <= self.layout.replication {
            return false;
        }
        tracing::debug!(from = self.layout.replication, to = target, "raising replication");
        self.layout.replication = target;
        true
    }

    /// Advance one tick at logical time `now`.
    pub fn tick(&mut self, now: Duration) {
        if !self.animated {
            return;
        }
        let loop_width = self.loop_width();
        match self.authority {
            Authority::Step { transition, .. } => {
                if transition.is_done(now) {
                    self.offset = wrap(transition.target(), loop_width);
                    self.authority = Authority::Driver;
                    tracing::debug!(offset = self.offset, "step landed");
                } else {
                    self.offset = wrap(transition.sample(now), loop_width);
                }
            }
            Authority::Driver => {
                if !self.paused {
                    self.offset = wrap(self.offset + self.layout.velocity, loop_width);
                }
            }
        }
    }

    pub fn on_enter(&mut self) {
        if !self.paused {
            self.paused = true;
            tracing::trace!(offset = self.offset, "carousel paused");
        }
    }

    pub fn on_leave(&mut self) {
        if self.paused {
            self.paused = false;
            tracing::trace!(offset = self.offset, "carousel resumed");
        }
    }

    /// Level-triggered hover input; only edges change state.
    pub fn set_hovered(&mut self, hovered: bool) {
        if hovered {
            self.on_enter();
        } else {
            self.on_leave();
        }
    }

    /// Move one card in `direction`, easing from the current on-screen
    /// offset. A request made while a step is in flight replaces it and
    /// targets one stride from the original rest offset.
    pub fn step(&mut self, direction: Direction, now: Duration) {
        if !self.animated {
            return;
        }
        let (origin, from, superseded) = match self.authority {
            Authority::Driver => (self.offset, self.offset, false),
            // Finished but not yet committed by a tick: treat as landed
            Authority::Step { transition, .. } if transition.is_done(now) => {
                let landed = wrap(transition.target(), self.loop_width());
                (landed, landed, false)
            }
            Authority::Step { origin, transition } => (origin, transition.sample(now), true),
        };
        let to = origin + direction.sign() * self.layout.stride();
        tracing::debug!(%direction, origin, to, superseded, "step");
        self.authority = Authority::Step {
            origin,
            transition: StepTransition::new(
                from,
                to,
                now,
                self.layout.step_duration,
                self.layout.easing,
            ),
        };
    }

    /// User-facing prev/next control. Returns false when the controls are
    /// hidden, in which case nothing happens.
    pub fn press_control(&mut self, direction: Direction, now: Duration) -> bool {
        if !self.controls_visible() {
            return false;
        }
        self.step(direction, now);
        true
    }

    /// Snap to `offset` (wrapped), dropping any in-flight step.
    pub fn jump_to(&mut self, offset: f64) {
        if !self.animated {
            return;
        }
        self.offset = wrap(offset, self.loop_width());
        self.authority = Authority::Driver;
    }

    fn reset(&mut self) {
        self.offset = 0.0;
        self.paused = false;
        self.authority = Authority::Driver;
    }
}

impl<T: 'static> Carousel<T> {
    /// Attach to `frame_loop`. The returned value owns the per-tick
    /// subscription; dropping it unmounts the carousel.
    pub fn mount(mut self, frame_loop: &FrameLoop) -> MountedCarousel<T> {
        self.reset();
        let items = self.items.len();
        let animated = self.animated;
        let carousel = Rc::new(RefCell::new(self));
        let weak = Rc::downgrade(&carousel);
        let handle = frame_loop.subscribe(move |tick: Tick| {
            let Some(carousel) = weak.upgrade() else {
                return;
            };
            match carousel.try_borrow_mut() {
                Ok(mut carousel) => carousel.tick(tick.at),
                Err(_) => tracing::warn!(tick = tick.index, "carousel borrowed during tick"),
            };
        });
        tracing::debug!(items, animated, "carousel mounted");
        MountedCarousel {
            handle: Some(handle),
            carousel,
        }
    }
}

/// A carousel attached to a frame loop.
#[derive(Debug)]
pub struct MountedCarousel<T> {
    handle: Option<FrameHandle>,
    carousel: Rc<RefCell<Carousel<T>>>,
}

impl<T> MountedCarousel<T> {
    pub fn with<R>(&self, f: impl FnOnce(&Carousel<T>) -> R) -> R {
        f(&self.carousel.borrow())
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Carousel<T>) -> R) -> R {
        f(&mut self.carousel.borrow_mut())
    }

    pub fn is_mounted(&self) -> bool {
        self.handle.as_ref().is_some_and(FrameHandle::is_active)
    }

    pub fn unmount(self) {}
}

impl<T> Drop for MountedCarousel<T> {
    fn drop(&mut self) {
        // Cancels the tick subscription; any in-flight step goes with the carousel
        if let Some(handle) = self.handle.take() {
            handle.cancel();
            tracing::debug!("carousel unmounted");
        }
    }
}
