use super::layout::{Layout, wrap};

/// Where one card of the render list lands inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPlacement {
    /// Position in the replicated render list.
    pub slot: usize,
    /// Index into the original item sequence.
    pub item_index: usize,
    /// Left edge relative to the viewport's left edge.
    pub x: f64,
}

/// Read-only view that positions the replicated render list from an offset.
///
/// Holds no state of its own: every output is derived from the offset it is
/// given plus the static layout, so rendering the same offset twice is
/// indistinguishable.
#[derive(Debug, Clone, Copy)]
pub struct Surface<'a, T> {
    items: &'a [T],
    layout: &'a Layout,
    copies: usize,
}

impl<'a, T> Surface<'a, T> {
    pub(crate) fn new(items: &'a [T], layout: &'a Layout, copies: usize) -> Self {
        Self {
            items,
            layout,
            copies,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len().saturating_mul(self.copies)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The replicated sequence as `(slot, item_index, item)`.
    pub fn render_list(&self) -> impl Iterator<Item = (usize, usize, &'a T)> + 'a {
        let items = self.items;
        (0..self.copies)
            .flat_map(move |_| items.iter().enumerate())
            .enumerate()
            .map(|(slot, (item_index, item))| (slot, item_index, item))
    }

    pub fn loop_width(&self) -> f64 {
        self.layout.loop_width(self.items.len())
    }

    /// Horizontal translation applied to the whole strip.
    pub fn translation(&self, offset: f64) -> f64 {
        -wrap(offset, self.loop_width())
    }

    /// Cards that intersect `[0, viewport_width)` at `offset`, left to right.
    pub fn frame(&self, offset: f64, viewport_width: f64) -> Vec<CardPlacement> {
        let stride = self.layout.stride();
        if self.items.is_empty() || !stride.is_finite() || stride <= 0.0 {
            return Vec::new();
        }
        let translation = self.translation(offset);
        let n = self.items.len();

        // Skip the cards already scrolled past the left edge
        let first = ((-translation - self.layout.item_width) / stride)
            .floor()
            .max(0.0) as usize;

        (first..self.len())
            .map(|slot| CardPlacement {
                slot,
                item_index: slot % n,
                x: translation + slot as f64 * stride,
            })
            .skip_while(|card| card.x + self.layout.item_width <= 0.0)
            .take_while(|card| card.x < viewport_width)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ITEMS: [&str; 4] = ["ada", "ben", "cleo", "dev"];

    fn surface(layout: &Layout) -> Surface<'_, &'static str> {
        Surface::new(&ITEMS, layout, layout.replication)
    }

    #[test]
    fn test_render_list_is_replicated() {
        let layout = Layout::default();
        let s = surface(&layout);
        let list: Vec<_> = s.render_list().collect();
        assert_eq!(list.len(), 12);
        assert_eq!(s.len(), 3 * ITEMS.len());
        assert_eq!(list[0], (0, 0, &"ada"));
        assert_eq!(list[4], (4, 0, &"ada"));
        assert_eq!(list[11], (11, 3, &"dev"));
    }

    #[test]
    fn test_first_item_leads_at_zero_offset() {
        let layout = Layout::default();
        let cards = surface(&layout).frame(0.0, 1280.0);
        assert_eq!(cards[0].item_index, 0);
        assert_eq!(cards[0].x, 0.0);
        // 1280px shows cards starting at 0, 344, 688, 1032
        assert_eq!(cards.len(), 4);
    }

    #[test]
    fn test_partially_visible_card_included() {
        let layout = Layout::default();
        let cards = surface(&layout).frame(100.0, 1280.0);
        assert_eq!(cards[0].item_index, 0);
        assert_eq!(cards[0].x, -100.0);
        assert_eq!(cards.last().map(|c| c.item_index), Some(0));
    }

    #[test]
    fn test_gap_only_region_skips_card() {
        let layout = Layout::default();
        // Card 0 spans [-330, -10): fully off-screen
        let cards = surface(&layout).frame(330.0, 1280.0);
        assert_eq!(cards[0].item_index, 1);
        assert_eq!(cards[0].x, 14.0);
    }

    #[test]
    fn test_translation_is_negated_wrapped_offset() {
        let layout = Layout::default();
        let s = surface(&layout);
        assert_eq!(s.translation(0.0), -0.0);
        assert_eq!(s.translation(1376.0 + 10.0), -10.0);
    }

    #[test]
    fn test_render_covers_viewport_near_seam() {
        let layout = Layout::default();
        let cards = surface(&layout).frame(1375.0, 1920.0);
        let last = cards.last().copied().expect("cards visible");
        assert!(last.x + layout.item_width >= 1920.0);
    }

    #[test]
    fn test_empty_items_renders_nothing() {
        let layout = Layout::default();
        let empty: [&str; 0] = [];
        let s = Surface::new(&empty, &layout, 1);
        assert!(s.is_empty());
        assert!(s.frame(0.0, 1280.0).is_empty());
    }

    proptest! {
        #[test]
        fn frame_is_periodic_in_loop_width(offset in 0.0f64..1376.0) {
            let layout = Layout::default();
            let s = surface(&layout);
            let a = s.frame(offset, 1280.0);
            let b = s.frame(offset + s.loop_width(), 1280.0);
            prop_assert_eq!(a.len(), b.len());
            for (ca, cb) in a.iter().zip(&b) {
                prop_assert_eq!(ca.item_index, cb.item_index);
                prop_assert!((ca.x - cb.x).abs() < 1e-6);
            }
        }

        #[test]
        fn frame_is_idempotent(offset in -5000.0f64..5000.0) {
            let layout = Layout::default();
            let s = surface(&layout);
            prop_assert_eq!(s.frame(offset, 1280.0), s.frame(offset, 1280.0));
        }
    }
}
