use std::time::Instant;

/// One displayed expression result. `anchor` is fixed at creation from the
/// region-of-interest center; `position` follows user drags.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub id: u64,
    pub text: String,
    pub anchor: (f32, f32),
    pub position: (f32, f32),
}

#[derive(Debug, Clone, PartialEq)]
struct PendingOverlay {
    id: u64,
    text: String,
    anchor: (f32, f32),
    due: Instant,
}

/// Overlay lifecycle: scheduled appearances are cancellable entries promoted
/// by `tick`; live overlays keep creation order as display order and are
/// destroyed only by `clear`.
#[derive(Debug, Default)]
pub struct OverlayManager {
    next_id: u64,
    pending: Vec<PendingOverlay>,
    live: Vec<Overlay>,
}

impl OverlayManager {
    pub fn schedule(&mut self, text: String, anchor: (f32, f32), due: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(PendingOverlay {
            id,
            text,
            anchor,
            due,
        });
        id
    }

    /// Promote every pending overlay whose deadline has passed, preserving
    /// scheduling order. Returns the number promoted.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut promoted = 0;
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].due <= now {
                let pending = self.pending.remove(index);
                self.live.push(Overlay {
                    id: pending.id,
                    text: pending.text,
                    anchor: pending.anchor,
                    position: pending.anchor,
                });
                promoted += 1;
            } else {
                index += 1;
            }
        }
        promoted
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.live
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty() && self.pending.is_empty()
    }

    /// Move one overlay by a drag delta. Only that overlay's `position`
    /// changes; its anchor and every other overlay are untouched.
    pub fn drag_by(&mut self, id: u64, delta: (f32, f32)) -> bool {
        if let Some(overlay) = self.live.iter_mut().find(|o| o.id == id) {
            overlay.position.0 += delta.0;
            overlay.position.1 += delta.1;
            true
        } else {
            false
        }
    }

    /// Drop live overlays and cancel every pending appearance, returning to
    /// the post-mount state.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.live.clear();
        self.next_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn scheduled_overlay_appears_only_after_its_deadline() {
        let mut manager = OverlayManager::default();
        let start = Instant::now();
        manager.schedule("2+2 = 4".into(), (100.0, 85.0), start + Duration::from_secs(1));

        assert_eq!(manager.tick(start), 0);
        assert!(manager.overlays().is_empty());
        assert_eq!(manager.pending_len(), 1);

        assert_eq!(manager.tick(start + Duration::from_secs(1)), 1);
        let overlay = &manager.overlays()[0];
        assert_eq!(overlay.text, "2+2 = 4");
        assert_eq!(overlay.anchor, (100.0, 85.0));
        assert_eq!(overlay.position, (100.0, 85.0));
        assert_eq!(manager.pending_len(), 0);
    }

    #[test]
    fn batch_promotion_preserves_scheduling_order() {
        let mut manager = OverlayManager::default();
        let due = Instant::now();
        manager.schedule("first".into(), (0.0, 0.0), due);
        manager.schedule("second".into(), (0.0, 0.0), due);
        manager.schedule("third".into(), (0.0, 0.0), due);

        manager.tick(due);
        let texts: Vec<&str> = manager.overlays().iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn dragging_one_overlay_leaves_the_others_alone() {
        let mut manager = OverlayManager::default();
        let due = Instant::now();
        let a = manager.schedule("a".into(), (10.0, 10.0), due);
        let b = manager.schedule("b".into(), (10.0, 10.0), due);
        manager.tick(due);

        assert!(manager.drag_by(a, (5.0, -3.0)));

        let find = |id| manager.overlays().iter().find(|o| o.id == id).cloned();
        let moved = find(a).expect("overlay a");
        let untouched = find(b).expect("overlay b");
        assert_eq!(moved.position, (15.0, 7.0));
        assert_eq!(moved.anchor, (10.0, 10.0));
        assert_eq!(untouched.position, (10.0, 10.0));
    }

    #[test]
    fn drag_of_unknown_id_reports_false() {
        let mut manager = OverlayManager::default();
        assert!(!manager.drag_by(42, (1.0, 1.0)));
    }

    #[test]
    fn clear_cancels_pending_appearances() {
        let mut manager = OverlayManager::default();
        let due = Instant::now() + Duration::from_secs(1);
        manager.schedule("late".into(), (0.0, 0.0), due);

        manager.clear();
        assert_eq!(manager.tick(due + Duration::from_secs(1)), 0);
        assert!(manager.is_empty());
    }
}
