//! Turns per-frame pick results into enter/leave/click events scoped to objects.

use glam::Vec2;

/// Cursor travel (pixels) between press and release beyond which the gesture is a drag.
pub const CLICK_SLOP: f32 = 4.0;

/// Pointer event delivered to a placed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent<K> {
    Enter(K),
    Leave(K),
    Click(K),
}

/// Tracks which object is under the cursor and which one a press started on.
#[derive(Debug, Clone)]
pub struct PointerTracker<K> {
    hovered: Option<K>,
    press: Option<(Option<K>, Vec2)>,
}

impl<K> Default for PointerTracker<K> {
    fn default() -> Self {
        Self {
            hovered: None,
            press: None,
        }
    }
}

impl<K: Copy + PartialEq> PointerTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<K> {
        self.hovered
    }

    /// Feed the object currently under the cursor. Emits leave before enter.
    pub fn update_hover(&mut self, hit: Option<K>) -> Vec<PointerEvent<K>> {
        if hit == self.hovered {
            return Vec::new();
        }
        let mut events = Vec::with_capacity(2);
        if let Some(prev) = self.hovered {
            events.push(PointerEvent::Leave(prev));
        }
        if let Some(next) = hit {
            events.push(PointerEvent::Enter(next));
        }
        self.hovered = hit;
        events
    }

    /// Primary button went down at `cursor`.
    pub fn press(&mut self, cursor: Vec2) {
        self.press = Some((self.hovered, cursor));
    }

    /// Primary button went up at `cursor`. A click fires when the release lands on the object the
    /// press started on and the cursor barely moved.
    pub fn release(&mut self, cursor: Vec2) -> Option<PointerEvent<K>> {
        let (target, origin) = self.press.take()?;
        let target = target?;
        if self.hovered != Some(target) {
            return None;
        }
        if origin.distance(cursor) > CLICK_SLOP {
            log::trace!("Release after {:.1}px of travel treated as drag", origin.distance(cursor));
            return None;
        }
        Some(PointerEvent::Click(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_between_objects_emits_leave_then_enter() {
        let mut t = PointerTracker::new();
        assert_eq!(t.update_hover(Some(1)), vec![PointerEvent::Enter(1)]);
        assert!(t.update_hover(Some(1)).is_empty());
        assert_eq!(
            t.update_hover(Some(2)),
            vec![PointerEvent::Leave(1), PointerEvent::Enter(2)]
        );
        assert_eq!(t.update_hover(None), vec![PointerEvent::Leave(2)]);
    }

    #[test]
    fn click_requires_release_on_same_object() {
        let mut t = PointerTracker::new();
        t.update_hover(Some(3));
        t.press(Vec2::new(10.0, 10.0));
        assert_eq!(t.release(Vec2::new(11.0, 10.0)), Some(PointerEvent::Click(3)));

        t.press(Vec2::new(10.0, 10.0));
        t.update_hover(Some(4));
        assert_eq!(t.release(Vec2::new(10.0, 10.0)), None);
    }

    #[test]
    fn drag_is_not_a_click() {
        let mut t = PointerTracker::new();
        t.update_hover(Some(5));
        t.press(Vec2::ZERO);
        assert_eq!(t.release(Vec2::new(40.0, 0.0)), None);
    }
}
