//! Object focus: hover, selection, and the delayed modal reveal and release.
//!
//! ```text
//! Idle <-> Hovered(o) --click--> Selecting(o) --800ms--> Focused(o)
//!   ^                                                       | close
//!   +----------------------300ms------------------- Closing(o)
//! ```
//!
//! Only one object is ever selected. Requests that do not fit the current phase are ignored and
//! reported as `false`.

use std::collections::HashSet;
use std::time::Duration;

use engine_core::TimerQueue;
use renderer::CameraTarget;

use crate::objects::{SceneObject, SceneObjectId};
use crate::tier::TierProfile;

/// Delay between a click and the modal appearing.
pub const SELECT_DELAY: Duration = Duration::from_millis(800);
/// Delay between closing the modal and releasing the selection.
pub const CLOSE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPhase {
    Idle,
    Hovered(SceneObjectId),
    /// Camera travelling to the object, modal not shown yet.
    Selecting(SceneObjectId),
    /// Modal open.
    Focused(SceneObjectId),
    /// Modal hidden, selection about to be released.
    Closing(SceneObjectId),
}

/// Focus as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusState {
    pub selected: Option<SceneObjectId>,
    pub hovered: Option<SceneObjectId>,
    pub modal_open: bool,
}

/// Transitions produced by timers, for the owner to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusEvent {
    ModalOpened(SceneObjectId),
    Released(SceneObjectId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusTimer {
    Reveal(SceneObjectId),
    Release(SceneObjectId),
}

pub struct FocusMachine {
    phase: FocusPhase,
    interactive: HashSet<SceneObjectId>,
    timers: TimerQueue<FocusTimer>,
}

impl FocusMachine {
    pub fn new(objects: &[SceneObject]) -> Self {
        Self {
            phase: FocusPhase::Idle,
            interactive: objects.iter().filter(|o| o.interactive).map(|o| o.id).collect(),
            timers: TimerQueue::new(),
        }
    }

    pub fn phase(&self) -> FocusPhase {
        self.phase
    }

    pub fn state(&self) -> FocusState {
        match self.phase {
            FocusPhase::Idle => FocusState::default(),
            FocusPhase::Hovered(o) => FocusState {
                hovered: Some(o),
                ..FocusState::default()
            },
            FocusPhase::Selecting(o) | FocusPhase::Closing(o) => FocusState {
                selected: Some(o),
                ..FocusState::default()
            },
            FocusPhase::Focused(o) => FocusState {
                selected: Some(o),
                hovered: None,
                modal_open: true,
            },
        }
    }

    pub fn selected(&self) -> Option<SceneObjectId> {
        self.state().selected
    }

    pub fn hovered(&self) -> Option<SceneObjectId> {
        self.state().hovered
    }

    pub fn is_modal_open(&self) -> bool {
        matches!(self.phase, FocusPhase::Focused(_))
    }

    /// Free look is available only while nothing is selected.
    pub fn orbit_enabled(&self) -> bool {
        self.selected().is_none()
    }

    pub fn is_interactive(&self, id: SceneObjectId) -> bool {
        self.interactive.contains(&id)
    }

    pub fn hover_enter(&mut self, id: SceneObjectId) -> bool {
        if !self.is_interactive(id) {
            return false;
        }
        match self.phase {
            FocusPhase::Idle | FocusPhase::Hovered(_) => {
                self.phase = FocusPhase::Hovered(id);
                true
            }
            _ => false,
        }
    }

    pub fn hover_leave(&mut self, id: SceneObjectId) -> bool {
        match self.phase {
            FocusPhase::Hovered(o) if o == id => {
                self.phase = FocusPhase::Idle;
                true
            }
            _ => false,
        }
    }

    /// Select `id` at scene time `now`. The modal follows after [`SELECT_DELAY`].
    pub fn click(&mut self, id: SceneObjectId, now: Duration) -> bool {
        if !self.is_interactive(id) || self.selected().is_some() || self.timers.is_closed() {
            return false;
        }
        self.phase = FocusPhase::Selecting(id);
        self.timers.schedule(now, SELECT_DELAY, FocusTimer::Reveal(id));
        log::debug!("Selected {}", id);
        true
    }

    /// Hide the modal at scene time `now`. The selection is released after [`CLOSE_DELAY`].
    pub fn close(&mut self, now: Duration) -> bool {
        let FocusPhase::Focused(id) = self.phase else {
            return false;
        };
        if self.timers.is_closed() {
            return false;
        }
        self.phase = FocusPhase::Closing(id);
        self.timers.schedule(now, CLOSE_DELAY, FocusTimer::Release(id));
        log::debug!("Closing modal for {}", id);
        true
    }

    /// Fire timers due at `now`.
    pub fn update(&mut self, now: Duration) -> Vec<FocusEvent> {
        let mut events = Vec::new();
        for timer in self.timers.poll(now) {
            match (timer, self.phase) {
                (FocusTimer::Reveal(id), FocusPhase::Selecting(o)) if o == id => {
                    self.phase = FocusPhase::Focused(id);
                    log::debug!("Modal opened for {}", id);
                    events.push(FocusEvent::ModalOpened(id));
                }
                (FocusTimer::Release(id), FocusPhase::Closing(o)) if o == id => {
                    self.phase = FocusPhase::Idle;
                    log::debug!("Released {}", id);
                    events.push(FocusEvent::Released(id));
                }
                (timer, phase) => log::trace!("Stale focus timer {:?} in {:?}", timer, phase),
            }
        }
        events
    }

    /// Where the camera should head: the selected object's viewpoint, or `idle` otherwise.
    pub fn camera_target(&self, profile: &TierProfile, idle: CameraTarget) -> CameraTarget {
        match self.selected() {
            Some(id) => profile.focus_target(id),
            None => idle,
        }
    }

    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Cancel both timers and forget all focus. Later requests are ignored.
    pub fn teardown(&mut self) {
        self.timers.close();
        self.phase = FocusPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn machine() -> FocusMachine {
        FocusMachine::new(&SceneObject::catalogue())
    }

    #[test]
    fn modal_opens_exactly_at_select_delay() {
        let mut f = machine();
        assert!(f.click(SceneObjectId::Monitor, ms(0)));
        assert_eq!(f.selected(), Some(SceneObjectId::Monitor));
        assert!(!f.orbit_enabled());
        assert!(f.update(ms(799)).is_empty());
        assert!(!f.is_modal_open());
        assert_eq!(
            f.update(ms(800)),
            vec![FocusEvent::ModalOpened(SceneObjectId::Monitor)]
        );
        assert!(f.is_modal_open());
    }

    #[test]
    fn second_click_is_ignored_in_every_selected_phase() {
        let mut f = machine();
        f.click(SceneObjectId::Monitor, ms(0));
        assert!(!f.click(SceneObjectId::Window, ms(100)));
        f.update(ms(800));
        assert!(!f.click(SceneObjectId::Window, ms(900)));
        f.close(ms(1000));
        assert!(!f.click(SceneObjectId::Window, ms(1100)));
        assert_eq!(f.selected(), Some(SceneObjectId::Monitor));
    }

    #[test]
    fn close_hides_modal_then_releases() {
        let mut f = machine();
        f.click(SceneObjectId::Console, ms(0));
        f.update(ms(800));
        assert!(f.close(ms(1000)));
        assert!(!f.is_modal_open());
        assert_eq!(f.selected(), Some(SceneObjectId::Console));
        assert!(f.update(ms(1299)).is_empty());
        assert_eq!(f.update(ms(1300)), vec![FocusEvent::Released(SceneObjectId::Console)]);
        assert_eq!(f.phase(), FocusPhase::Idle);
        assert!(f.orbit_enabled());
    }

    #[test]
    fn close_outside_focused_is_ignored() {
        let mut f = machine();
        assert!(!f.close(ms(0)));
        f.click(SceneObjectId::Avatar, ms(0));
        assert!(!f.close(ms(100)));
        assert_eq!(f.phase(), FocusPhase::Selecting(SceneObjectId::Avatar));
    }

    #[test]
    fn hover_is_ignored_while_selected() {
        let mut f = machine();
        assert!(f.hover_enter(SceneObjectId::Window));
        assert_eq!(f.hovered(), Some(SceneObjectId::Window));
        f.click(SceneObjectId::Window, ms(0));
        assert_eq!(f.hovered(), None);
        assert!(!f.hover_enter(SceneObjectId::Bookshelf));
        assert!(!f.hover_leave(SceneObjectId::Window));
    }

    #[test]
    fn hover_leave_must_match() {
        let mut f = machine();
        f.hover_enter(SceneObjectId::Avatar);
        assert!(!f.hover_leave(SceneObjectId::Monitor));
        assert!(f.hover_leave(SceneObjectId::Avatar));
        assert_eq!(f.phase(), FocusPhase::Idle);
    }

    #[test]
    fn non_interactive_objects_are_ignored() {
        let mut objects = SceneObject::catalogue();
        for o in &mut objects {
            if o.id == SceneObjectId::WorldMap {
                o.interactive = false;
            }
        }
        let mut f = FocusMachine::new(&objects);
        assert!(!f.hover_enter(SceneObjectId::WorldMap));
        assert!(!f.click(SceneObjectId::WorldMap, ms(0)));
        assert_eq!(f.phase(), FocusPhase::Idle);

        let mut f = machine();
        assert!(f.is_interactive(SceneObjectId::WorldMap));
        assert!(f.click(SceneObjectId::WorldMap, ms(0)));
    }

    #[test]
    fn camera_target_follows_selection() {
        let profile = TierProfile::desktop();
        let mut f = machine();
        let idle = profile.default_camera;
        assert_eq!(f.camera_target(&profile, idle), idle);
        f.click(SceneObjectId::Monitor, ms(0));
        assert_eq!(
            f.camera_target(&profile, idle),
            profile.focus_target(SceneObjectId::Monitor)
        );
    }

    #[test]
    fn teardown_cancels_timers() {
        let mut f = machine();
        f.click(SceneObjectId::Monitor, ms(0));
        f.teardown();
        assert!(f.update(ms(5000)).is_empty());
        assert!(!f.is_modal_open());
        assert!(!f.has_pending_timers());
        assert!(!f.click(SceneObjectId::Monitor, ms(6000)));
    }
}
