//! Input state management
//!
//! Host events are delivered between frames and only accumulate here; the
//! frame driver reads the accumulated deltas at the start of the next frame
//! and clears them with `end_frame`.

use std::collections::{HashMap, HashSet};
use winit::keyboard::KeyCode;

/// Product-level actions bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Pause,
    Mute,
    AutoRotate,
    Back,
    Fullscreen,
    Unlock,
}

/// Tracks pointer, wheel, pinch and keyboard input per frame
pub struct InputState {
    /// Keys currently held down
    keys_down: HashSet<KeyCode>,
    /// Keys pressed this frame
    keys_just_pressed: HashSet<KeyCode>,

    /// Primary pointer held (drag in progress)
    pointer_down: bool,
    /// Last pointer position in logical pixels
    pointer_position: Option<(f64, f64)>,
    /// Drag movement accumulated this frame
    drag_delta: (f64, f64),

    /// Signed wheel notches this frame
    wheel_steps: i32,

    /// Active touch points (id -> position)
    touches: HashMap<u64, (f64, f64)>,
    /// Finger distance at the previous pinch sample
    pinch_distance: Option<f64>,
    /// Product of pinch distance ratios this frame
    pinch_ratio: f64,

    /// Any gesture or key this frame (user-gesture unlock)
    gesture: bool,

    /// Action map: action -> list of key bindings
    action_map: HashMap<Action, Vec<KeyCode>>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            keys_just_pressed: HashSet::new(),
            pointer_down: false,
            pointer_position: None,
            drag_delta: (0.0, 0.0),
            wheel_steps: 0,
            touches: HashMap::new(),
            pinch_distance: None,
            pinch_ratio: 1.0,
            gesture: false,
            action_map: Self::default_action_map(),
        }
    }

    fn default_action_map() -> HashMap<Action, Vec<KeyCode>> {
        let mut map = HashMap::new();
        map.insert(Action::Pause, vec![KeyCode::Space]);
        map.insert(Action::Mute, vec![KeyCode::KeyM]);
        map.insert(Action::AutoRotate, vec![KeyCode::KeyR]);
        map.insert(Action::Back, vec![KeyCode::Escape, KeyCode::Backspace]);
        map.insert(Action::Fullscreen, vec![KeyCode::KeyF]);
        map.insert(Action::Unlock, vec![KeyCode::Enter]);
        map
    }

    /// Bind an action to one or more keys
    pub fn bind_action(&mut self, action: Action, keys: Vec<KeyCode>) {
        self.action_map.insert(action, keys);
    }

    pub fn process_key_down(&mut self, key: KeyCode) {
        if !self.keys_down.contains(&key) {
            self.keys_just_pressed.insert(key);
            self.gesture = true;
        }
        self.keys_down.insert(key);
    }

    pub fn process_key_up(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    pub fn process_pointer_down(&mut self, x: f64, y: f64) {
        self.pointer_down = true;
        self.pointer_position = Some((x, y));
        self.gesture = true;
    }

    /// Cursor movement; contributes to the drag only while the pointer is down
    pub fn process_pointer_move(&mut self, x: f64, y: f64) {
        if self.pointer_down {
            if let Some((lx, ly)) = self.pointer_position {
                self.drag_delta.0 += x - lx;
                self.drag_delta.1 += y - ly;
            }
        }
        self.pointer_position = Some((x, y));
    }

    pub fn process_pointer_up(&mut self) {
        self.pointer_down = false;
    }

    /// Wheel scroll, positive when scrolling down; only the sign matters
    pub fn process_wheel(&mut self, delta_y: f64) {
        if delta_y > 0.0 {
            self.wheel_steps += 1;
        } else if delta_y < 0.0 {
            self.wheel_steps -= 1;
        }
    }

    pub fn process_touch_start(&mut self, id: u64, x: f64, y: f64) {
        self.touches.insert(id, (x, y));
        self.gesture = true;
        match self.touches.len() {
            1 => self.process_pointer_down(x, y),
            2 => {
                // second finger turns a drag into a pinch
                self.pointer_down = false;
                self.pinch_distance = self.finger_distance();
            }
            _ => {}
        }
    }

    pub fn process_touch_move(&mut self, id: u64, x: f64, y: f64) {
        if !self.touches.contains_key(&id) {
            return;
        }
        self.touches.insert(id, (x, y));
        match self.touches.len() {
            1 => self.process_pointer_move(x, y),
            2 => {
                if let (Some(prev), Some(d)) = (self.pinch_distance, self.finger_distance()) {
                    if prev > 0.0 {
                        self.pinch_ratio *= d / prev;
                    }
                    self.pinch_distance = Some(d);
                }
            }
            _ => {}
        }
    }

    pub fn process_touch_end(&mut self, id: u64) {
        self.touches.remove(&id);
        if self.touches.len() < 2 {
            self.pinch_distance = None;
        }
        if self.touches.is_empty() {
            self.process_pointer_up();
        }
    }

    fn finger_distance(&self) -> Option<f64> {
        let mut it = self.touches.values();
        let (a, b) = (it.next()?, it.next()?);
        Some(((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt())
    }

    /// Call at end of frame to clear per-frame state
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.drag_delta = (0.0, 0.0);
        self.wheel_steps = 0;
        self.pinch_ratio = 1.0;
        self.gesture = false;
    }

    // --- Query methods ---

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    pub fn is_action_just_pressed(&self, action: Action) -> bool {
        self.action_map
            .get(&action)
            .map(|keys| keys.iter().any(|k| self.keys_just_pressed.contains(k)))
            .unwrap_or(false)
    }

    /// Actions pressed this frame, in a fixed order
    pub fn actions_just_pressed(&self) -> Vec<Action> {
        [
            Action::Unlock,
            Action::Pause,
            Action::Mute,
            Action::AutoRotate,
            Action::Fullscreen,
            Action::Back,
        ]
        .into_iter()
        .filter(|a| self.is_action_just_pressed(*a))
        .collect()
    }

    pub fn is_dragging(&self) -> bool {
        self.pointer_down
    }

    /// Last known pointer position in logical pixels
    pub fn pointer_position(&self) -> Option<(f64, f64)> {
        self.pointer_position
    }

    pub fn drag_delta(&self) -> (f64, f64) {
        self.drag_delta
    }

    pub fn wheel_steps(&self) -> i32 {
        self.wheel_steps
    }

    pub fn pinch_ratio(&self) -> f64 {
        self.pinch_ratio
    }

    /// Whether any user gesture arrived this frame
    pub fn gesture_this_frame(&self) -> bool {
        self.gesture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_actions() {
        let mut input = InputState::new();
        input.process_key_down(KeyCode::Space);
        assert!(input.is_action_just_pressed(Action::Pause));
        assert_eq!(input.actions_just_pressed(), vec![Action::Pause]);

        // held key does not re-trigger
        input.end_frame();
        input.process_key_down(KeyCode::Space);
        assert!(!input.is_action_just_pressed(Action::Pause));
        assert!(input.is_key_down(KeyCode::Space));
    }

    #[test]
    fn test_rebind() {
        let mut input = InputState::new();
        input.bind_action(Action::Mute, vec![KeyCode::KeyS]);
        input.process_key_down(KeyCode::KeyS);
        assert!(input.is_action_just_pressed(Action::Mute));
    }

    #[test]
    fn drag_accumulates_only_while_down() {
        let mut input = InputState::new();
        input.process_pointer_move(10.0, 10.0);
        input.process_pointer_move(20.0, 10.0);
        assert_eq!(input.drag_delta(), (0.0, 0.0));

        input.process_pointer_down(20.0, 10.0);
        input.process_pointer_move(30.0, 15.0);
        input.process_pointer_move(35.0, 20.0);
        assert_eq!(input.drag_delta(), (15.0, 10.0));
        assert!(input.is_dragging());

        input.end_frame();
        assert_eq!(input.drag_delta(), (0.0, 0.0));
        input.process_pointer_up();
        assert!(!input.is_dragging());
    }

    #[test]
    fn wheel_counts_signs() {
        let mut input = InputState::new();
        input.process_wheel(120.0);
        input.process_wheel(3.0);
        input.process_wheel(-50.0);
        assert_eq!(input.wheel_steps(), 1);
    }

    #[test]
    fn pinch_ratio_tracks_finger_distance() {
        let mut input = InputState::new();
        input.process_touch_start(1, 0.0, 0.0);
        input.process_touch_start(2, 100.0, 0.0);
        input.process_touch_move(2, 150.0, 0.0);
        input.process_touch_move(2, 200.0, 0.0);
        assert!((input.pinch_ratio() - 2.0).abs() < 1e-9);
        assert!(!input.is_dragging());

        input.process_touch_end(2);
        input.end_frame();
        input.process_touch_move(1, 10.0, 0.0);
        assert_eq!(input.pinch_ratio(), 1.0);
    }

    #[test]
    fn gestures_flag_unlock() {
        let mut input = InputState::new();
        assert!(!input.gesture_this_frame());
        input.process_pointer_down(1.0, 1.0);
        assert!(input.gesture_this_frame());
        input.end_frame();
        assert!(!input.gesture_this_frame());
    }
}
