//! Touch and mouse adapters.
//!
//! Each adapter turns one browser-style event stream into the core's
//! `PointerEvent`s, so the swipe tracker never sees input-specific details.

use pitaka_core::{PointerEvent, SwipeOutcome, SwipeTracker};
use serde::{Deserialize, Serialize};

/// Something that can translate raw UI events into pointer samples.
pub trait PointerSource {
    type Event;

    /// `None` when the event means nothing to a swipe.
    fn translate(&mut self, event: &Self::Event) -> Option<PointerEvent>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub identifier: i64,
    pub client_x: f64,
    pub client_y: f64,
}

/// Touch events as delivered to the row; `target_touches` is the list of
/// fingers currently on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TouchEvent {
    TouchStart { target_touches: Vec<TouchPoint> },
    TouchMove { target_touches: Vec<TouchPoint> },
    TouchEnd,
    TouchCancel,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TouchAdapter;

impl PointerSource for TouchAdapter {
    type Event = TouchEvent;

    fn translate(&mut self, event: &TouchEvent) -> Option<PointerEvent> {
        match event {
            TouchEvent::TouchStart { target_touches } => {
                target_touches.first().map(|t| PointerEvent::Down { x: t.client_x })
            }
            TouchEvent::TouchMove { target_touches } => {
                target_touches.first().map(|t| PointerEvent::Move { x: t.client_x })
            }
            TouchEvent::TouchEnd => Some(PointerEvent::Up),
            TouchEvent::TouchCancel => Some(PointerEvent::Cancel),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MouseEvent {
    MouseDown {
        client_x: f64,
        #[serde(default)]
        button: u8,
    },
    MouseMove { client_x: f64 },
    MouseUp { client_x: f64 },
    MouseLeave,
}

/// Mouse moves only matter while the primary button is held; leaving the row
/// mid-drag cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseAdapter {
    dragging: bool,
}

impl MouseAdapter {
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

impl PointerSource for MouseAdapter {
    type Event = MouseEvent;

    fn translate(&mut self, event: &MouseEvent) -> Option<PointerEvent> {
        match *event {
            MouseEvent::MouseDown { client_x, button: 0 } => {
                self.dragging = true;
                Some(PointerEvent::Down { x: client_x })
            }
            MouseEvent::MouseDown { .. } => None,
            MouseEvent::MouseMove { client_x } if self.dragging => {
                Some(PointerEvent::Move { x: client_x })
            }
            MouseEvent::MouseMove { .. } => None,
            MouseEvent::MouseUp { .. } if self.dragging => {
                self.dragging = false;
                Some(PointerEvent::Up)
            }
            MouseEvent::MouseUp { .. } => None,
            MouseEvent::MouseLeave if self.dragging => {
                self.dragging = false;
                Some(PointerEvent::Cancel)
            }
            MouseEvent::MouseLeave => None,
        }
    }
}

/// Translate every event in `events` and feed it to `tracker`, returning the
/// last non-trivial outcome.
pub fn drive<S, I>(source: &mut S, tracker: &mut SwipeTracker, events: I) -> SwipeOutcome
where
    S: PointerSource,
    I: IntoIterator<Item = S::Event>,
{
    let mut last = SwipeOutcome::None;
    for ev in events {
        if let Some(p) = source.translate(&ev) {
            let outcome = tracker.handle(p);
            if outcome != SwipeOutcome::None {
                last = outcome;
            }
        }
    }
    last
}

/// Translate a whole stream without driving a tracker.
pub fn translate_all<S, I>(source: &mut S, events: I) -> Vec<PointerEvent>
where
    S: PointerSource,
    I: IntoIterator<Item = S::Event>,
{
    events.into_iter().filter_map(|ev| source.translate(&ev)).collect()
}
