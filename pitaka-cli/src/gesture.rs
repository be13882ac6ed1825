//! Input for `pitaka swipe`: either a list of x positions or a JSON file of
//! recorded mouse/touch events.

use anyhow::{bail, Context, Result};
use pitaka_core::PointerEvent;
use pitaka_ingest::pointer::PointerSource;
use pitaka_ingest::{MouseAdapter, MouseEvent, TouchAdapter, TouchEvent};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RecordedEvent {
    Mouse(MouseEvent),
    Touch(TouchEvent),
}

/// `[200, 150, 90]` is press at 200, drag through 150 to 90, release.
pub fn from_path(xs: &[f64]) -> Result<Vec<PointerEvent>> {
    let Some((first, rest)) = xs.split_first() else {
        bail!("--path needs at least one x position");
    };
    let mut events = vec![PointerEvent::Down { x: *first }];
    events.extend(rest.iter().map(|&x| PointerEvent::Move { x }));
    events.push(PointerEvent::Up);
    Ok(events)
}

pub fn from_json(body: &str) -> Result<Vec<PointerEvent>> {
    let recorded: Vec<RecordedEvent> =
        serde_json::from_str(body).context("parsing recorded pointer events")?;

    let mut mouse = MouseAdapter::default();
    let mut touch = TouchAdapter;
    Ok(recorded
        .iter()
        .filter_map(|ev| match ev {
            RecordedEvent::Mouse(m) => mouse.translate(m),
            RecordedEvent::Touch(t) => touch.translate(t),
        })
        .collect())
}

pub fn from_file(path: &Path) -> Result<Vec<PointerEvent>> {
    let body = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    from_json(&body)
}
