//! Widget trait and the navigation stack.
//!
//! Design principles:
//! - Widgets are self-contained: they own their state and render themselves.
//! - `update` runs to completion without awaiting; long-running work is
//!   returned as an effect for the app loop to spawn.
//! - Only the top of the stack is live; everything beneath is suspended
//!   (no update or render calls) until re-exposed by a pop.

use ratatui::layout::Rect;
use ratatui::Frame;

use crate::message::{Effect, Msg};
use crate::widgets::status_line::StatusHandle;

/// What a widget hands back to the loop after processing a message.
pub enum Transition {
    /// Nothing scheduled; keep going.
    Continue,
    /// Keep going, and run this in the background.
    Run(Effect),
    /// Unrecoverable failure; the loop surfaces it and exits.
    Fail(mal_core::Error),
}

/// A composable UI unit: init, update, render.
pub trait Widget {
    /// Runs once, when the widget first becomes the live top of the stack.
    fn init(&mut self) -> Transition {
        Transition::Continue
    }

    /// Process one message; optionally schedule deferred work.
    fn update(&mut self, msg: Msg) -> Transition;

    fn render(&self, frame: &mut Frame, area: Rect);

    /// Capability query used by the status decorator at construction:
    /// widgets that report busy/idle keep the handle and return true; the
    /// default declines, and such widgets never toggle the indicator.
    fn attach_status(&mut self, _handle: StatusHandle) -> bool {
        false
    }
}

/// Ordered widgets with top-only delegation. Seeded with a root widget at
/// startup and never observed empty afterwards.
#[derive(Default)]
pub struct WidgetStack {
    widgets: Vec<Box<dyn Widget>>,
}

impl WidgetStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, widget: Box<dyn Widget>) {
        self.widgets.push(widget);
    }

    pub fn pop(&mut self) -> Option<Box<dyn Widget>> {
        self.widgets.pop()
    }

    pub fn peek(&self) -> Option<&dyn Widget> {
        self.widgets.last().map(|w| w.as_ref())
    }

    pub fn init(&mut self) -> Transition {
        match self.widgets.last_mut() {
            Some(w) => w.init(),
            None => Transition::Continue,
        }
    }

    pub fn update(&mut self, msg: Msg) -> Transition {
        match self.widgets.last_mut() {
            Some(w) => w.update(msg),
            None => Transition::Continue,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if let Some(w) = self.widgets.last() {
            w.render(frame, area);
        }
    }
}
