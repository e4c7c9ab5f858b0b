//! Status decorator — overlays a busy/idle line on an arbitrary body widget.
//!
//! Busy-state is cross-cutting (any long-running fetch should show
//! feedback), so it lives in a wrapper instead of being re-implemented by
//! every widget. The wrapped body gets a [`StatusHandle`] at construction —
//! if it wants one — and flips the indicator around its own background work.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::message::Msg;
use crate::theme;
use crate::widget::{Transition, Widget};

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
const LABEL_WIDTH: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Loading,
    Idle,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Loading => write!(f, "Loading"),
            Status::Idle => write!(f, "Idling"),
        }
    }
}

/// Shared busy/idle cell, settable only by the wrapped body. The whole
/// update loop is single-threaded and the handle never crosses a task
/// boundary, so a plain `Rc<Cell>` is enough.
#[derive(Clone, Default)]
pub struct StatusHandle(Rc<Cell<Status>>);

impl StatusHandle {
    pub fn set(&self, status: Status) {
        self.0.set(status);
    }

    pub fn get(&self) -> Status {
        self.0.get()
    }
}

/// Decorator that draws a fixed-width busy/idle label (plus a spinner while
/// busy) above the body widget's own view.
pub struct StatusLine {
    status: StatusHandle,
    spinner_frame: usize,
    body: Box<dyn Widget>,
}

impl StatusLine {
    pub fn new(mut body: Box<dyn Widget>) -> Self {
        let status = StatusHandle::default();
        if !body.attach_status(status.clone()) {
            // A body with no long-running work to report would otherwise
            // spin forever.
            status.set(Status::Idle);
        }
        Self {
            status,
            spinner_frame: 0,
            body,
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> Status {
        self.status.get()
    }
}

impl Widget for StatusLine {
    fn init(&mut self) -> Transition {
        self.body.init()
    }

    fn update(&mut self, msg: Msg) -> Transition {
        // While busy the spinner advances on its own pulse, independent of
        // whatever the body does with the same message.
        if self.status.get() == Status::Loading {
            if let Msg::Tick = msg {
                self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
            }
        }
        self.body.update(msg)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let status = self.status.get();
        let label = format!("{:^width$}", status.to_string(), width = LABEL_WIDTH);
        let mut spans = vec![Span::styled(label, theme::style_status_label())];
        if status == Status::Loading {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                SPINNER_FRAMES[self.spinner_frame],
                theme::style_title(),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

        self.body.render(frame, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    /// Body that accepts the status handle and parks it where the test can
    /// reach it.
    struct BusyBody {
        slot: Rc<RefCell<Option<StatusHandle>>>,
    }

    impl Widget for BusyBody {
        fn update(&mut self, _msg: Msg) -> Transition {
            Transition::Continue
        }

        fn render(&self, _frame: &mut Frame, _area: Rect) {}

        fn attach_status(&mut self, handle: StatusHandle) -> bool {
            *self.slot.borrow_mut() = Some(handle);
            true
        }
    }

    /// Body without the status capability.
    struct PlainBody;

    impl Widget for PlainBody {
        fn update(&mut self, _msg: Msg) -> Transition {
            Transition::Continue
        }

        fn render(&self, _frame: &mut Frame, _area: Rect) {}
    }

    fn top_row(line: &StatusLine) -> String {
        let backend = TestBackend::new(30, 4);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| line.render(f, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        (0..30u16).map(|x| buffer[(x, 0)].symbol()).collect()
    }

    #[test]
    fn handle_is_injected_into_a_willing_body() {
        let slot = Rc::new(RefCell::new(None));
        let line = StatusLine::new(Box::new(BusyBody { slot: slot.clone() }));

        let handle = slot.borrow().clone().expect("handle injected");
        assert_eq!(line.status(), Status::Loading);

        handle.set(Status::Idle);
        assert_eq!(line.status(), Status::Idle);

        handle.set(Status::Loading);
        assert_eq!(line.status(), Status::Loading);
    }

    #[test]
    fn body_without_the_capability_starts_idle() {
        let line = StatusLine::new(Box::new(PlainBody));
        assert_eq!(line.status(), Status::Idle);
        assert!(top_row(&line).contains("Idling"));
    }

    #[test]
    fn label_follows_the_busy_state() {
        let slot = Rc::new(RefCell::new(None));
        let line = StatusLine::new(Box::new(BusyBody { slot: slot.clone() }));
        assert!(top_row(&line).contains("Loading"));

        let handle = slot.borrow().clone().unwrap();
        handle.set(Status::Idle);
        assert!(top_row(&line).contains("Idling"));
        assert!(!top_row(&line).contains("Loading"));
    }

    #[test]
    fn spinner_advances_only_while_loading() {
        let slot = Rc::new(RefCell::new(None));
        let mut line = StatusLine::new(Box::new(BusyBody { slot: slot.clone() }));

        line.update(Msg::Tick);
        assert_eq!(line.spinner_frame, 1);

        slot.borrow().clone().unwrap().set(Status::Idle);
        line.update(Msg::Tick);
        assert_eq!(line.spinner_frame, 1);
    }
}
