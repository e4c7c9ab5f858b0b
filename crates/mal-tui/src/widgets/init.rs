//! Placeholder screen shown while the session bootstrap runs.

use ratatui::layout::Rect;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::message::Msg;
use crate::theme;
use crate::widget::{Transition, Widget};

pub struct InitScreen;

impl Widget for InitScreen {
    fn update(&mut self, _msg: Msg) -> Transition {
        Transition::Continue
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(
            Paragraph::new("Initializing… finish signing in if a browser window opened.")
                .style(theme::style_muted()),
            area,
        );
    }
}
