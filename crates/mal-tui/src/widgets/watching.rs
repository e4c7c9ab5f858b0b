//! List browser for the currently-watching list.
//!
//! State machine: no page yet (initial fetch in flight) → ready, with a
//! transient busy sub-state while any fetch or mutation is outstanding.
//! Fetch and mutation failures are fatal; the loop surfaces them and exits.

use std::sync::Arc;

use mal_core::types::{AnimePage, EpisodeUpdate, UpdateResponse, WatchStatus};
use mal_core::MalClient;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

use crate::message::{effect, Msg};
use crate::theme;
use crate::widget::{Transition, Widget};
use crate::widgets::status_line::{Status, StatusHandle};

pub struct WatchingList {
    client: Arc<MalClient>,
    /// None until the initial fetch lands.
    page: Option<AnimePage>,
    selected: usize,
    status: Option<StatusHandle>,
}

impl WatchingList {
    pub fn new(client: Arc<MalClient>) -> Self {
        Self {
            client,
            page: None,
            selected: 0,
            status: None,
        }
    }

    fn set_status(&self, status: Status) {
        if let Some(handle) = &self.status {
            handle.set(status);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Transition {
        match key.code {
            KeyCode::Char('w') | KeyCode::Up => {
                if self.page.is_some() && self.selected > 0 {
                    self.selected -= 1;
                }
                Transition::Continue
            }
            KeyCode::Char('s') | KeyCode::Down => self.move_forward(),
            KeyCode::Char('d') | KeyCode::Right => self.adjust_watched(1),
            KeyCode::Char('a') | KeyCode::Left => self.adjust_watched(-1),
            _ => Transition::Continue,
        }
    }

    /// Advance the selection, or fetch the next page when already on the
    /// last loaded row. The selection itself never moves as part of a
    /// fetch; landing on appended rows takes another forward step.
    fn move_forward(&mut self) -> Transition {
        let Some(page) = &self.page else {
            return Transition::Continue;
        };

        if self.selected + 1 < page.data.len() {
            self.selected += 1;
            Transition::Continue
        } else if page.paging.has_next() {
            self.set_status(Status::Loading);
            let client = self.client.clone();
            let paging = page.paging.clone();
            Transition::Run(effect(async move {
                Msg::PageLoaded(client.next_page(&paging).await)
            }))
        } else {
            Transition::Continue
        }
    }

    /// Change the selected entry's watched count by `delta`, if the result
    /// stays meaningful; out-of-range deltas issue no request at all.
    fn adjust_watched(&mut self, delta: i64) -> Transition {
        let Some(entry) = self
            .page
            .as_ref()
            .and_then(|p| p.data.get(self.selected))
        else {
            return Transition::Continue;
        };

        let Some(update) = plan_episode_update(
            entry.node.num_episodes,
            entry.list_status.num_episodes_watched,
            delta,
        ) else {
            return Transition::Continue;
        };

        self.set_status(Status::Loading);
        let client = self.client.clone();
        let id = entry.node.id;
        Transition::Run(effect(async move {
            let result = client.update_anime(id, &update).await;
            Msg::EntryUpdated { id, result }
        }))
    }

    /// Overwrite the entry's fields from the server-confirmed response.
    /// Overwriting (not accumulating) makes re-delivery of the same result
    /// harmless.
    fn apply_update(&mut self, id: u64, resp: &UpdateResponse) {
        let Some(entry) = self
            .page
            .as_mut()
            .and_then(|p| p.data.iter_mut().find(|e| e.node.id == id))
        else {
            return;
        };
        entry.list_status.num_episodes_watched = resp.num_episodes_watched;
        if let Some(status) = resp.status {
            entry.list_status.status = Some(status);
        }
    }
}

impl Widget for WatchingList {
    fn init(&mut self) -> Transition {
        self.set_status(Status::Loading);
        let client = self.client.clone();
        Transition::Run(effect(async move {
            Msg::ListLoaded(client.watching_list().await)
        }))
    }

    fn update(&mut self, msg: Msg) -> Transition {
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::ListLoaded(Ok(page)) => {
                self.page = Some(page);
                self.set_status(Status::Idle);
                Transition::Continue
            }
            Msg::PageLoaded(Ok(page)) => {
                if let Some(current) = &mut self.page {
                    current.data.extend(page.data);
                    current.paging = page.paging;
                }
                self.set_status(Status::Idle);
                Transition::Continue
            }
            Msg::EntryUpdated { id, result: Ok(resp) } => {
                self.apply_update(id, &resp);
                self.set_status(Status::Idle);
                Transition::Continue
            }
            Msg::ListLoaded(Err(e)) | Msg::PageLoaded(Err(e)) => {
                self.set_status(Status::Idle);
                Transition::Fail(e)
            }
            Msg::EntryUpdated { result: Err(e), .. } => {
                self.set_status(Status::Idle);
                Transition::Fail(e)
            }
            _ => Transition::Continue,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(page) = &self.page else {
            frame.render_widget(
                Paragraph::new("Fetching your watching list…").style(theme::style_muted()),
                area,
            );
            return;
        };

        // marker + "nnn / nnn " prefix
        let title_width = (area.width as usize).saturating_sub(14);

        let mut lines = Vec::with_capacity(page.data.len() + 2);
        if page.paging.has_prev() {
            lines.push(Line::styled("   Previous ^^^", theme::style_muted()));
        }
        for (i, entry) in page.data.iter().enumerate() {
            let marker = if i == self.selected { "👉 " } else { "   " };
            lines.push(Line::from(vec![
                Span::raw(marker),
                Span::styled(
                    format!("{:>3}", entry.list_status.num_episodes_watched),
                    theme::style_watched(),
                ),
                Span::raw(" / "),
                Span::styled(format!("{:>3}", entry.node.num_episodes), theme::style_total()),
                Span::raw(" "),
                Span::styled(
                    truncate_to_width(&entry.node.long_title(), title_width),
                    theme::style_title(),
                ),
            ]));
        }
        if page.paging.has_next() {
            lines.push(Line::styled("   Next vvv", theme::style_muted()));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn attach_status(&mut self, handle: StatusHandle) -> bool {
        self.status = Some(handle);
        true
    }
}

/// Decide what, if anything, to send for a watched-count change of `delta`.
///
/// Landing exactly on the total is checked before the general in-range case:
/// it is also numerically in range, but additionally flips the status to
/// completed, and both fields go out in the same request.
pub(crate) fn plan_episode_update(total: u32, watched: u32, delta: i64) -> Option<EpisodeUpdate> {
    let target = i64::from(watched) + delta;
    if target == i64::from(total) {
        Some(EpisodeUpdate {
            num_watched_episodes: total,
            status: Some(WatchStatus::Completed),
        })
    } else if target >= 0 && target < i64::from(total) {
        Some(EpisodeUpdate {
            num_watched_episodes: target as u32,
            status: None,
        })
    } else {
        None
    }
}

fn truncate_to_width(s: &str, max: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max {
            break;
        }
        width += w;
        out.push(c);
    }
    out
}
