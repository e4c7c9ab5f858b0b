//! Wire types for the MAL API v2, trimmed to the fields the list browser
//! actually requests (`list_status,num_episodes,alternative_titles`).

use serde::{Deserialize, Serialize};

/// One page of the user's anime list, exactly as MAL returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct AnimePage {
    pub data: Vec<AnimeEntry>,
    #[serde(default)]
    pub paging: Paging,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimeEntry {
    pub node: AnimeNode,
    #[serde(default)]
    pub list_status: ListStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimeNode {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub alternative_titles: AlternativeTitles,
    /// 0 means MAL doesn't know the episode count (still airing).
    #[serde(default)]
    pub num_episodes: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlternativeTitles {
    pub en: Option<String>,
    pub ja: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListStatus {
    pub status: Option<WatchStatus>,
    #[serde(default)]
    pub num_episodes_watched: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchStatus {
    Watching,
    Completed,
    OnHold,
    Dropped,
    PlanToWatch,
}

impl WatchStatus {
    /// The value MAL expects in form-encoded update requests.
    pub fn as_str(self) -> &'static str {
        match self {
            WatchStatus::Watching => "watching",
            WatchStatus::Completed => "completed",
            WatchStatus::OnHold => "on_hold",
            WatchStatus::Dropped => "dropped",
            WatchStatus::PlanToWatch => "plan_to_watch",
        }
    }
}

/// Pagination cursor. Replaced wholesale on every successful fetch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paging {
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl Paging {
    pub fn has_prev(&self) -> bool {
        self.previous.is_some()
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Subset update sent to the list-status endpoint. Status is only set when
/// the watched count lands exactly on the total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeUpdate {
    pub num_watched_episodes: u32,
    pub status: Option<WatchStatus>,
}

/// Server-confirmed list status after an update. The confirmed values
/// overwrite whatever the UI guessed locally.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateResponse {
    pub status: Option<WatchStatus>,
    #[serde(default)]
    pub num_episodes_watched: u32,
}

impl AnimeNode {
    /// English title when MAL has one, otherwise the default (romaji) title.
    pub fn preferred_title(&self) -> &str {
        match self.alternative_titles.en.as_deref() {
            Some(en) if !en.is_empty() => en,
            _ => &self.title,
        }
    }

    /// English title with the romaji in parentheses when they differ.
    pub fn long_title(&self) -> String {
        match self.alternative_titles.en.as_deref() {
            Some(en) if !en.is_empty() && en != self.title => {
                format!("{} ({})", en, self.title)
            }
            _ => self.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(title: &str, en: Option<&str>) -> AnimeNode {
        AnimeNode {
            id: 1,
            title: title.to_string(),
            alternative_titles: AlternativeTitles {
                en: en.map(str::to_string),
                ja: None,
                synonyms: Vec::new(),
            },
            num_episodes: 12,
        }
    }

    #[test]
    fn list_page_decodes() {
        let json = r#"{
            "data": [
                {
                    "node": {
                        "id": 30230,
                        "title": "Diamond no Ace",
                        "alternative_titles": {"en": "Ace of the Diamond", "ja": "ダイヤのA"},
                        "num_episodes": 75
                    },
                    "list_status": {"status": "watching", "num_episodes_watched": 10}
                }
            ],
            "paging": {"next": "https://api.myanimelist.net/v2/users/@me/animelist?offset=100"}
        }"#;

        let page: AnimePage = serde_json::from_str(json).unwrap();
        assert_eq!(page.data.len(), 1);
        let entry = &page.data[0];
        assert_eq!(entry.node.id, 30230);
        assert_eq!(entry.node.num_episodes, 75);
        assert_eq!(entry.list_status.num_episodes_watched, 10);
        assert_eq!(entry.list_status.status, Some(WatchStatus::Watching));
        assert!(page.paging.has_next());
        assert!(!page.paging.has_prev());
    }

    #[test]
    fn paging_defaults_to_neither_direction() {
        let page: AnimePage = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(!page.paging.has_prev());
        assert!(!page.paging.has_next());
    }

    #[test]
    fn watch_status_wire_names() {
        assert_eq!(WatchStatus::Completed.as_str(), "completed");
        let status: WatchStatus = serde_json::from_str(r#""plan_to_watch""#).unwrap();
        assert_eq!(status, WatchStatus::PlanToWatch);
    }

    #[test]
    fn preferred_title_picks_english_when_present() {
        assert_eq!(node("Shingeki no Kyojin", Some("Attack on Titan")).preferred_title(), "Attack on Titan");
        assert_eq!(node("Shingeki no Kyojin", None).preferred_title(), "Shingeki no Kyojin");
        assert_eq!(node("Shingeki no Kyojin", Some("")).preferred_title(), "Shingeki no Kyojin");
    }

    #[test]
    fn long_title_appends_romaji_only_when_different() {
        assert_eq!(
            node("Shingeki no Kyojin", Some("Attack on Titan")).long_title(),
            "Attack on Titan (Shingeki no Kyojin)"
        );
        assert_eq!(node("Monster", Some("Monster")).long_title(), "Monster");
        assert_eq!(node("Monster", None).long_title(), "Monster");
    }
}
