use serde::{Deserialize, Serialize};

/// Where a library entry points: an external YouTube link or a file the
/// server holds under its upload directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoKind {
    #[default]
    Youtube,
    File,
}

/// Metadata for one entry in the video library.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Video {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub exercise: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: VideoKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Video {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }

    pub fn exercise(&self) -> &str {
        self.exercise.as_deref().unwrap_or("-")
    }

    /// Browser target for the entry: the YouTube URL itself, or the
    /// server's download route for an uploaded file.
    pub fn watch_url(&self, base_url: &str) -> Option<String> {
        match self.kind {
            VideoKind::Youtube => self.url.clone(),
            VideoKind::File => self
                .path
                .as_deref()
                .map(|p| format!("{base_url}/download-video/{p}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_entry_deserializes() {
        let json = r#"{"index":0,"title":"Form check","exercise":"squat","type":"youtube","url":"https://youtu.be/abc"}"#;
        let v: Video = serde_json::from_str(json).unwrap();
        assert_eq!(v.kind, VideoKind::Youtube);
        assert_eq!(
            v.watch_url("http://localhost:5000").as_deref(),
            Some("https://youtu.be/abc")
        );
    }

    #[test]
    fn file_entry_builds_download_url() {
        let json = r#"{"index":1,"title":null,"exercise":"plank","type":"file","path":"plank.mp4"}"#;
        let v: Video = serde_json::from_str(json).unwrap();
        assert_eq!(v.title(), "(untitled)");
        assert_eq!(
            v.watch_url("http://localhost:5000").as_deref(),
            Some("http://localhost:5000/download-video/plank.mp4")
        );
    }

    #[test]
    fn update_payload_skips_absent_path() {
        let v = Video {
            index: Some(2),
            title: Some("Pull-up tips".into()),
            exercise: Some("pull-up".into()),
            kind: VideoKind::Youtube,
            url: Some("https://youtu.be/xyz".into()),
            path: None,
        };
        let value = serde_json::to_value(&v).unwrap();
        assert!(!value.as_object().unwrap().contains_key("path"));
        assert_eq!(value["type"], "youtube");
    }
}
