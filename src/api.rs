use crate::record::Record;
use crate::stats::StatsData;
use crate::videos::Video;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::thread;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug)]
pub enum ApiError {
    /// Non-2xx response; carries the status code and response body.
    Status(u16, String),
    Transport(Box<dyn std::error::Error + Send + Sync>),
    Decode(serde_json::Error),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Status(code, body) => write!(f, "server returned {code}: {body}"),
            ApiError::Transport(e) => write!(f, "request failed: {e}"),
            ApiError::Decode(e) => write!(f, "malformed response: {e}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Status(..) => None,
            ApiError::Transport(e) => Some(&**e),
            ApiError::Decode(e) => Some(e),
        }
    }
}

fn map_call_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(code, resp) => {
            ApiError::Status(code, resp.into_string().unwrap_or_default())
        }
        e => ApiError::Transport(Box::new(e)),
    }
}

/// Thin client for the workout-log server's JSON endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut req = ureq::get(&self.url(path));
        for (k, v) in query {
            req = req.query(k, v);
        }
        let resp = req
            .set("Accept", "application/json")
            .call()
            .map_err(map_call_error)?;
        let body = resp
            .into_string()
            .map_err(|e| ApiError::Transport(Box::new(e)))?;
        serde_json::from_str(&body).map_err(ApiError::Decode)
    }

    fn post_json(&self, path: &str, body: impl serde::Serialize) -> Result<(), ApiError> {
        ureq::post(&self.url(path))
            .send_json(body)
            .map(|_| ())
            .map_err(map_call_error)
    }

    /// GET `/records` - the most recent records.
    pub fn fetch_recent(&self) -> Result<Vec<Record>, ApiError> {
        self.get_json("/records", &[])
    }

    /// GET `/all-records` - every record, with server-assigned indices.
    pub fn fetch_all(&self) -> Result<Vec<Record>, ApiError> {
        self.get_json("/all-records", &[])
    }

    /// POST `/save` - store a new record. The payload carries no index.
    pub fn save(&self, record: &Record) -> Result<(), ApiError> {
        self.post_json("/save", record)
    }

    /// POST `/update-record` - replace fields of an existing record.
    pub fn update(&self, record: &Record) -> Result<(), ApiError> {
        self.post_json("/update-record", record)
    }

    /// POST `/delete-record` for one index.
    pub fn delete(&self, index: u32) -> Result<(), ApiError> {
        self.post_json("/delete-record", serde_json::json!({ "index": index }))
    }

    /// Issue one delete request per index, in parallel. There is no
    /// ordering guarantee and no rollback; each index gets its own
    /// outcome and the follow-up reload reflects whatever the server
    /// accepted.
    pub fn delete_many(&self, indices: &[u32]) -> Vec<(u32, Result<(), ApiError>)> {
        thread::scope(|scope| {
            let handles: Vec<_> = indices
                .iter()
                .map(|&index| (index, scope.spawn(move || self.delete(index))))
                .collect();
            handles
                .into_iter()
                .map(|(index, handle)| {
                    let result = handle
                        .join()
                        .unwrap_or_else(|_| Err(ApiError::Transport("delete worker panicked".into())));
                    (index, result)
                })
                .collect()
        })
    }

    /// GET `/stats-data`, optionally limited to an inclusive date range.
    pub fn fetch_stats(&self, range: Option<(&str, &str)>) -> Result<StatsData, ApiError> {
        match range {
            Some((start, end)) => self.get_json("/stats-data", &[("start", start), ("end", end)]),
            None => self.get_json("/stats-data", &[]),
        }
    }

    /// GET `/export-csv` - the server-rendered CSV of all records.
    pub fn export_csv(&self) -> Result<Vec<u8>, ApiError> {
        let resp = ureq::get(&self.url("/export-csv"))
            .call()
            .map_err(map_call_error)?;
        let mut bytes = Vec::new();
        resp.into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| ApiError::Transport(Box::new(e)))?;
        Ok(bytes)
    }

    /// GET `/video-data` - the video library, with indices.
    pub fn fetch_videos(&self) -> Result<Vec<Video>, ApiError> {
        self.get_json("/video-data", &[])
    }

    /// POST `/add-video` with YouTube metadata. The server also accepts
    /// multipart file uploads on this route; those are not supported here.
    pub fn add_video(&self, title: &str, exercise: &str, youtube_url: &str) -> Result<(), ApiError> {
        ureq::post(&self.url("/add-video"))
            .send_form(&[
                ("title", title),
                ("exercise", exercise),
                ("youtube_url", youtube_url),
            ])
            .map(|_| ())
            .map_err(map_call_error)
    }

    /// POST `/update-video` - edit title/exercise/url of an entry.
    pub fn update_video(&self, video: &Video) -> Result<(), ApiError> {
        self.post_json("/update-video", video)
    }

    /// POST `/delete-video` for one index.
    pub fn delete_video(&self, index: u32) -> Result<(), ApiError> {
        self.post_json("/delete-video", serde_json::json!({ "index": index }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Direction;
    use httpmock::prelude::*;

    #[test]
    fn save_then_fetch_round_trip() {
        let server = MockServer::start();
        let save_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/save")
                .json_body(serde_json::json!({
                    "datetime": "2024-05-01T09:30",
                    "exercise": "lunge",
                    "reps": 12,
                    "direction": "left"
                }));
            then.status(200).json_body(serde_json::json!({"status": "success"}));
        });
        let fetch_mock = server.mock(|when, then| {
            when.method(GET).path("/all-records");
            then.status(200).json_body(serde_json::json!([{
                "index": 0,
                "datetime": "2024-05-01T09:30",
                "exercise": "lunge",
                "reps": 12,
                "direction": "left"
            }]));
        });

        let client = ApiClient::new(server.base_url());
        let record = Record {
            datetime: "2024-05-01T09:30".into(),
            exercise: "lunge".into(),
            reps: Some(12),
            direction: Some(Direction::Left),
            ..Record::default()
        };
        client.save(&record).unwrap();
        let fetched = client.fetch_all().unwrap();

        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].index, Some(0));
        assert_eq!(fetched[0].datetime, record.datetime);
        assert_eq!(fetched[0].exercise, record.exercise);
        assert_eq!(fetched[0].reps, record.reps);
        assert_eq!(fetched[0].direction, record.direction);

        save_mock.assert();
        fetch_mock.assert();
    }

    #[test]
    fn delete_sends_index_body() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST)
                .path("/delete-record")
                .json_body(serde_json::json!({"index": 4}));
            then.status(200).json_body(serde_json::json!({"status": "success"}));
        });

        ApiClient::new(server.base_url()).delete(4).unwrap();
        m.assert();
    }

    #[test]
    fn delete_many_issues_one_request_per_index() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST).path("/delete-record");
            then.status(200).json_body(serde_json::json!({"status": "success"}));
        });

        let client = ApiClient::new(server.base_url());
        let results = client.delete_many(&[1, 2, 3]);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|(_, r)| r.is_ok()));
        m.assert_hits(3);
    }

    #[test]
    fn delete_many_reports_per_index_failures() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/delete-record")
                .json_body(serde_json::json!({"index": 9}));
            then.status(400).body("invalid index");
        });
        server.mock(|when, then| {
            when.method(POST)
                .path("/delete-record")
                .json_body(serde_json::json!({"index": 1}));
            then.status(200).json_body(serde_json::json!({"status": "success"}));
        });

        let client = ApiClient::new(server.base_url());
        let results = client.delete_many(&[1, 9]);
        let failed: Vec<u32> = results
            .iter()
            .filter(|(_, r)| r.is_err())
            .map(|(i, _)| *i)
            .collect();
        assert_eq!(failed, vec![9]);
    }

    #[test]
    fn stats_range_is_passed_as_query_params() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path("/stats-data")
                .query_param("start", "2024-05-01")
                .query_param("end", "2024-05-31");
            then.status(200).json_body(serde_json::json!({
                "week_labels": ["Week 1"],
                "weekly_durations": [600],
                "exercise_labels": ["squat"],
                "exercise_counts": [5],
                "recent_records": [],
                "monthly_summary": [],
                "total_duration": 600,
                "total_count": 5
            }));
        });

        let client = ApiClient::new(server.base_url());
        let stats = client
            .fetch_stats(Some(("2024-05-01", "2024-05-31")))
            .unwrap();
        assert_eq!(stats.week_labels, vec!["Week 1"]);
        assert_eq!(stats.total_count, 5);
        m.assert();
    }

    #[test]
    fn server_rejection_surfaces_status_and_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/update-record");
            then.status(400).body("invalid index");
        });

        let client = ApiClient::new(server.base_url());
        let record = Record {
            index: Some(99),
            datetime: "2024-05-01T09:30".into(),
            exercise: "squat".into(),
            reps: Some(10),
            ..Record::default()
        };
        match client.update(&record) {
            Err(ApiError::Status(400, body)) => assert_eq!(body, "invalid index"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn trailing_slash_in_base_url_is_tolerated() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET).path("/records");
            then.status(200).json_body(serde_json::json!([]));
        });

        let client = ApiClient::new(format!("{}/", server.base_url()));
        assert!(client.fetch_recent().unwrap().is_empty());
        m.assert();
    }
}
