//! Application shell and persistent user settings.

use dirs_next as dirs;
use eframe::{App, Frame, NativeOptions, egui};
use egui_extras::DatePickerButton;
use egui_plot::{Legend, Plot};
use rfd::FileDialog;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use log::info;

mod api;
mod dispatch;
mod exercises;
mod export;
mod plotting;
mod record;
mod report;
mod selection;
mod stats;
mod store;
mod table;
mod videos;

use api::{ApiClient, DEFAULT_BASE_URL};
use dispatch::{DispatchError, EditDraft};
use exercises::{KNOWN_EXERCISES, rules_for};
use record::{ALL_DIRECTIONS, Direction, Record};
use selection::Selection;
use stats::{IntensityTier, StatsData, format_minutes};
use store::RecordStore;
use videos::Video;

fn default_server_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Persistent configuration, serialized to a JSON file in the platform
/// config directory. Fields added later use `#[serde(default)]` so older
/// files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Settings {
    #[serde(default = "default_server_url")]
    server_url: String,
    /// Inclusive stats date range; both must be set to take effect.
    #[serde(default)]
    start_date: Option<NaiveDate>,
    #[serde(default)]
    end_date: Option<NaiveDate>,
    /// Fetch records, stats and videos on startup.
    auto_load: bool,
    /// Force the condensed table layout regardless of window width.
    #[serde(default)]
    force_condensed: bool,
}

impl Settings {
    const FILE: &'static str = "workout_log_dashboard_settings.json";

    fn path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::FILE))
    }

    fn load() -> Self {
        if let Some(path) = Self::path() {
            if let Ok(data) = std::fs::read_to_string(&path) {
                if let Ok(cfg) = serde_json::from_str(&data) {
                    return cfg;
                }
            }
        }
        Self::default()
    }

    fn save(&self) {
        if let Some(path) = Self::path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(data) = serde_json::to_string_pretty(self) {
                let _ = std::fs::write(path, data);
            }
        }
    }

    fn stats_range(&self) -> Option<(String, String)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((
                start.format("%Y-%m-%d").to_string(),
                end.format("%Y-%m-%d").to_string(),
            )),
            _ => None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            start_date: None,
            end_date: None,
            auto_load: true,
            force_condensed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Log,
    Manage,
    Stats,
    Videos,
}

impl View {
    const ALL: [View; 4] = [View::Log, View::Manage, View::Stats, View::Videos];

    fn label(self) -> &'static str {
        match self {
            View::Log => "Log",
            View::Manage => "Manage",
            View::Stats => "Stats",
            View::Videos => "Videos",
        }
    }
}

/// Results delivered from network worker threads.
enum NetEvent {
    Records(Result<Vec<Record>, api::ApiError>),
    Recent(Result<Vec<Record>, api::ApiError>),
    Stats(Result<StatsData, api::ApiError>),
    Videos(Result<Vec<Video>, api::ApiError>),
    Notice(String),
    Failure(String),
    Done,
}

/// State of the record-entry form on the Log view.
#[derive(Debug, Clone, PartialEq)]
struct LogForm {
    datetime: String,
    exercise: String,
    reps: String,
    duration: String,
    direction: Direction,
    note: String,
}

fn now_local() -> String {
    Local::now().format("%Y-%m-%dT%H:%M").to_string()
}

impl Default for LogForm {
    fn default() -> Self {
        Self {
            datetime: now_local(),
            exercise: "push-up".into(),
            reps: String::new(),
            duration: String::new(),
            direction: Direction::Both,
            note: String::new(),
        }
    }
}

impl LogForm {
    /// Build the save payload. Inputs are coerced, not validated: numbers
    /// that fail to parse become zero, and fields the exercise does not
    /// use are stripped.
    fn build_record(&self) -> Record {
        let mut record = Record {
            index: None,
            datetime: self.datetime.trim().to_string(),
            exercise: self.exercise.clone(),
            reps: Some(self.reps.trim().parse().unwrap_or(0)),
            duration: Some(self.duration.trim().parse().unwrap_or(0)),
            direction: Some(self.direction),
            note: {
                let note = self.note.trim();
                (!note.is_empty()).then(|| note.to_string())
            },
        };
        record.apply_field_rules();
        record
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

struct EditState {
    index: u32,
    draft: EditDraft,
}

struct VideoEdit {
    original: Video,
    title: String,
    exercise: String,
    url: String,
}

#[derive(Debug, Clone, Default)]
struct VideoForm {
    title: String,
    exercise: String,
    url: String,
}

struct Toast {
    message: String,
    error: bool,
    since: Instant,
}

struct LogApp {
    settings: Settings,
    settings_dirty: bool,
    show_settings: bool,
    view: View,
    store: RecordStore,
    selection: Selection,
    recent: Vec<Record>,
    stats: Option<StatsData>,
    stats_error: Option<String>,
    videos: Vec<Video>,
    videos_error: Option<String>,
    log_form: LogForm,
    video_form: VideoForm,
    edit: Option<EditState>,
    video_edit: Option<VideoEdit>,
    /// Indices awaiting the non-blocking delete confirmation.
    pending_delete: Option<Vec<u32>>,
    toast: Option<Toast>,
    in_flight: usize,
    tx: Sender<NetEvent>,
    rx: Receiver<NetEvent>,
}

impl LogApp {
    fn new() -> Self {
        let settings = Settings::load();
        let (tx, rx) = channel();
        let mut app = Self {
            settings,
            settings_dirty: false,
            show_settings: false,
            view: View::Log,
            store: RecordStore::new(),
            selection: Selection::default(),
            recent: Vec::new(),
            stats: None,
            stats_error: None,
            videos: Vec::new(),
            videos_error: None,
            log_form: LogForm::default(),
            video_form: VideoForm::default(),
            edit: None,
            video_edit: None,
            pending_delete: None,
            toast: None,
            in_flight: 0,
            tx,
            rx,
        };
        if app.settings.auto_load {
            app.refresh_all();
        }
        app
    }

    fn client(&self) -> ApiClient {
        ApiClient::new(self.settings.server_url.clone())
    }

    fn spawn(&mut self, job: impl FnOnce(&ApiClient, &Sender<NetEvent>) + Send + 'static) {
        let client = self.client();
        let tx = self.tx.clone();
        self.in_flight += 1;
        std::thread::spawn(move || {
            job(&client, &tx);
            let _ = tx.send(NetEvent::Done);
        });
    }

    fn refresh_records(&mut self) {
        self.spawn(|client, tx| {
            let _ = tx.send(NetEvent::Records(client.fetch_all()));
        });
    }

    fn refresh_recent(&mut self) {
        self.spawn(|client, tx| {
            let _ = tx.send(NetEvent::Recent(client.fetch_recent()));
        });
    }

    fn refresh_stats(&mut self) {
        let range = self.settings.stats_range();
        self.spawn(move |client, tx| {
            let result = client.fetch_stats(range.as_ref().map(|(s, e)| (s.as_str(), e.as_str())));
            let _ = tx.send(NetEvent::Stats(result));
        });
    }

    fn refresh_videos(&mut self) {
        self.spawn(|client, tx| {
            let _ = tx.send(NetEvent::Videos(client.fetch_videos()));
        });
    }

    fn refresh_all(&mut self) {
        self.refresh_records();
        self.refresh_recent();
        self.refresh_stats();
        self.refresh_videos();
    }

    fn toast_notice(&mut self, message: String) {
        self.toast = Some(Toast {
            message,
            error: false,
            since: Instant::now(),
        });
    }

    fn toast_error(&mut self, message: String) {
        log::warn!("{message}");
        self.toast = Some(Toast {
            message,
            error: true,
            since: Instant::now(),
        });
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                NetEvent::Records(Ok(records)) => {
                    info!("loaded {} records", records.len());
                    self.store.replace(records);
                    // a rebuilt table invalidates any prior selection
                    self.selection.clear();
                }
                NetEvent::Records(Err(e)) => self.store.fail(e.to_string()),
                NetEvent::Recent(Ok(records)) => self.recent = records,
                NetEvent::Recent(Err(e)) => {
                    self.toast_error(format!("Failed to load recent records: {e}"));
                }
                NetEvent::Stats(Ok(stats)) => {
                    self.stats = Some(stats);
                    self.stats_error = None;
                }
                NetEvent::Stats(Err(e)) => self.stats_error = Some(e.to_string()),
                NetEvent::Videos(Ok(videos)) => {
                    self.videos = videos;
                    self.videos_error = None;
                }
                NetEvent::Videos(Err(e)) => self.videos_error = Some(e.to_string()),
                NetEvent::Notice(msg) => self.toast_notice(msg),
                NetEvent::Failure(msg) => self.toast_error(msg),
                NetEvent::Done => self.in_flight = self.in_flight.saturating_sub(1),
            }
        }
    }

    fn submit_log(&mut self) {
        let record = self.log_form.build_record();
        info!("saving {} at {}", record.exercise, record.datetime);
        self.spawn(move |client, tx| {
            match client.save(&record) {
                Ok(()) => {
                    let _ = tx.send(NetEvent::Notice("Record saved".into()));
                }
                Err(e) => {
                    let _ = tx.send(NetEvent::Failure(format!("Save failed: {e}")));
                }
            }
            let _ = tx.send(NetEvent::Recent(client.fetch_recent()));
            let _ = tx.send(NetEvent::Records(client.fetch_all()));
        });
        self.log_form.reset();
    }

    fn request_delete(&mut self) {
        let indices = self.selection.indices();
        if indices.is_empty() {
            self.toast_error(DispatchError::NothingSelected.to_string());
            return;
        }
        self.pending_delete = Some(indices);
    }

    fn confirm_delete(&mut self, indices: Vec<u32>) {
        self.spawn(move |client, tx| {
            match dispatch::delete_many(client, &indices) {
                Ok(report) if report.all_ok() => {
                    let _ = tx.send(NetEvent::Notice(format!(
                        "Deleted {} record(s)",
                        report.deleted()
                    )));
                }
                Ok(report) => {
                    let _ = tx.send(NetEvent::Failure(format!(
                        "Deleted {}, {} failed",
                        report.deleted(),
                        report.failed.len()
                    )));
                }
                Err(e) => {
                    let _ = tx.send(NetEvent::Failure(format!("Delete failed: {e}")));
                }
            }
            let _ = tx.send(NetEvent::Records(client.fetch_all()));
        });
    }

    fn request_edit(&mut self) {
        let indices = self.selection.indices();
        match indices.as_slice() {
            [] => self.toast_error(DispatchError::NothingSelected.to_string()),
            [index] => {
                if let Some(record) = self.store.find(*index) {
                    self.edit = Some(EditState {
                        index: *index,
                        draft: EditDraft::from_record(record),
                    });
                } else {
                    self.toast_error(DispatchError::UnknownIndex(*index).to_string());
                }
            }
            many => {
                self.toast_error(DispatchError::MultipleSelected(many.len()).to_string());
            }
        }
    }

    fn submit_edit(&mut self, index: u32, draft: EditDraft) {
        let records = self.store.records().to_vec();
        self.spawn(move |client, tx| {
            match dispatch::edit_one(client, &records, &[index], &draft) {
                Ok(_) => {
                    let _ = tx.send(NetEvent::Notice("Record updated".into()));
                }
                Err(e) => {
                    let _ = tx.send(NetEvent::Failure(format!("Edit failed: {e}")));
                }
            }
            let _ = tx.send(NetEvent::Records(client.fetch_all()));
        });
    }

    fn submit_video(&mut self) {
        if self.video_form.url.trim().is_empty() {
            self.toast_error("A YouTube URL is required".into());
            return;
        }
        let form = std::mem::take(&mut self.video_form);
        self.spawn(move |client, tx| {
            match client.add_video(form.title.trim(), form.exercise.trim(), form.url.trim()) {
                Ok(()) => {
                    let _ = tx.send(NetEvent::Notice("Video added".into()));
                }
                Err(e) => {
                    let _ = tx.send(NetEvent::Failure(format!("Add video failed: {e}")));
                }
            }
            let _ = tx.send(NetEvent::Videos(client.fetch_videos()));
        });
    }

    fn submit_video_edit(&mut self, edit: VideoEdit) {
        let url = edit.url.trim();
        let updated = Video {
            index: edit.original.index,
            title: Some(edit.title.trim().to_string()),
            exercise: Some(edit.exercise.trim().to_string()),
            kind: edit.original.kind,
            url: (!url.is_empty()).then(|| url.to_string()),
            path: edit.original.path.clone(),
        };
        self.spawn(move |client, tx| {
            match client.update_video(&updated) {
                Ok(()) => {
                    let _ = tx.send(NetEvent::Notice("Video updated".into()));
                }
                Err(e) => {
                    let _ = tx.send(NetEvent::Failure(format!("Update video failed: {e}")));
                }
            }
            let _ = tx.send(NetEvent::Videos(client.fetch_videos()));
        });
    }

    fn delete_video(&mut self, index: u32) {
        self.spawn(move |client, tx| {
            match client.delete_video(index) {
                Ok(()) => {
                    let _ = tx.send(NetEvent::Notice("Video deleted".into()));
                }
                Err(e) => {
                    let _ = tx.send(NetEvent::Failure(format!("Delete video failed: {e}")));
                }
            }
            let _ = tx.send(NetEvent::Videos(client.fetch_videos()));
        });
    }

    fn export_records_csv(&mut self) {
        if let Some(path) = FileDialog::new().add_filter("CSV", &["csv"]).save_file() {
            match export::save_records_csv(&path, self.store.records()) {
                Ok(()) => self.toast_notice(format!("Saved {} record(s)", self.store.len())),
                Err(e) => self.toast_error(format!("Export failed: {e}")),
            }
        }
    }

    fn export_records_json(&mut self) {
        if let Some(path) = FileDialog::new().add_filter("JSON", &["json"]).save_file() {
            match export::save_records_json(&path, self.store.records()) {
                Ok(()) => self.toast_notice(format!("Saved {} record(s)", self.store.len())),
                Err(e) => self.toast_error(format!("Export failed: {e}")),
            }
        }
    }

    fn export_server_csv(&mut self) {
        if let Some(path) = FileDialog::new().add_filter("CSV", &["csv"]).save_file() {
            self.spawn(move |client, tx| {
                let result = client
                    .export_csv()
                    .map_err(|e| e.to_string())
                    .and_then(|bytes| {
                        export::save_server_csv(&path, &bytes).map_err(|e| e.to_string())
                    });
                let _ = tx.send(match result {
                    Ok(()) => NetEvent::Notice("Server CSV saved".into()),
                    Err(e) => NetEvent::Failure(format!("Server export failed: {e}")),
                });
            });
        }
    }

    fn export_report(&mut self) {
        let Some(stats) = self.stats.clone() else {
            self.toast_error("Load stats before exporting a report".into());
            return;
        };
        if let Some(path) = FileDialog::new().add_filter("HTML", &["html"]).save_file() {
            match report::export_html_report(&path, self.store.records(), &stats) {
                Ok(()) => self.toast_notice(format!("Report written to {}", path.display())),
                Err(e) => self.toast_error(format!("Report failed: {e}")),
            }
        }
    }

    fn log_view(&mut self, ui: &mut egui::Ui) {
        ui.heading("Log an exercise");
        let rules = rules_for(&self.log_form.exercise);
        egui::Grid::new("log_form_grid").num_columns(2).show(ui, |ui| {
            ui.label("Datetime");
            ui.text_edit_singleline(&mut self.log_form.datetime);
            ui.end_row();

            ui.label("Exercise");
            egui::ComboBox::from_id_source("log_exercise")
                .selected_text(self.log_form.exercise.clone())
                .show_ui(ui, |ui| {
                    for name in KNOWN_EXERCISES {
                        ui.selectable_value(&mut self.log_form.exercise, name.to_string(), name);
                    }
                });
            ui.end_row();

            if rules.reps {
                ui.label("Reps");
                ui.text_edit_singleline(&mut self.log_form.reps);
                ui.end_row();
            }
            if rules.duration {
                ui.label("Duration (seconds)");
                ui.text_edit_singleline(&mut self.log_form.duration);
                ui.end_row();
            }
            if rules.direction {
                ui.label("Direction");
                egui::ComboBox::from_id_source("log_direction")
                    .selected_text(self.log_form.direction.label())
                    .show_ui(ui, |ui| {
                        for d in ALL_DIRECTIONS {
                            ui.selectable_value(&mut self.log_form.direction, d, d.label());
                        }
                    });
                ui.end_row();
            }

            ui.label("Note");
            ui.text_edit_singleline(&mut self.log_form.note);
            ui.end_row();
        });
        if ui.button("Save").clicked() {
            self.submit_log();
        }

        ui.separator();
        ui.heading("Recent records");
        if self.recent.is_empty() {
            ui.label("No recent records.");
        } else {
            egui::ScrollArea::vertical().show(ui, |ui| {
                for r in &self.recent {
                    let mut line = format!("{} | {}", r.datetime, r.summary());
                    if let Some(note) = r.note.as_deref() {
                        line.push_str(&format!(" - {note}"));
                    }
                    ui.label(line);
                }
            });
        }
    }

    fn manage_view(&mut self, ui: &mut egui::Ui) {
        #[derive(PartialEq)]
        enum Action {
            None,
            Refresh,
            Edit,
            Delete,
        }
        let mut action = Action::None;

        ui.horizontal(|ui| {
            if ui.button("Refresh").clicked() {
                action = Action::Refresh;
            }
            if ui.button("Edit").clicked() {
                action = Action::Edit;
            }
            if ui.button("Delete").clicked() {
                action = Action::Delete;
            }
            ui.label(format!(
                "{} record(s), {} selected",
                self.store.len(),
                self.selection.len()
            ));
        });

        if let Some(err) = self.store.last_error() {
            ui.colored_label(
                egui::Color32::RED,
                format!("Load failed: {err} (showing last known records)"),
            );
        }

        if self.store.is_empty() {
            ui.label("No records.");
        } else {
            let width = if self.settings.force_condensed {
                table::MOBILE_BREAKPOINT
            } else {
                ui.available_width()
            };
            let model = table::build_table(self.store.records(), width);
            let selection = &mut self.selection;
            let line_height = ui.text_style_height(&egui::TextStyle::Body);
            egui_extras::TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .column(egui_extras::Column::auto())
                .columns(egui_extras::Column::auto(), model.columns.len())
                .header(line_height, |mut header| {
                    header.col(|ui| {
                        ui.label("Select");
                    });
                    for col in model.columns {
                        header.col(|ui| {
                            ui.label(*col);
                        });
                    }
                })
                .body(|mut body| {
                    for row in &model.rows {
                        // condensed cells span several lines
                        let lines = row
                            .cells
                            .iter()
                            .map(|c| c.lines().count().max(1))
                            .max()
                            .unwrap_or(1);
                        body.row(line_height * lines as f32, |mut table_row| {
                            table_row.col(|ui| {
                                if let Some(index) = row.index {
                                    let mut checked = selection.contains(index);
                                    if ui.checkbox(&mut checked, "").changed() {
                                        selection.toggle(index);
                                    }
                                }
                            });
                            for cell in &row.cells {
                                table_row.col(|ui| {
                                    ui.label(cell);
                                });
                            }
                        });
                    }
                });
        }

        match action {
            Action::None => {}
            Action::Refresh => self.refresh_records(),
            Action::Edit => self.request_edit(),
            Action::Delete => self.request_delete(),
        }
    }

    fn stats_view(&mut self, ui: &mut egui::Ui) {
        let mut apply = false;
        let mut clear = false;
        ui.horizontal(|ui| {
            ui.label("Start:");
            let mut start = self
                .settings
                .start_date
                .unwrap_or_else(|| Local::now().date_naive());
            if ui
                .add(DatePickerButton::new(&mut start).id_source("stats_start"))
                .changed()
            {
                self.settings.start_date = Some(start);
                self.settings_dirty = true;
            }
            ui.label("End:");
            let mut end = self
                .settings
                .end_date
                .unwrap_or_else(|| Local::now().date_naive());
            if ui
                .add(DatePickerButton::new(&mut end).id_source("stats_end"))
                .changed()
            {
                self.settings.end_date = Some(end);
                self.settings_dirty = true;
            }
            if ui.button("Apply").clicked() {
                apply = true;
            }
            if (self.settings.start_date.is_some() || self.settings.end_date.is_some())
                && ui.button("Clear").clicked()
            {
                clear = true;
            }
        });
        if clear {
            self.settings.start_date = None;
            self.settings.end_date = None;
            self.settings_dirty = true;
            self.refresh_stats();
        } else if apply {
            self.refresh_stats();
        }

        if let Some(err) = &self.stats_error {
            ui.colored_label(egui::Color32::RED, format!("Stats load failed: {err}"));
        }
        let Some(stats) = &self.stats else {
            ui.label("No stats loaded yet.");
            return;
        };

        ui.horizontal(|ui| {
            ui.label(format!(
                "Total duration: {} min",
                format_minutes(stats.total_duration)
            ));
            ui.separator();
            ui.label(format!("Total count: {}", stats.total_count));
        });

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading("Weekly duration");
            let week_labels = stats.week_labels.clone();
            Plot::new("weekly_duration_plot")
                .height(200.0)
                .legend(Legend::default())
                .x_axis_formatter(move |mark, _chars, _| {
                    plotting::label_at(&week_labels, mark.value)
                })
                .show(ui, |plot_ui| {
                    plot_ui.line(plotting::weekly_duration_line(stats));
                });

            ui.heading("Exercise frequency");
            let exercise_labels = stats.exercise_labels.clone();
            Plot::new("exercise_freq_plot")
                .height(200.0)
                .legend(Legend::default())
                .x_axis_formatter(move |mark, _chars, _| {
                    plotting::label_at(&exercise_labels, mark.value)
                })
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(plotting::exercise_count_chart(stats));
                });

            ui.heading("Total reps per month");
            let months: Vec<String> = stats
                .monthly_summary
                .iter()
                .map(|row| row.month.clone())
                .collect();
            Plot::new("monthly_reps_plot")
                .height(200.0)
                .legend(Legend::default())
                .x_axis_formatter(move |mark, _chars, _| plotting::label_at(&months, mark.value))
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(plotting::monthly_reps_chart(stats));
                });

            ui.heading("Recent records");
            if stats.recent_records.is_empty() {
                ui.label("No recent records.");
            } else {
                egui::Grid::new("stats_recent_grid").striped(true).show(ui, |ui| {
                    for col in table::FULL_COLUMNS {
                        ui.label(col);
                    }
                    ui.end_row();
                    for r in &stats.recent_records {
                        ui.label(&r.datetime);
                        ui.label(&r.exercise);
                        ui.label(r.reps.map(|v| v.to_string()).unwrap_or_else(|| "-".into()));
                        ui.label(
                            r.duration
                                .map(|v| v.to_string())
                                .unwrap_or_else(|| "-".into()),
                        );
                        ui.label(r.direction.map(|d| d.label()).unwrap_or("-"));
                        ui.label(r.note.as_deref().unwrap_or(""));
                        ui.end_row();
                    }
                });
            }

            ui.heading("Monthly summary");
            if stats.monthly_summary.is_empty() {
                ui.label("No data available for selected range.");
            } else {
                egui::Grid::new("monthly_summary_grid")
                    .striped(true)
                    .show(ui, |ui| {
                        ui.label("Month");
                        ui.label("Push-ups");
                        ui.label("Squats");
                        ui.label("Total Reps");
                        ui.label("Intensity Level");
                        ui.label("Calories Burned");
                        ui.end_row();
                        for row in &stats.monthly_summary {
                            let tier = IntensityTier::for_score(row.intensity);
                            ui.label(&row.month);
                            ui.label(row.reps_for("push-up").to_string());
                            ui.label(row.reps_for("squat").to_string());
                            ui.label(row.total_reps.to_string());
                            ui.colored_label(tier.color(), tier.label());
                            ui.label(format!("{:.1}", row.calories));
                            ui.end_row();
                        }
                    });
            }
        });
    }

    fn videos_view(&mut self, ui: &mut egui::Ui) {
        enum Action {
            Open(String),
            Edit(usize),
            Delete(u32),
            Refresh,
        }
        let mut action: Option<Action> = None;

        ui.heading("Add a video");
        egui::Grid::new("video_form_grid").num_columns(2).show(ui, |ui| {
            ui.label("Title");
            ui.text_edit_singleline(&mut self.video_form.title);
            ui.end_row();
            ui.label("Exercise");
            ui.text_edit_singleline(&mut self.video_form.exercise);
            ui.end_row();
            ui.label("YouTube URL");
            ui.text_edit_singleline(&mut self.video_form.url);
            ui.end_row();
        });
        if ui.button("Add").clicked() {
            self.submit_video();
        }

        ui.separator();
        ui.horizontal(|ui| {
            ui.heading("Library");
            if ui.button("Refresh").clicked() {
                action = Some(Action::Refresh);
            }
        });
        if let Some(err) = &self.videos_error {
            ui.colored_label(egui::Color32::RED, format!("Video load failed: {err}"));
        }
        if self.videos.is_empty() {
            ui.label("No videos.");
        } else {
            let base_url = self.settings.server_url.trim_end_matches('/').to_string();
            egui::Grid::new("video_grid").striped(true).show(ui, |ui| {
                for (pos, video) in self.videos.iter().enumerate() {
                    ui.label(video.title());
                    ui.label(video.exercise());
                    if let Some(url) = video.watch_url(&base_url) {
                        if ui.button("Open").clicked() {
                            action = Some(Action::Open(url));
                        }
                    } else {
                        ui.label("-");
                    }
                    if ui.button("Edit").clicked() {
                        action = Some(Action::Edit(pos));
                    }
                    if let Some(index) = video.index {
                        if ui.button("Delete").clicked() {
                            action = Some(Action::Delete(index));
                        }
                    }
                    ui.end_row();
                }
            });
        }

        match action {
            None => {}
            Some(Action::Refresh) => self.refresh_videos(),
            Some(Action::Open(url)) => {
                if let Err(e) = open::that(&url) {
                    self.toast_error(format!("Failed to open {url}: {e}"));
                }
            }
            Some(Action::Edit(pos)) => {
                if let Some(video) = self.videos.get(pos) {
                    self.video_edit = Some(VideoEdit {
                        title: video.title.clone().unwrap_or_default(),
                        exercise: video.exercise.clone().unwrap_or_default(),
                        url: video.url.clone().unwrap_or_default(),
                        original: video.clone(),
                    });
                }
            }
            Some(Action::Delete(index)) => self.delete_video(index),
        }
    }

    fn edit_window(&mut self, ctx: &egui::Context) {
        let Some(mut edit) = self.edit.take() else {
            return;
        };
        let mut open = true;
        let mut submit = false;
        let mut cancel = false;
        egui::Window::new("Edit Record")
            .open(&mut open)
            .collapsible(false)
            .show(ctx, |ui| {
                let rules = rules_for(&edit.draft.exercise);
                egui::Grid::new("edit_grid").num_columns(2).show(ui, |ui| {
                    ui.label("Datetime");
                    ui.text_edit_singleline(&mut edit.draft.datetime);
                    ui.end_row();

                    ui.label("Exercise");
                    egui::ComboBox::from_id_source("edit_exercise")
                        .selected_text(edit.draft.exercise.clone())
                        .show_ui(ui, |ui| {
                            for name in KNOWN_EXERCISES {
                                ui.selectable_value(
                                    &mut edit.draft.exercise,
                                    name.to_string(),
                                    name,
                                );
                            }
                        });
                    ui.end_row();

                    if rules.reps {
                        ui.label("Reps");
                        ui.text_edit_singleline(&mut edit.draft.reps);
                        ui.end_row();
                    }
                    if rules.duration {
                        ui.label("Duration (seconds)");
                        ui.text_edit_singleline(&mut edit.draft.duration);
                        ui.end_row();
                    }
                    if rules.direction {
                        ui.label("Direction");
                        let current = edit.draft.direction.unwrap_or(Direction::Both);
                        egui::ComboBox::from_id_source("edit_direction")
                            .selected_text(current.label())
                            .show_ui(ui, |ui| {
                                for d in ALL_DIRECTIONS {
                                    ui.selectable_value(
                                        &mut edit.draft.direction,
                                        Some(d),
                                        d.label(),
                                    );
                                }
                            });
                        ui.end_row();
                    }

                    ui.label("Note");
                    ui.text_edit_singleline(&mut edit.draft.note);
                    ui.end_row();
                });
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        submit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });
        if submit {
            self.submit_edit(edit.index, edit.draft);
        } else if open && !cancel {
            self.edit = Some(edit);
        }
    }

    fn video_edit_window(&mut self, ctx: &egui::Context) {
        let Some(mut edit) = self.video_edit.take() else {
            return;
        };
        let mut open = true;
        let mut submit = false;
        let mut cancel = false;
        egui::Window::new("Edit Video")
            .open(&mut open)
            .collapsible(false)
            .show(ctx, |ui| {
                egui::Grid::new("video_edit_grid").num_columns(2).show(ui, |ui| {
                    ui.label("Title");
                    ui.text_edit_singleline(&mut edit.title);
                    ui.end_row();
                    ui.label("Exercise");
                    ui.text_edit_singleline(&mut edit.exercise);
                    ui.end_row();
                    ui.label("URL");
                    ui.text_edit_singleline(&mut edit.url);
                    ui.end_row();
                });
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        submit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });
        if submit {
            self.submit_video_edit(edit);
        } else if open && !cancel {
            self.video_edit = Some(edit);
        }
    }

    fn delete_confirm_window(&mut self, ctx: &egui::Context) {
        let Some(indices) = self.pending_delete.take() else {
            return;
        };
        let mut open = true;
        let mut confirm = false;
        let mut cancel = false;
        egui::Window::new("Confirm Delete")
            .open(&mut open)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.label(format!("Delete {} selected record(s)?", indices.len()));
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        confirm = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });
        if confirm {
            self.confirm_delete(indices);
        } else if open && !cancel {
            self.pending_delete = Some(indices);
        }
    }

    fn settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.show_settings;
        egui::Window::new("Settings")
            .open(&mut open)
            .collapsible(false)
            .show(ctx, |ui| {
                egui::Grid::new("settings_grid").num_columns(2).show(ui, |ui| {
                    ui.label("Server URL");
                    if ui
                        .text_edit_singleline(&mut self.settings.server_url)
                        .changed()
                    {
                        self.settings_dirty = true;
                    }
                    ui.end_row();

                    ui.label("Load on startup");
                    if ui.checkbox(&mut self.settings.auto_load, "").changed() {
                        self.settings_dirty = true;
                    }
                    ui.end_row();

                    ui.label("Condensed table");
                    if ui
                        .checkbox(&mut self.settings.force_condensed, "")
                        .changed()
                    {
                        self.settings_dirty = true;
                    }
                    ui.end_row();
                });
            });
        self.show_settings = open;
    }

    fn toast_area(&mut self, ctx: &egui::Context) {
        if let Some(toast) = &self.toast {
            if toast.since.elapsed() < Duration::from_secs(3) {
                let color = if toast.error {
                    egui::Color32::RED
                } else {
                    egui::Color32::LIGHT_GREEN
                };
                let message = toast.message.clone();
                egui::Area::new(egui::Id::new("notice_toast"))
                    .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
                    .show(ctx, |ui| {
                        ui.colored_label(color, message);
                    });
            } else {
                self.toast = None;
            }
        }
    }
}

impl App for LogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.drain_events();
        if self.in_flight > 0 {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Settings").clicked() {
                        self.show_settings = true;
                        ui.close_menu();
                    }
                    if ui.button("Refresh All").clicked() {
                        self.refresh_all();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Export Records (CSV)").clicked() {
                        self.export_records_csv();
                        ui.close_menu();
                    }
                    if ui.button("Export Records (JSON)").clicked() {
                        self.export_records_json();
                        ui.close_menu();
                    }
                    if ui.button("Export Server CSV").clicked() {
                        self.export_server_csv();
                        ui.close_menu();
                    }
                    if ui.button("HTML Report").clicked() {
                        self.export_report();
                        ui.close_menu();
                    }
                });
                ui.separator();
                for view in View::ALL {
                    ui.selectable_value(&mut self.view, view, view.label());
                }
                if self.in_flight > 0 {
                    ui.separator();
                    ui.label("Refreshing…");
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.view {
            View::Log => self.log_view(ui),
            View::Manage => self.manage_view(ui),
            View::Stats => self.stats_view(ui),
            View::Videos => self.videos_view(ui),
        });

        self.edit_window(ctx);
        self.video_edit_window(ctx);
        self.delete_confirm_window(ctx);
        self.settings_window(ctx);
        self.toast_area(ctx);

        if self.settings_dirty {
            self.settings.save();
            self.settings_dirty = false;
        }
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let options = NativeOptions::default();
    eframe::run_native(
        "Workout Log Dashboard",
        options,
        Box::new(|_cc| Box::new(LogApp::new())),
    )
}
