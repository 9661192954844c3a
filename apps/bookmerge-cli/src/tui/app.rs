//! Application state and rendering for the interactive console

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Row, Table},
    Frame,
};

use bookmerge_core::{
    export_netscape_html, export_report_csv, merge_bookmarks, parse_many, DedupeConfig,
    DedupeReportEntry, Error, WindowedLevenshtein,
};

use crate::report_path_for;

/// Input mode: normal keys, or typing a file path
#[derive(Debug, PartialEq, Eq)]
enum Mode {
    Normal,
    EditingPath,
}

/// Outcome of one background merge run
struct RunOutcome {
    parsed: usize,
    merged: usize,
    report: Vec<DedupeReportEntry>,
    html_path: PathBuf,
    csv_path: PathBuf,
}

/// Main application state
pub struct App {
    mode: Mode,
    /// Files queued for the next run
    inputs: Vec<PathBuf>,
    /// Selected row in the file list
    selected: usize,
    /// Path being typed while in EditingPath mode
    path_buffer: String,
    similarity: u8,
    fuzzy: bool,
    out_path: PathBuf,
    /// Report of the last finished run
    report: Vec<DedupeReportEntry>,
    status: String,
    /// Receiver for the in-flight run, if any
    worker: Option<Receiver<Result<RunOutcome, Error>>>,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            inputs: Vec::new(),
            selected: 0,
            path_buffer: String::new(),
            similarity: 85,
            fuzzy: true,
            out_path: PathBuf::from("merged_bookmarks.html"),
            report: Vec::new(),
            status: "a: add file  d: remove  r: run  f: fuzzy  +/-: threshold  q: quit".to_string(),
            worker: None,
        }
    }

    /// Handle one key press; returns true when the app should exit
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match self.mode {
            Mode::EditingPath => {
                self.handle_path_key(code);
                false
            }
            Mode::Normal => self.handle_normal_key(code),
        }
    }

    fn handle_path_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                let path = self.path_buffer.trim();
                if !path.is_empty() {
                    self.inputs.push(PathBuf::from(path));
                    self.selected = self.inputs.len() - 1;
                }
                self.path_buffer.clear();
                self.mode = Mode::Normal;
            }
            KeyCode::Esc => {
                self.path_buffer.clear();
                self.mode = Mode::Normal;
            }
            KeyCode::Backspace => {
                self.path_buffer.pop();
            }
            KeyCode::Char(c) => self.path_buffer.push(c),
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('a') => self.mode = Mode::EditingPath,
            KeyCode::Char('d') => {
                if !self.inputs.is_empty() {
                    self.inputs.remove(self.selected);
                    self.selected = self.selected.min(self.inputs.len().saturating_sub(1));
                }
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.inputs.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('f') => self.fuzzy = !self.fuzzy,
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.similarity = (self.similarity + 1).min(100);
            }
            KeyCode::Char('-') => self.similarity = self.similarity.saturating_sub(1),
            KeyCode::Char('r') => self.start_run(),
            _ => {}
        }
        false
    }

    /// Offload one merge invocation onto a worker thread; the core call
    /// itself is synchronous, so this keeps the event loop responsive.
    fn start_run(&mut self) {
        if self.worker.is_some() {
            self.status = "A run is already in progress".to_string();
            return;
        }
        if self.inputs.is_empty() {
            self.status = "Add at least one input file first".to_string();
            return;
        }

        let inputs = self.inputs.clone();
        let config = DedupeConfig {
            similarity_threshold: self.similarity,
            enable_fuzzy: self.fuzzy,
        };
        let html_path = self.out_path.clone();
        let csv_path = report_path_for(&self.out_path);

        let (tx, rx) = mpsc::channel();
        self.worker = Some(rx);
        self.status = format!("Merging {} file(s)...", inputs.len());

        thread::spawn(move || {
            let result = run_merge(&inputs, &config, &html_path, &csv_path);
            let _ = tx.send(result);
        });
    }

    /// Pick up the worker result, if one has arrived
    pub fn poll_worker(&mut self) {
        let Some(rx) = &self.worker else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(outcome)) => {
                self.status = format!(
                    "Merged {} -> {} bookmarks; wrote {} and {}",
                    outcome.parsed,
                    outcome.merged,
                    outcome.html_path.display(),
                    outcome.csv_path.display()
                );
                self.report = outcome.report;
                self.worker = None;
            }
            Ok(Err(e)) => {
                self.status = format!("Error: {e}");
                self.worker = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.status = "Merge worker exited unexpectedly".to_string();
                self.worker = None;
            }
        }
    }

    /// Render the application
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_inputs(frame, chunks[0]);
        self.render_settings(frame, chunks[1]);
        self.render_report(frame, chunks[2]);
        self.render_status(frame, chunks[3]);
    }

    fn render_inputs(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = if self.inputs.is_empty() {
            vec![ListItem::new(Span::styled(
                "(no input files - press 'a' to add one)",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            self.inputs
                .iter()
                .enumerate()
                .map(|(i, path)| {
                    let style = if i == self.selected {
                        Style::default().add_modifier(Modifier::REVERSED)
                    } else {
                        Style::default()
                    };
                    ListItem::new(Span::styled(path.display().to_string(), style))
                })
                .collect()
        };

        let title = match self.mode {
            Mode::EditingPath => format!(" Input files - new path: {}_ ", self.path_buffer),
            Mode::Normal => " Input files ".to_string(),
        };
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(list, area);
    }

    fn render_settings(&self, frame: &mut Frame, area: Rect) {
        let fuzzy = if self.fuzzy { "on" } else { "off" };
        let line = Line::from(vec![
            Span::raw(format!("similarity: {}  ", self.similarity)),
            Span::raw(format!("fuzzy: {fuzzy}  ")),
            Span::raw(format!("output: {}", self.out_path.display())),
        ]);
        let settings =
            Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(" Settings "));
        frame.render_widget(settings, area);
    }

    fn render_report(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(["count", "title", "canonical url"])
            .style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self
            .report
            .iter()
            .map(|entry| {
                Row::new(vec![
                    entry.count.to_string(),
                    entry.title.clone(),
                    entry.canonical_url.clone(),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Percentage(40),
                Constraint::Percentage(55),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Dedupe report (last run) "),
        );
        frame.render_widget(table, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let status = Paragraph::new(self.status.as_str());
        frame.render_widget(status, area);
    }
}

fn run_merge(
    inputs: &[PathBuf],
    config: &DedupeConfig,
    html_path: &Path,
    csv_path: &Path,
) -> Result<RunOutcome, Error> {
    let collection = parse_many(inputs);
    if collection.is_empty() {
        return Err(Error::EmptyCollection);
    }

    let (merged, report) = merge_bookmarks(&collection, config, &WindowedLevenshtein);
    export_netscape_html(&merged, html_path)?;
    export_report_csv(&report, csv_path)?;

    Ok(RunOutcome {
        parsed: collection.len(),
        merged: merged.len(),
        report,
        html_path: html_path.to_path_buf(),
        csv_path: csv_path.to_path_buf(),
    })
}
