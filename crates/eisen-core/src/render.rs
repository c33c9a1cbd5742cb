use std::io::{self, IsTerminal, Write};

use eisen_matrix::{CellRegistry, TaskBoard};
use unicode_width::UnicodeWidthStr;

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color = cfg.get_bool("color")?.unwrap_or(true);
        Ok(Self { color })
    }

    /// One table per cell, in registry order. Indices are 1-based to match
    /// what the commands accept.
    #[tracing::instrument(skip_all)]
    pub fn print_matrix(&mut self, cells: &CellRegistry, board: &TaskBoard) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_matrix(&mut out, cells, board)
    }

    #[tracing::instrument(skip_all)]
    pub fn print_cells(&mut self, cells: &CellRegistry, board: &TaskBoard) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let headers = vec![
            "Key".to_string(),
            "Cell".to_string(),
            "Title".to_string(),
            "Open".to_string(),
            "Done".to_string(),
        ];
        let rows = cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let tasks = board.tasks(&cell.id);
                let done = tasks
                    .map(|tasks| tasks.iter().filter(|task| task.done).count())
                    .unwrap_or(0);
                let total = tasks.map(|tasks| tasks.len()).unwrap_or(0);
                vec![
                    self.paint(&format!("{}", idx + 1), "33"),
                    cell.id.to_string(),
                    cell.title.clone(),
                    (total - done).to_string(),
                    done.to_string(),
                ]
            })
            .collect();

        write_table(&mut out, headers, rows)
    }

    pub fn write_matrix<W: Write>(
        &self,
        mut out: W,
        cells: &CellRegistry,
        board: &TaskBoard,
    ) -> anyhow::Result<()> {
        for (idx, cell) in cells.iter().enumerate() {
            if idx > 0 {
                writeln!(out)?;
            }
            writeln!(out, "{}", self.paint(&format!("[{}] {}", idx + 1, cell.title), "1"))?;

            let Some(tasks) = board.tasks(&cell.id).filter(|tasks| !tasks.is_empty()) else {
                writeln!(out, "  (empty)")?;
                continue;
            };

            let headers = vec!["#".to_string(), "Done".to_string(), "Task".to_string()];
            let rows = tasks
                .iter()
                .enumerate()
                .map(|(pos, task)| {
                    let text = if task.done {
                        self.paint(&task.text, "2")
                    } else {
                        task.text.clone()
                    };
                    vec![
                        self.paint(&format!("{}", pos + 1), "33"),
                        if task.done { "x" } else { " " }.to_string(),
                        text,
                    ]
                })
                .collect();
            write_table(&mut out, headers, rows)?;
        }
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
