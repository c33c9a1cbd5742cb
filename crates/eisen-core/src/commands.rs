use std::fs;
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use chrono::{DateTime, Local, Utc};
use eisen_matrix::storage::{self, UNDO_KEY};
use eisen_matrix::{
    CellId, DragEnd, DragLocation, DragOutcome, ManualScheduler, Matrix, PendingUndo,
    StorageAdapter, TaskId, UndoController, on_drag_end,
};
use tracing::{debug, info, instrument};

use crate::cli::Invocation;
use crate::config::Config;
use crate::render::Renderer;

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "list", "cells", "add", "done", "move", "delete", "undo", "rename", "export", "_commands",
        "_show", "help", "version",
    ]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[instrument(skip(matrix, cfg, renderer, inv))]
pub fn dispatch<S: StorageAdapter>(
    matrix: &mut Matrix<S>,
    cfg: &Config,
    renderer: &mut Renderer,
    inv: Invocation,
) -> anyhow::Result<()> {
    let now = Utc::now();
    let command = inv.command.as_str();
    let args = inv.command_args.as_slice();

    debug!(command, args = ?args, "dispatching command");

    match command {
        "list" => renderer.print_matrix(matrix.cells(), matrix.board()),
        "cells" => renderer.print_cells(matrix.cells(), matrix.board()),
        "add" => cmd_add(matrix, args),
        "done" => cmd_done(matrix, args),
        "move" => cmd_move(matrix, args),
        "delete" => cmd_delete(matrix, cfg, args, now),
        "undo" => cmd_undo(matrix, cfg, now),
        "rename" => cmd_rename(matrix, args),
        "export" => cmd_export(matrix, args),
        "_commands" => {
            for command in known_command_names() {
                println!("{command}");
            }
            Ok(())
        }
        "_show" => {
            let mut pairs: Vec<_> = cfg.iter().collect();
            pairs.sort();
            for (k, v) in pairs {
                println!("{k}={v}");
            }
            Ok(())
        }
        "help" => cmd_help(),
        "version" => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => Err(anyhow!("unknown command: {other}")),
    }
}

#[instrument(skip(matrix, args))]
fn cmd_add<S: StorageAdapter>(matrix: &mut Matrix<S>, args: &[String]) -> anyhow::Result<()> {
    info!("command add");

    let (cell_arg, text) = args
        .split_first()
        .ok_or_else(|| anyhow!("usage: add CELL TEXT..."))?;
    let cell = parse_cell(cell_arg)?;
    let text = text.join(" ");

    matrix.add_task(&cell, &text)?;
    let position = matrix.board().tasks(&cell).map(|tasks| tasks.len()).unwrap_or(0);
    println!("Added task {position} to {}.", title_of(matrix, &cell));
    Ok(())
}

#[instrument(skip(matrix, args))]
fn cmd_done<S: StorageAdapter>(matrix: &mut Matrix<S>, args: &[String]) -> anyhow::Result<()> {
    info!("command done");

    let [cell_arg, index_arg] = args else {
        return Err(anyhow!("usage: done CELL INDEX"));
    };
    let cell = parse_cell(cell_arg)?;
    let index = parse_index(index_arg)?;
    let id = task_at(matrix, &cell, index)?;

    if matrix.toggle_done(&cell, id)? {
        println!("Completed task {}.", index + 1);
    } else {
        println!("Reopened task {}.", index + 1);
    }
    Ok(())
}

#[instrument(skip(matrix, args))]
fn cmd_move<S: StorageAdapter>(matrix: &mut Matrix<S>, args: &[String]) -> anyhow::Result<()> {
    info!("command move");

    let [from_arg, to_arg] = args else {
        return Err(anyhow!("usage: move CELL:INDEX CELL[:INDEX]"));
    };
    let source = parse_location(from_arg)?
        .ok_or_else(|| anyhow!("source needs an index: {from_arg}"))?;
    let destination = match parse_location(to_arg)? {
        Some(location) => location,
        None => {
            // A bare destination cell appends.
            let cell = parse_cell(to_arg)?;
            let len = matrix.board().tasks(&cell).map(|tasks| tasks.len()).unwrap_or(0);
            DragLocation::new(cell, len)
        }
    };

    let outcome = on_drag_end(
        matrix,
        DragEnd {
            source,
            destination: Some(destination),
        },
    )?;
    match outcome {
        DragOutcome::Reordered => println!("Reordered task."),
        DragOutcome::Moved => println!("Moved task."),
        DragOutcome::Cancelled => println!("Nothing moved."),
    }
    Ok(())
}

#[instrument(skip(matrix, cfg, args, now))]
fn cmd_delete<S: StorageAdapter>(
    matrix: &mut Matrix<S>,
    cfg: &Config,
    args: &[String],
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command delete");

    let [cell_arg, index_arg] = args else {
        return Err(anyhow!("usage: delete CELL INDEX"));
    };
    let cell = parse_cell(cell_arg)?;
    let index = parse_index(index_arg)?;
    let id = task_at(matrix, &cell, index)?;

    let mut undo = resume_undo(matrix, cfg, now)?;
    let deleted = matrix.delete_task(&cell, id)?;
    let text = deleted.task.text.clone();
    undo.on_delete(deleted, now);

    if let Some(pending) = undo.pending() {
        storage::save(matrix.storage_mut(), UNDO_KEY, pending)
            .context("failed to record undo slot")?;
    }

    println!(
        "Deleted \"{text}\". Run `eisen undo` within {}s to restore it.",
        undo.window().as_secs()
    );
    Ok(())
}

#[instrument(skip(matrix, cfg, now))]
fn cmd_undo<S: StorageAdapter>(
    matrix: &mut Matrix<S>,
    cfg: &Config,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command undo");

    let mut undo = resume_undo(matrix, cfg, now)?;
    let restored = undo.restore(matrix)?;
    matrix
        .storage_mut()
        .remove(UNDO_KEY)
        .context("failed to clear undo slot")?;

    match restored {
        Some(index) => println!("Restored task {}.", index + 1),
        None => println!("Nothing to undo."),
    }
    Ok(())
}

#[instrument(skip(matrix, args))]
fn cmd_rename<S: StorageAdapter>(matrix: &mut Matrix<S>, args: &[String]) -> anyhow::Result<()> {
    info!("command rename");

    let (cell_arg, title) = args
        .split_first()
        .ok_or_else(|| anyhow!("usage: rename CELL TITLE..."))?;
    let cell = parse_cell(cell_arg)?;
    let title = title.join(" ");

    matrix.rename_cell(&cell, &title)?;
    println!("Renamed {cell} to \"{}\".", title.trim());
    Ok(())
}

#[instrument(skip(matrix, args))]
fn cmd_export<S: StorageAdapter>(matrix: &mut Matrix<S>, args: &[String]) -> anyhow::Result<()> {
    info!("command export");

    let dir = match args {
        [] => PathBuf::from("."),
        [dir] => PathBuf::from(dir),
        _ => return Err(anyhow!("usage: export [DIR]")),
    };

    let file = matrix.export(Local::now().date_naive())?;
    let path = dir.join(&file.name);
    fs::write(&path, &file.contents)
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(file = %path.display(), bytes = file.contents.len(), "exported board");
    println!("Exported to {}.", path.display());
    Ok(())
}

fn cmd_help() -> anyhow::Result<()> {
    println!(
        "Commands: list, cells, add CELL TEXT, done CELL INDEX, move CELL:INDEX CELL[:INDEX], delete CELL INDEX, undo, rename CELL TITLE, export [DIR]"
    );
    println!("CELL is cell-N or N. Indices start at 1.");
    Ok(())
}

fn resume_undo<S: StorageAdapter>(
    matrix: &Matrix<S>,
    cfg: &Config,
    now: DateTime<Utc>,
) -> anyhow::Result<UndoController<ManualScheduler>> {
    let window = cfg.undo_window()?;
    let pending: Option<PendingUndo> = storage::load_or(matrix.storage(), UNDO_KEY, None);
    Ok(UndoController::resume(
        ManualScheduler::default(),
        window,
        pending,
        now,
    ))
}

fn parse_cell(raw: &str) -> anyhow::Result<CellId> {
    CellId::parse_loose(raw).ok_or_else(|| anyhow!("not a cell: {raw} (expected cell-N or N)"))
}

/// 1-based on the command line, 0-based internally.
fn parse_index(raw: &str) -> anyhow::Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(anyhow!("not a task index: {raw}")),
    }
}

/// `CELL:INDEX` parses to a location; a bare `CELL` to `None`.
fn parse_location(raw: &str) -> anyhow::Result<Option<DragLocation>> {
    let Some((cell, index)) = raw.rsplit_once(':') else {
        return Ok(None);
    };
    Ok(Some(DragLocation::new(parse_cell(cell)?, parse_index(index)?)))
}

fn task_at<S: StorageAdapter>(
    matrix: &Matrix<S>,
    cell: &CellId,
    index: usize,
) -> anyhow::Result<TaskId> {
    let tasks = matrix
        .board()
        .tasks(cell)
        .ok_or_else(|| anyhow!("unknown cell: {cell}"))?;
    tasks
        .get(index)
        .map(|task| task.id)
        .ok_or_else(|| anyhow!("{cell} has no task {} ({} tasks)", index + 1, tasks.len()))
}

fn title_of<S: StorageAdapter>(matrix: &Matrix<S>, cell: &CellId) -> String {
    matrix
        .cells()
        .get(cell)
        .map(|def| def.title.clone())
        .unwrap_or_else(|| cell.to_string())
}
