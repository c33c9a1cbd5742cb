pub mod cli;
pub mod commands;
pub mod config;
pub mod datastore;
pub mod render;

use std::ffi::OsString;

use anyhow::Context;
use clap::Parser;
use eisen_matrix::Matrix;
use tracing::{
  debug,
  info
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let pre =
    cli::preprocess_args(&raw_args)?;
  let cli = cli::GlobalCli::parse_from(
    pre.cleaned_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting eisen CLI"
  );
  debug!(?pre.rc_overrides, "preprocessed rc overrides");

  let mut cfg = config::Config::load(
    cli.eisenrc.as_deref()
  )?;
  cfg.apply_overrides(
    pre.rc_overrides.into_iter().chain(
      cli
        .rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
  );

  let data_dir =
    config::resolve_data_dir(
      &cfg,
      cli.data.as_deref()
    )
    .context(
      "failed to resolve data \
       directory"
    )?;

  let store =
    datastore::FileStorage::open(
      &data_dir
    )
    .with_context(|| {
      format!(
        "failed to open board at {}",
        data_dir.display()
      )
    })?;
  let mut matrix = Matrix::load(store);
  info!(
    data = %data_dir.display(),
    tasks = matrix.board().len(),
    "opened board"
  );

  let mut renderer =
    render::Renderer::new(&cfg)?;
  let inv = cli::Invocation::parse(
    &cfg, cli.rest
  )?;

  let result = commands::dispatch(
    &mut matrix,
    &cfg,
    &mut renderer,
    inv
  );

  // Storage failures never fail the command.
  if let Some(warning) =
    matrix.take_warning()
  {
    eprintln!(
      "warning: changes are not being \
       saved ({}: {})",
      warning.key, warning.message
    );
  }

  result?;
  info!("done");
  Ok(())
}
