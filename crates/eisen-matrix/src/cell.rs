use std::fmt;

use serde::{
  Deserialize,
  Serialize
};
use tracing::info;

use crate::error::{
  MatrixError,
  Result
};

pub const CELL_COUNT: u8 = 4;

/// Identifier of a quadrant, `cell-1`
/// through `cell-4` for the seeded
/// matrix.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct CellId(String);

impl CellId {
  pub fn new(raw: &str) -> Self {
    Self(raw.trim().to_string())
  }

  pub fn from_shortcut_digit(
    digit: u8
  ) -> Option<Self> {
    (1..=CELL_COUNT)
      .contains(&digit)
      .then(|| Self(format!("cell-{digit}")))
  }

  /// Accepts `cell-N` or a bare `N`.
  pub fn parse_loose(
    raw: &str
  ) -> Option<Self> {
    let trimmed = raw.trim();
    let digits = trimmed
      .strip_prefix("cell-")
      .unwrap_or(trimmed);
    digits
      .parse::<u8>()
      .ok()
      .and_then(Self::from_shortcut_digit)
  }

  pub fn seeded() -> Vec<Self> {
    (1..=CELL_COUNT)
      .filter_map(Self::from_shortcut_digit)
      .collect()
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for CellId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct CellDef {
  #[serde(rename = "type")]
  pub id:    CellId,
  pub title: String
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct CellRegistry {
  cells: Vec<CellDef>
}

impl Default for CellRegistry {
  fn default() -> Self {
    let titles = [
      "Do it",
      "Schedule it",
      "Delegate it",
      "Delete it"
    ];
    Self {
      cells: CellId::seeded()
        .into_iter()
        .zip(titles)
        .map(|(id, title)| CellDef {
          id,
          title: title.to_string()
        })
        .collect()
    }
  }
}

impl CellRegistry {
  pub fn get(
    &self,
    id: &CellId
  ) -> Option<&CellDef> {
    self
      .cells
      .iter()
      .find(|cell| &cell.id == id)
  }

  pub fn contains(
    &self,
    id: &CellId
  ) -> bool {
    self.get(id).is_some()
  }

  pub fn iter(
    &self
  ) -> impl Iterator<Item = &CellDef> {
    self.cells.iter()
  }

  pub fn ids(
    &self
  ) -> impl Iterator<Item = &CellId> {
    self.cells.iter().map(|cell| &cell.id)
  }

  pub fn len(&self) -> usize {
    self.cells.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  #[tracing::instrument(skip(self))]
  pub fn rename_cell(
    &mut self,
    id: &CellId,
    title: &str
  ) -> Result<()> {
    let title = title.trim();
    if title.is_empty() {
      return Err(MatrixError::BlankText);
    }
    let cell = self
      .cells
      .iter_mut()
      .find(|cell| &cell.id == id)
      .ok_or_else(|| {
        MatrixError::UnknownCell(
          id.clone()
        )
      })?;
    info!(
      cell = %id,
      from = %cell.title,
      to = %title,
      "renamed cell"
    );
    cell.title = title.to_string();
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_registry_matches_seed() {
    let registry = CellRegistry::default();
    let pairs: Vec<(&str, &str)> = registry
      .iter()
      .map(|cell| {
        (
          cell.id.as_str(),
          cell.title.as_str()
        )
      })
      .collect();
    assert_eq!(
      pairs,
      vec![
        ("cell-1", "Do it"),
        ("cell-2", "Schedule it"),
        ("cell-3", "Delegate it"),
        ("cell-4", "Delete it"),
      ]
    );
  }

  #[test]
  fn registry_serializes_type_and_title() {
    let json = serde_json::to_string(
      &CellRegistry::default()
    )
    .expect("serialize cells");
    assert!(json.starts_with(
      r#"[{"type":"cell-1","title":"Do it"}"#
    ));
  }

  #[test]
  fn rename_trims_and_rejects_blank() {
    let mut registry =
      CellRegistry::default();
    let id = CellId::new("cell-2");
    assert!(registry.contains(&id));
    registry
      .rename_cell(&id, "  Later  ")
      .expect("rename");
    assert_eq!(
      registry
        .get(&id)
        .map(|cell| cell.title.as_str()),
      Some("Later")
    );

    assert!(matches!(
      registry.rename_cell(&id, "   "),
      Err(MatrixError::BlankText)
    ));
  }

  #[test]
  fn rename_unknown_cell_fails() {
    let mut registry =
      CellRegistry::default();
    let err = registry
      .rename_cell(
        &CellId::new("cell-9"),
        "Nope"
      )
      .expect_err("unknown cell");
    assert!(matches!(
      err,
      MatrixError::UnknownCell(_)
    ));
  }

  #[test]
  fn parse_loose_accepts_digit_and_id() {
    assert_eq!(
      CellId::parse_loose("3"),
      Some(CellId::new("cell-3"))
    );
    assert_eq!(
      CellId::parse_loose("cell-4"),
      Some(CellId::new("cell-4"))
    );
    assert_eq!(
      CellId::parse_loose("5"),
      None
    );
    assert_eq!(
      CellId::parse_loose("urgent"),
      None
    );
  }
}
