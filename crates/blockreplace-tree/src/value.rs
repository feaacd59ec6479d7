//! Attribute value shapes
//!
//! Text-bearing attributes come in two forms: plain strings and rich-text
//! objects. A rich-text object carries its canonical markup under
//! `originalHTML` and may also carry a `text` field; the markup wins when both
//! are present.
//!
//! Table sections (`head`, `body`, `foot`) are lists of rows, each row a list
//! of cells. Rows are either `{ "cells": [...] }` objects or bare arrays, and
//! cells are either `{ "content": ... }` objects or bare strings.

use serde_json::{Map, Value};

/// Key holding the canonical markup of a rich-text value.
pub const RICH_TEXT_HTML_KEY: &str = "originalHTML";
/// Key holding the plain text of a rich-text value.
pub const RICH_TEXT_TEXT_KEY: &str = "text";

const ROW_CELLS_KEY: &str = "cells";
const CELL_CONTENT_KEY: &str = "content";

/// Canonical text of a text-bearing attribute value.
///
/// Returns `None` for values that are neither strings nor rich-text objects.
pub fn text_of(value: &Value) -> Option<&str> {
    match value {
        Value::String(text) => Some(text),
        Value::Object(map) => map
            .get(RICH_TEXT_HTML_KEY)
            .and_then(Value::as_str)
            .or_else(|| map.get(RICH_TEXT_TEXT_KEY).and_then(Value::as_str)),
        _ => None,
    }
}

/// One cell of a table section.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    payload: CellPayload,
}

#[derive(Debug, Clone, PartialEq)]
enum CellPayload {
    Bare(String),
    Object(Map<String, Value>),
}

impl TableCell {
    /// Canonical text of the cell, if it carries any.
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            CellPayload::Bare(text) => Some(text),
            CellPayload::Object(map) => map.get(CELL_CONTENT_KEY).and_then(text_of),
        }
    }

    /// Replace the cell text, keeping every other cell field.
    pub fn set_text(&mut self, text: impl Into<String>) {
        match &mut self.payload {
            CellPayload::Bare(current) => *current = text.into(),
            CellPayload::Object(map) => {
                map.insert(CELL_CONTENT_KEY.to_string(), Value::String(text.into()));
            }
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        let payload = match value {
            Value::String(text) => CellPayload::Bare(text.clone()),
            Value::Object(map) => CellPayload::Object(map.clone()),
            _ => return None,
        };
        Some(Self { payload })
    }

    fn to_value(&self) -> Value {
        match &self.payload {
            CellPayload::Bare(text) => Value::String(text.clone()),
            CellPayload::Object(map) => Value::Object(map.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum RowShape {
    /// `{ "cells": [...], ...other fields }`
    Object(Map<String, Value>),
    /// `[...]`
    Bare,
}

#[derive(Debug, Clone, PartialEq)]
struct TableRow {
    shape: RowShape,
    cells: Vec<TableCell>,
}

/// A parsed table section that can be edited cell by cell and rebuilt.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSection {
    rows: Vec<TableRow>,
}

impl TableSection {
    /// Parse a section value.
    ///
    /// Returns `None` when the value does not have the row/cell shape.
    pub fn from_value(value: &Value) -> Option<Self> {
        let rows = value
            .as_array()?
            .iter()
            .map(Self::parse_row)
            .collect::<Option<Vec<_>>>()?;
        Some(Self { rows })
    }

    fn parse_row(value: &Value) -> Option<TableRow> {
        let (shape, cells) = match value {
            Value::Object(map) => {
                let cells = map.get(ROW_CELLS_KEY)?.as_array()?;
                let mut rest = map.clone();
                rest.remove(ROW_CELLS_KEY);
                (RowShape::Object(rest), cells)
            }
            Value::Array(cells) => (RowShape::Bare, cells),
            _ => return None,
        };
        let cells = cells
            .iter()
            .map(TableCell::from_value)
            .collect::<Option<Vec<_>>>()?;
        Some(TableRow { shape, cells })
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Iterate over all cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = &TableCell> {
        self.rows.iter().flat_map(|row| row.cells.iter())
    }

    /// Iterate mutably over all cells, row by row.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut TableCell> {
        self.rows.iter_mut().flat_map(|row| row.cells.iter_mut())
    }

    /// Rebuild the section value in its original shape.
    pub fn to_value(&self) -> Value {
        Value::Array(
            self.rows
                .iter()
                .map(|row| {
                    let cells = Value::Array(row.cells.iter().map(TableCell::to_value).collect());
                    match &row.shape {
                        RowShape::Object(rest) => {
                            let mut map = rest.clone();
                            map.insert(ROW_CELLS_KEY.to_string(), cells);
                            Value::Object(map)
                        }
                        RowShape::Bare => cells,
                    }
                })
                .collect(),
        )
    }
}
