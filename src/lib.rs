/*!
# Grid Editor

A small editor core for character grids, the kind competitive programming
problems use as input: paint cells, draw lines, resize, rotate, undo, and
exchange the result as judge text or as a shareable link.

## Overview

A grid is a rectangle of single characters with `.` as the empty cell. The
editor paints with a selected character (`#` by default), erases with `.`,
and records every completed edit in a bounded undo/redo history.

## Architecture

### Core
- **grid**: the `Grid` type and pure operations on it (create, resize
  keeping content, rotate clockwise, set a cell, rasterize a line)
- **codec**: judge text (`H W` header + rows), compact URL-safe base64
  encoding, and share-link query strings
- **history**: snapshot-based undo/redo log capped at 100 entries

### Editor
- **editor**: `GridEditor`, which turns pointer, touch and keyboard input
  into edits; a whole stroke becomes a single history entry
- **config**: editor defaults, optionally read from a JSON file
- **error**: `InvalidDimension`, `Parse` and `Decode` failures

### Data Persistence Layer
- Session files with Gzip compression and bincode serialization
- Plain judge text files for import/export

## Formats

Judge text:

```text
2 4
####
.#.#
```

Share query: `h=2&w=4&data=IyMjIy4jLiM%3D`, where `data` is the row-major
cells in base64 with `+` and `/` replaced by `-` and `_`.

## Usage

```
use grid_editor::{EditorConfig, GridEditor, PointerButton};

let mut editor = GridEditor::new(EditorConfig::default()).unwrap();
editor.pointer_down(0, 0, PointerButton::Primary);
editor.pointer_enter(2, 2);
editor.end_stroke();
assert_eq!(editor.grid().get(1, 1), Some('#'));
assert!(editor.can_undo());
```
*/

pub mod codec;
pub mod config;
pub mod editor;
pub mod error;
pub mod grid;
pub mod history;
pub mod saving;

/// Re-export everything from these modules to make it easier to use
pub use codec::*;
pub use config::*;
pub use editor::*;
pub use error::*;
pub use grid::*;
pub use history::*;
pub use saving::*;
