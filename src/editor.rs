use crate::codec;
use crate::config::{EditorConfig, Platform};
use crate::error::{GridError, Result};
use crate::grid::{
    create_grid, parse_dimensions, rasterize_line, resize_preserving, rotate_clockwise, set_cell,
    Grid, FILL_CHAR,
};
use crate::history::{HistoryEntry, HistoryStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// Paints the selected character.
    Primary,
    /// Paints [`FILL_CHAR`].
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellPos {
    pub row: i32,
    pub col: i32,
}

impl CellPos {
    pub fn new(row: i32, col: i32) -> Self {
        CellPos { row, col }
    }
}

/// Pointer state of the stroke in progress. Never stored in history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawState {
    pub active: bool,
    pub button: Option<PointerButton>,
    pub last_cell: Option<CellPos>,
}

/// Resolves a screen coordinate to the grid cell drawn there, if any.
///
/// Provided by the host, which is the only party that knows the layout.
pub trait CellLocator {
    fn cell_at(&self, x: f64, y: f64) -> Option<CellPos>;
}

impl<F> CellLocator for F
where
    F: Fn(f64, f64) -> Option<CellPos>,
{
    fn cell_at(&self, x: f64, y: f64) -> Option<CellPos> {
        self(x, y)
    }
}

/// Locator for hosts without coordinate-based input.
pub struct NoLocator;

impl CellLocator for NoLocator {
    fn cell_at(&self, _x: f64, _y: f64) -> Option<CellPos> {
        None
    }
}

/// A key press as seen by the editor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    /// The key went to a text field (size inputs, load box) rather than the grid.
    pub in_text_field: bool,
}

impl KeyInput {
    pub fn plain(key: &str) -> Self {
        KeyInput {
            key: key.to_string(),
            ..Default::default()
        }
    }

    pub fn ctrl(key: &str) -> Self {
        KeyInput {
            key: key.to_string(),
            ctrl: true,
            ..Default::default()
        }
    }

    pub fn meta(key: &str) -> Self {
        KeyInput {
            key: key.to_string(),
            meta: true,
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Undo,
    Redo,
    SelectChar(char),
    Ignored,
}

/// Every logical input the editor reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum EditorEvent {
    PointerDown {
        row: i32,
        col: i32,
        button: PointerButton,
    },
    PointerEnter {
        row: i32,
        col: i32,
    },
    PointerUp,
    PointerLeave,
    TouchStart {
        row: i32,
        col: i32,
    },
    TouchMove {
        x: f64,
        y: f64,
    },
    TouchEnd,
    /// Release seen outside the grid, e.g. by a window-level listener.
    GlobalPointerUp,
    GlobalTouchEnd,
    Key(KeyInput),
    Copy {
        in_text_field: bool,
    },
    Resize {
        height: String,
        width: String,
    },
    Clear,
    Rotate,
    Load(String),
    Undo,
    Redo,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    Ignored,
    /// The grid changed but nothing was committed yet (stroke in progress).
    Drawing,
    /// A new history entry was recorded.
    Committed,
    /// Undo or redo moved through history.
    Navigated,
    CharSelected(char),
    /// Judge text for the clipboard.
    Copied(String),
    /// The operation was rejected; state is unchanged.
    Failed(GridError),
}

/// Owns the grid being edited together with its history and stroke state.
#[derive(Clone, Debug)]
pub struct GridEditor {
    config: EditorConfig,
    grid: Grid,
    history: HistoryStore,
    selected_char: char,
    draw: DrawState,
}

impl GridEditor {
    /// Starts from a blank grid of the configured default size.
    pub fn new(config: EditorConfig) -> Result<Self> {
        let grid = create_grid(config.default_height, config.default_width, FILL_CHAR)?;
        Ok(Self::with_grid(config, grid))
    }

    pub fn with_grid(config: EditorConfig, grid: Grid) -> Self {
        let history = HistoryStore::with_capacity(HistoryEntry::new(grid.clone()), config.max_history);
        Self::assemble(config, grid, history, None)
    }

    /// Starts from the grid in a share query, falling back to the default
    /// grid when the query cannot be decoded.
    pub fn from_share_query(config: EditorConfig, query: &str) -> Result<Self> {
        match codec::from_share_query(query) {
            Ok(grid) => Ok(Self::with_grid(config, grid)),
            Err(e) => {
                log::warn!("failed to decode grid from share link: {}", e);
                Self::new(config)
            }
        }
    }

    /// Rebuilds an editor from saved state. The grid must equal the current
    /// history entry, since no stroke is active afterwards.
    pub fn from_parts(
        config: EditorConfig,
        grid: Grid,
        history: HistoryStore,
        selected_char: Option<char>,
    ) -> Result<Self> {
        if history.current().grid != grid {
            return Err(GridError::History(format!(
                "{}x{} grid differs from the current history entry",
                grid.height(),
                grid.width()
            )));
        }
        Ok(Self::assemble(config, grid, history, selected_char))
    }

    fn assemble(
        config: EditorConfig,
        grid: Grid,
        history: HistoryStore,
        selected_char: Option<char>,
    ) -> Self {
        GridEditor {
            selected_char: selected_char.unwrap_or(config.paint_char),
            config,
            grid,
            history,
            draw: DrawState::default(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn selected_char(&self) -> char {
        self.selected_char
    }

    pub fn draw_state(&self) -> DrawState {
        self.draw
    }

    pub fn is_drawing(&self) -> bool {
        self.draw.active
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn select_char(&mut self, ch: char) {
        self.selected_char = ch;
    }

    fn stroke_char(&self, button: PointerButton) -> char {
        match button {
            PointerButton::Primary => self.selected_char,
            PointerButton::Secondary => FILL_CHAR,
        }
    }

    /// Starts a stroke and paints its first cell.
    pub fn pointer_down(&mut self, row: i32, col: i32, button: PointerButton) {
        self.conclude_stroke();
        self.grid = set_cell(&self.grid, row, col, self.stroke_char(button));
        self.draw = DrawState {
            active: true,
            button: Some(button),
            last_cell: Some(CellPos::new(row, col)),
        };
    }

    /// Extends the active stroke to `(row, col)` with a rasterized line from
    /// the previous cell. Returns `false` when no stroke is active.
    pub fn pointer_enter(&mut self, row: i32, col: i32) -> bool {
        let (true, Some(button), Some(last)) = (self.draw.active, self.draw.button, self.draw.last_cell)
        else {
            return false;
        };
        let ch = self.stroke_char(button);
        self.grid = rasterize_line(&self.grid, last.row, last.col, row, col, ch);
        self.draw.last_cell = Some(CellPos::new(row, col));
        true
    }

    pub fn touch_start(&mut self, row: i32, col: i32) {
        self.pointer_down(row, col, PointerButton::Primary);
    }

    pub fn touch_move(&mut self, x: f64, y: f64, locator: &dyn CellLocator) -> bool {
        if !self.draw.active {
            return false;
        }
        match locator.cell_at(x, y) {
            Some(cell) => self.pointer_enter(cell.row, cell.col),
            None => false,
        }
    }

    /// Ends the active stroke, committing its result as one history entry.
    ///
    /// Safe to call repeatedly; only the first call after a stroke commits.
    pub fn end_stroke(&mut self) -> bool {
        let was_active = self.draw.active;
        self.draw = DrawState::default();
        was_active && self.commit()
    }

    // Other edits never interleave with a half-finished stroke.
    fn conclude_stroke(&mut self) {
        if self.draw.active {
            self.end_stroke();
        }
    }

    fn commit(&mut self) -> bool {
        let pushed = self.history.push(HistoryEntry::new(self.grid.clone()));
        if pushed {
            log::debug!(
                "committed {}x{} grid (history {}/{})",
                self.height(),
                self.width(),
                self.history.cursor() + 1,
                self.history.len()
            );
        }
        pushed
    }

    fn replace(&mut self, grid: Grid) -> bool {
        self.conclude_stroke();
        self.grid = grid;
        self.commit()
    }

    /// Resizes keeping existing content. Returns whether history changed.
    pub fn resize(&mut self, height: i32, width: i32) -> Result<bool> {
        let grid = resize_preserving(&self.grid, height, width)?;
        Ok(self.replace(grid))
    }

    pub fn resize_from_input(&mut self, height: &str, width: &str) -> Result<bool> {
        let (height, width) = parse_dimensions(height, width)?;
        self.resize(height, width)
    }

    pub fn clear(&mut self) -> Result<bool> {
        let grid = create_grid(self.height() as i32, self.width() as i32, FILL_CHAR)?;
        Ok(self.replace(grid))
    }

    pub fn rotate(&mut self) -> bool {
        let rotated = rotate_clockwise(&self.grid);
        self.replace(rotated.grid)
    }

    /// Replaces the grid with one read from judge text. On a parse failure
    /// the editor is left exactly as it was.
    pub fn load_text(&mut self, text: &str) -> Result<bool> {
        let grid = codec::from_judge_text(text)?;
        Ok(self.replace(grid))
    }

    pub fn undo(&mut self) -> bool {
        self.conclude_stroke();
        if !self.history.can_undo() {
            return false;
        }
        self.grid = self.history.undo().grid.clone();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.conclude_stroke();
        if !self.history.can_redo() {
            return false;
        }
        self.grid = self.history.redo().grid.clone();
        true
    }

    pub fn handle_key(&mut self, key: &KeyInput) -> KeyAction {
        if key.in_text_field {
            return KeyAction::Ignored;
        }

        let chord = match self.config.platform {
            Platform::Mac => key.meta,
            Platform::Other => key.ctrl,
        };
        if chord {
            match key.key.to_lowercase().as_str() {
                "z" => {
                    self.undo();
                    return KeyAction::Undo;
                }
                "y" => {
                    self.redo();
                    return KeyAction::Redo;
                }
                _ => {}
            }
        }

        let mut chars = key.key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if !key.ctrl && !key.meta && !ch.is_control() => {
                self.select_char(ch);
                KeyAction::SelectChar(ch)
            }
            _ => KeyAction::Ignored,
        }
    }

    /// Current grid in judge text, as placed on the clipboard by a copy.
    pub fn copy_text(&self) -> String {
        codec::to_judge_text(&self.grid)
    }

    pub fn share_query(&self) -> String {
        codec::to_share_query(&self.grid)
    }

    pub fn handle_event(&mut self, event: EditorEvent, locator: &dyn CellLocator) -> EventOutcome {
        match event {
            EditorEvent::PointerDown { row, col, button } => {
                self.pointer_down(row, col, button);
                EventOutcome::Drawing
            }
            EditorEvent::PointerEnter { row, col } => drawing_outcome(self.pointer_enter(row, col)),
            EditorEvent::TouchStart { row, col } => {
                self.touch_start(row, col);
                EventOutcome::Drawing
            }
            EditorEvent::TouchMove { x, y } => drawing_outcome(self.touch_move(x, y, locator)),
            EditorEvent::PointerUp
            | EditorEvent::PointerLeave
            | EditorEvent::TouchEnd
            | EditorEvent::GlobalPointerUp
            | EditorEvent::GlobalTouchEnd => commit_outcome(self.end_stroke()),
            EditorEvent::Key(key) => match self.handle_key(&key) {
                KeyAction::Undo | KeyAction::Redo => EventOutcome::Navigated,
                KeyAction::SelectChar(ch) => EventOutcome::CharSelected(ch),
                KeyAction::Ignored => EventOutcome::Ignored,
            },
            EditorEvent::Copy { in_text_field } => {
                if in_text_field {
                    EventOutcome::Ignored
                } else {
                    EventOutcome::Copied(self.copy_text())
                }
            }
            EditorEvent::Resize { height, width } => {
                result_outcome(self.resize_from_input(&height, &width))
            }
            EditorEvent::Clear => result_outcome(self.clear()),
            EditorEvent::Rotate => commit_outcome(self.rotate()),
            EditorEvent::Load(text) => result_outcome(self.load_text(&text)),
            EditorEvent::Undo => navigation_outcome(self.undo()),
            EditorEvent::Redo => navigation_outcome(self.redo()),
        }
    }

    /// Subscribes the editor to window-level input for the lifetime of the
    /// returned guard. Dropping the guard ends any stroke still in progress.
    pub fn capture<'a>(&'a mut self, locator: &'a dyn CellLocator) -> InputCapture<'a> {
        log::debug!("input capture acquired");
        InputCapture {
            editor: self,
            locator,
        }
    }
}

fn drawing_outcome(changed: bool) -> EventOutcome {
    if changed {
        EventOutcome::Drawing
    } else {
        EventOutcome::Ignored
    }
}

fn commit_outcome(committed: bool) -> EventOutcome {
    if committed {
        EventOutcome::Committed
    } else {
        EventOutcome::Ignored
    }
}

fn navigation_outcome(moved: bool) -> EventOutcome {
    if moved {
        EventOutcome::Navigated
    } else {
        EventOutcome::Ignored
    }
}

fn result_outcome(result: Result<bool>) -> EventOutcome {
    match result {
        Ok(committed) => commit_outcome(committed),
        Err(e) => {
            log::warn!("{}", e);
            EventOutcome::Failed(e)
        }
    }
}

/// Scoped subscription to global input, see [`GridEditor::capture`].
pub struct InputCapture<'a> {
    editor: &'a mut GridEditor,
    locator: &'a dyn CellLocator,
}

impl InputCapture<'_> {
    pub fn dispatch(&mut self, event: EditorEvent) -> EventOutcome {
        self.editor.handle_event(event, self.locator)
    }

    pub fn editor(&self) -> &GridEditor {
        &*self.editor
    }
}

impl Drop for InputCapture<'_> {
    fn drop(&mut self) {
        if self.editor.end_stroke() {
            log::debug!("committed unterminated stroke on input release");
        }
        log::debug!("input capture released");
    }
}
