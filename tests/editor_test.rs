use grid_editor::{
    CellPos, EditorConfig, EditorEvent, EventOutcome, Grid, GridEditor, GridError, HistoryEntry,
    HistoryStore, KeyAction, KeyInput, NoLocator, ParseError, Platform, PointerButton,
};

fn config() -> EditorConfig {
    EditorConfig {
        platform: Platform::Other,
        ..EditorConfig::default()
    }
}

fn editor_with(lines: &[&str]) -> GridEditor {
    GridEditor::with_grid(config(), Grid::from_lines(lines).unwrap())
}

fn assert_rows(editor: &GridEditor, expected: &[&str]) {
    let actual: Vec<String> = editor.grid().lines().collect();
    assert_eq!(actual, expected);
    println!("✓ Editor grid matches:\n{}", editor.grid());
}

#[test]
fn test_new_editor_defaults() {
    println!("\n====== Testing GridEditor::new ======");
    let editor = GridEditor::new(config()).unwrap();
    assert_eq!(editor.height(), 6);
    assert_eq!(editor.width(), 8);
    assert_eq!(editor.selected_char(), '#');
    assert_eq!(editor.history().len(), 1);
    assert!(!editor.is_drawing());
    assert!(!editor.can_undo());
    assert!(editor.grid().lines().all(|line| line == "........"));
}

#[test]
fn test_new_editor_rejects_bad_config() {
    let bad = EditorConfig {
        default_height: 0,
        ..config()
    };
    assert!(matches!(
        GridEditor::new(bad),
        Err(GridError::InvalidDimension(_))
    ));
}

#[test]
fn test_stroke_commits_once() {
    println!("\n====== Testing a full stroke ======");
    let mut editor = GridEditor::new(config()).unwrap();

    editor.pointer_down(0, 0, PointerButton::Primary);
    assert!(editor.is_drawing());
    assert!(editor.pointer_enter(0, 3));
    assert!(editor.pointer_enter(2, 3));
    assert_eq!(editor.history().len(), 1, "nothing committed mid-stroke");
    assert_eq!(editor.draw_state().last_cell, Some(CellPos::new(2, 3)));

    assert!(editor.end_stroke());
    assert!(!editor.is_drawing());
    assert_eq!(editor.history().len(), 2);
    assert_rows(
        &editor,
        &[
            "####....", "...#....", "...#....", "........", "........", "........",
        ],
    );

    // A second release has nothing to commit
    assert!(!editor.end_stroke());
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn test_fast_drag_fills_gaps() {
    let mut editor = editor_with(&[".....", ".....", "....."]);
    editor.pointer_down(0, 0, PointerButton::Primary);
    editor.pointer_enter(2, 4);
    editor.end_stroke();
    assert_rows(&editor, &["##...", "..##.", "....#"]);
}

#[test]
fn test_secondary_button_erases() {
    println!("\n====== Testing erase strokes ======");
    let mut editor = editor_with(&["####", "####"]);
    editor.pointer_down(0, 0, PointerButton::Secondary);
    editor.pointer_enter(1, 3);
    editor.end_stroke();
    assert_rows(&editor, &["..##", "##.."]);
}

#[test]
fn test_stroke_without_change_adds_no_history() {
    let mut editor = editor_with(&["..", ".."]);
    editor.pointer_down(0, 0, PointerButton::Secondary);
    editor.pointer_enter(1, 1);
    assert!(!editor.end_stroke());
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn test_pointer_enter_without_stroke_is_ignored() {
    let mut editor = editor_with(&["..", ".."]);
    assert!(!editor.pointer_enter(1, 1));
    assert_rows(&editor, &["..", ".."]);
}

#[test]
fn test_stroke_near_edges_is_clipped() {
    let mut editor = editor_with(&["...", "...", "..."]);
    editor.pointer_down(1, 1, PointerButton::Primary);
    editor.pointer_enter(1, 5);
    editor.pointer_enter(-3, 5);
    editor.end_stroke();
    assert_rows(&editor, &["...", ".##", "..."]);
}

#[test]
fn test_new_stroke_concludes_unfinished_one() {
    let mut editor = editor_with(&["...", "..."]);
    editor.pointer_down(0, 0, PointerButton::Primary);
    editor.pointer_down(1, 2, PointerButton::Primary);
    assert_eq!(editor.history().len(), 2);
    editor.end_stroke();
    assert_eq!(editor.history().len(), 3);
    assert_rows(&editor, &["#..", "..#"]);
}

#[test]
fn test_single_cell_stroke_through_events() {
    let mut editor = editor_with(&["...", "..."]);
    let locator = NoLocator;
    editor.handle_event(
        EditorEvent::PointerDown {
            row: 1,
            col: 1,
            button: PointerButton::Primary,
        },
        &locator,
    );
    assert_eq!(editor.handle_event(EditorEvent::PointerUp, &locator), EventOutcome::Committed);
    assert_rows(&editor, &["...", ".#."]);
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn test_undo_during_stroke_commits_it_first() {
    println!("\n====== Testing undo in the middle of a stroke ======");
    let mut editor = editor_with(&["...", "..."]);
    editor.pointer_down(0, 0, PointerButton::Primary);
    editor.pointer_enter(0, 2);

    assert!(editor.undo());
    assert!(!editor.is_drawing());
    assert_eq!(editor.history().len(), 2);
    assert_rows(&editor, &["...", "..."]);

    // The stroke was kept as its own entry
    assert!(editor.redo());
    assert_rows(&editor, &["###", "..."]);
    assert!(!editor.end_stroke());
}

#[test]
fn test_rotate_during_stroke_commits_it_first() {
    let mut editor = editor_with(&["...", "..."]);
    editor.pointer_down(0, 0, PointerButton::Primary);

    assert!(editor.rotate());
    assert!(!editor.is_drawing());
    assert_eq!(editor.history().len(), 3);
    assert_rows(&editor, &[".#", "..", ".."]);

    // Later pointer moves no longer paint
    assert!(!editor.pointer_enter(2, 1));
    editor.undo();
    assert_rows(&editor, &["#..", "..."]);
    editor.undo();
    assert_rows(&editor, &["...", "..."]);
}

#[test]
fn test_from_parts_requires_matching_history() {
    let grid = Grid::from_lines(&["#."]).unwrap();
    let history = HistoryStore::new(HistoryEntry::new(Grid::from_lines(&[".."]).unwrap()));
    assert!(matches!(
        GridEditor::from_parts(config(), grid.clone(), history, Some('x')),
        Err(GridError::History(_))
    ));

    let history = HistoryStore::new(HistoryEntry::new(grid.clone()));
    let editor = GridEditor::from_parts(config(), grid, history, Some('x')).unwrap();
    assert_eq!(editor.selected_char(), 'x');
    assert!(!editor.is_drawing());
}

#[test]
fn test_touch_input() {
    println!("\n====== Testing touch strokes ======");
    let mut editor = editor_with(&["....", "....", "...."]);
    let locator = |x: f64, y: f64| {
        if x < 0.0 || y < 0.0 {
            None
        } else {
            Some(CellPos::new((y / 10.0) as i32, (x / 10.0) as i32))
        }
    };

    editor.touch_start(0, 0);
    assert!(editor.touch_move(35.0, 5.0, &locator));
    assert!(!editor.touch_move(-1.0, 5.0, &locator));
    assert!(editor.touch_move(35.0, 25.0, &locator));
    assert!(editor.end_stroke());
    assert_rows(&editor, &["####", "...#", "...#"]);

    // Moves outside a stroke do nothing
    assert!(!editor.touch_move(5.0, 25.0, &locator));
}

#[test]
fn test_resize() {
    println!("\n====== Testing resize ======");
    let mut editor = editor_with(&["#.", ".#"]);
    assert_eq!(editor.resize(3, 3), Ok(true));
    assert_rows(&editor, &["#..", ".#.", "..."]);
    assert_eq!(editor.history().len(), 2);

    // Same size again is not a new entry
    assert_eq!(editor.resize_from_input("3", "3"), Ok(false));
    assert_eq!(editor.history().len(), 2);

    assert_eq!(editor.resize_from_input("1", "1"), Ok(true));
    assert_rows(&editor, &["#"]);
}

#[test]
fn test_invalid_resize_changes_nothing() {
    let mut editor = editor_with(&["#.", ".#"]);
    for (h, w) in [("0", "3"), ("3", "-1"), ("abc", "3"), ("", "")] {
        assert!(matches!(
            editor.resize_from_input(h, w),
            Err(GridError::InvalidDimension(_))
        ));
    }
    assert!(editor.resize(0, 0).is_err());
    assert_rows(&editor, &["#.", ".#"]);
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn test_clear() {
    let mut editor = editor_with(&["#.#", ".#."]);
    assert_eq!(editor.clear(), Ok(true));
    assert_rows(&editor, &["...", "..."]);
    assert_eq!(editor.clear(), Ok(false));
}

#[test]
fn test_rotate() {
    println!("\n====== Testing rotate ======");
    let mut editor = editor_with(&["#.", "##", ".."]);
    assert!(editor.rotate());
    assert_eq!((editor.height(), editor.width()), (2, 3));
    assert_rows(&editor, &[".##", ".#."]);
    assert_eq!(editor.history().current().height, 2);
    assert_eq!(editor.history().current().width, 3);
}

#[test]
fn test_load_text() {
    println!("\n====== Testing load_text ======");
    let mut editor = GridEditor::new(config()).unwrap();
    assert_eq!(editor.load_text("2 4\n####\n.#.#\n"), Ok(true));
    assert_eq!((editor.height(), editor.width()), (2, 4));
    assert_rows(&editor, &["####", ".#.#"]);
    assert!(editor.can_undo());
}

#[test]
fn test_failed_load_leaves_state_untouched() {
    let mut editor = editor_with(&["#.", ".#"]);
    editor.resize(2, 3).unwrap();
    let before_grid = editor.grid().clone();
    let before_len = editor.history().len();

    let result = editor.load_text("2 4\n###\n.#.#\n");
    assert_eq!(
        result,
        Err(GridError::Parse(ParseError::RowWidthMismatch {
            row: 1,
            expected: 4,
            found: 3
        }))
    );
    assert_eq!(editor.grid(), &before_grid);
    assert_eq!(editor.history().len(), before_len);
    assert!(editor.can_undo());
}

#[test]
fn test_undo_redo_restore_grid_and_dimensions() {
    println!("\n====== Testing editor undo/redo ======");
    let mut editor = editor_with(&["#.", "##", ".."]);
    editor.rotate();
    editor.resize(4, 4).unwrap();

    assert!(editor.undo());
    assert_rows(&editor, &[".##", ".#."]);
    assert!(editor.undo());
    assert_rows(&editor, &["#.", "##", ".."]);
    assert!(!editor.undo());

    assert!(editor.redo());
    assert_eq!((editor.height(), editor.width()), (2, 3));
    assert!(editor.redo());
    assert_eq!((editor.height(), editor.width()), (4, 4));
    assert!(!editor.redo());
}

#[test]
fn test_edit_after_undo_drops_redo() {
    let mut editor = editor_with(&["..", ".."]);
    editor.pointer_down(0, 0, PointerButton::Primary);
    editor.end_stroke();
    editor.undo();
    assert!(editor.can_redo());

    editor.pointer_down(1, 1, PointerButton::Primary);
    editor.end_stroke();
    assert!(!editor.can_redo());
    assert_rows(&editor, &["..", ".#"]);
}

#[test]
fn test_history_cap_from_config() {
    let config = EditorConfig {
        max_history: 3,
        ..config()
    };
    let mut editor = GridEditor::with_grid(config, Grid::from_lines(&["....."]).unwrap());
    for col in 0..5 {
        editor.pointer_down(0, col, PointerButton::Primary);
        editor.end_stroke();
    }
    assert_eq!(editor.history().len(), 3);
    assert!(editor.undo());
    assert!(editor.undo());
    assert!(!editor.undo());
    assert_rows(&editor, &["###.."]);
}

#[test]
fn test_keyboard() {
    println!("\n====== Testing keyboard handling ======");
    let mut editor = editor_with(&["..", ".."]);

    assert_eq!(editor.handle_key(&KeyInput::plain("o")), KeyAction::SelectChar('o'));
    assert_eq!(editor.selected_char(), 'o');

    editor.pointer_down(0, 0, PointerButton::Primary);
    editor.end_stroke();
    assert_rows(&editor, &["o.", ".."]);

    assert_eq!(editor.handle_key(&KeyInput::ctrl("z")), KeyAction::Undo);
    assert_rows(&editor, &["..", ".."]);
    assert_eq!(editor.handle_key(&KeyInput::ctrl("Y")), KeyAction::Redo);
    assert_rows(&editor, &["o.", ".."]);

    // Chords on the wrong modifier and non-character keys do nothing
    assert_eq!(editor.handle_key(&KeyInput::meta("z")), KeyAction::Ignored);
    assert_eq!(editor.handle_key(&KeyInput::ctrl("c")), KeyAction::Ignored);
    assert_eq!(editor.handle_key(&KeyInput::plain("Shift")), KeyAction::Ignored);
    assert_eq!(editor.handle_key(&KeyInput::plain("\t")), KeyAction::Ignored);
    assert_eq!(editor.selected_char(), 'o');

    let typed = KeyInput {
        in_text_field: true,
        ..KeyInput::plain("x")
    };
    assert_eq!(editor.handle_key(&typed), KeyAction::Ignored);
    assert_eq!(editor.selected_char(), 'o');
}

#[test]
fn test_mac_chords() {
    let config = EditorConfig {
        platform: Platform::Mac,
        ..EditorConfig::default()
    };
    let mut editor = GridEditor::with_grid(config, Grid::from_lines(&[".."]).unwrap());
    editor.pointer_down(0, 1, PointerButton::Primary);
    editor.end_stroke();

    assert_eq!(editor.handle_key(&KeyInput::ctrl("z")), KeyAction::Ignored);
    assert_eq!(editor.handle_key(&KeyInput::meta("z")), KeyAction::Undo);
    assert_rows(&editor, &[".."]);
    assert_eq!(editor.handle_key(&KeyInput::meta("y")), KeyAction::Redo);
    assert_rows(&editor, &[".#"]);
}

#[test]
fn test_copy_and_share() {
    let editor = editor_with(&["####", ".#.#"]);
    assert_eq!(editor.copy_text(), "2 4\n####\n.#.#\n");
    assert_eq!(editor.share_query(), "h=2&w=4&data=IyMjIy4jLiM%3D");
}

#[test]
fn test_from_share_query() {
    println!("\n====== Testing share link startup ======");
    let editor = GridEditor::from_share_query(config(), "?h=2&w=4&data=IyMjIy4jLiM%3D").unwrap();
    assert_rows(&editor, &["####", ".#.#"]);
    assert_eq!(editor.history().len(), 1);

    // Broken links fall back to the default grid
    let editor = GridEditor::from_share_query(config(), "?h=9&w=4&data=IyMjIy4jLiM%3D").unwrap();
    assert_eq!((editor.height(), editor.width()), (6, 8));
}

#[test]
fn test_handle_event() {
    println!("\n====== Testing handle_event ======");
    let mut editor = editor_with(&["...", "..."]);
    let locator = NoLocator;

    assert_eq!(
        editor.handle_event(
            EditorEvent::PointerDown {
                row: 0,
                col: 0,
                button: PointerButton::Primary
            },
            &locator
        ),
        EventOutcome::Drawing
    );
    assert_eq!(
        editor.handle_event(EditorEvent::PointerEnter { row: 0, col: 2 }, &locator),
        EventOutcome::Drawing
    );
    assert_eq!(
        editor.handle_event(EditorEvent::TouchMove { x: 1.0, y: 1.0 }, &locator),
        EventOutcome::Ignored
    );
    assert_eq!(
        editor.handle_event(EditorEvent::PointerLeave, &locator),
        EventOutcome::Committed
    );
    assert_eq!(
        editor.handle_event(EditorEvent::GlobalPointerUp, &locator),
        EventOutcome::Ignored
    );

    assert_eq!(
        editor.handle_event(EditorEvent::Key(KeyInput::plain("*")), &locator),
        EventOutcome::CharSelected('*')
    );
    assert_eq!(
        editor.handle_event(EditorEvent::Rotate, &locator),
        EventOutcome::Committed
    );
    assert_eq!(
        editor.handle_event(EditorEvent::Undo, &locator),
        EventOutcome::Navigated
    );
    assert_eq!(
        editor.handle_event(EditorEvent::Redo, &locator),
        EventOutcome::Navigated
    );
    assert_eq!(
        editor.handle_event(EditorEvent::Redo, &locator),
        EventOutcome::Ignored
    );
    assert_eq!(
        editor.handle_event(
            EditorEvent::Copy {
                in_text_field: false
            },
            &locator
        ),
        EventOutcome::Copied("3 2\n.#\n.#\n.#\n".to_string())
    );
    assert_eq!(
        editor.handle_event(EditorEvent::Copy { in_text_field: true }, &locator),
        EventOutcome::Ignored
    );
    assert!(matches!(
        editor.handle_event(
            EditorEvent::Resize {
                height: "x".to_string(),
                width: "2".to_string()
            },
            &locator
        ),
        EventOutcome::Failed(GridError::InvalidDimension(_))
    ));
    assert!(matches!(
        editor.handle_event(EditorEvent::Load("1 1\n##\n".to_string()), &locator),
        EventOutcome::Failed(GridError::Parse(_))
    ));
    assert_eq!(
        editor.handle_event(EditorEvent::Clear, &locator),
        EventOutcome::Committed
    );
    assert_rows(&editor, &["..", "..", ".."]);
}

#[test]
fn test_capture_release_commits_unterminated_stroke() {
    println!("\n====== Testing input capture release ======");
    let mut editor = editor_with(&["...", "..."]);
    {
        let mut capture = editor.capture(&NoLocator);
        capture.dispatch(EditorEvent::TouchStart { row: 0, col: 0 });
        capture.dispatch(EditorEvent::PointerEnter { row: 1, col: 2 });
        assert!(capture.editor().is_drawing());
        assert_eq!(capture.editor().history().len(), 1);
    }
    assert!(!editor.is_drawing());
    assert_eq!(editor.history().len(), 2);
    assert_rows(&editor, &["##.", "..#"]);
}

#[test]
fn test_global_release_commits_stroke() {
    let mut editor = editor_with(&["...", "..."]);
    let mut capture = editor.capture(&NoLocator);
    capture.dispatch(EditorEvent::PointerDown {
        row: 1,
        col: 0,
        button: PointerButton::Primary,
    });
    assert_eq!(
        capture.dispatch(EditorEvent::GlobalTouchEnd),
        EventOutcome::Committed
    );
    assert_eq!(capture.editor().history().len(), 2);
    drop(capture);
    assert_eq!(editor.history().len(), 2);
}
