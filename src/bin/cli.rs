#![cfg(not(tarpaulin_include))]

use grid_editor::{
    create_grid, load_grid_file, load_session, parse_dimensions, save_session, to_judge_text,
    write_judge_file, EditorConfig, EditorEvent, EventOutcome, GridEditor, InputCapture,
    KeyInput, NoLocator, PointerButton, Session, FILL_CHAR,
};
use std::env;
use std::io::{self, BufRead, Write};

enum Next {
    Quit,
    Restore(Session),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    let config = EditorConfig::from_env();

    let mut editor = match args.len() {
        1 => GridEditor::new(config.clone())?,
        2 => GridEditor::from_share_query(config.clone(), &args[1])?,
        3 => {
            let (rows, cols) = parse_dimensions(&args[1], &args[2])?;
            GridEditor::with_grid(config.clone(), create_grid(rows, cols, FILL_CHAR)?)
        }
        _ => {
            eprintln!("Usage: {} [<rows> <cols> | <share-query>]", args[0]);
            return Ok(());
        }
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let locator = NoLocator;

    loop {
        let next = {
            let mut capture = editor.capture(&locator);
            run(&mut capture, &mut lines)?
        };
        match next {
            Next::Quit => break,
            Next::Restore(session) => {
                println!("Restored session saved at {}", session.saved_at);
                editor = session.into_editor(config.clone())?;
            }
        }
    }

    Ok(())
}

fn run(
    capture: &mut InputCapture<'_>,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Next, Box<dyn std::error::Error>> {
    let mut status = String::from("ok");
    loop {
        display(capture.editor());
        print!("[{}] ({}) > ", capture.editor().selected_char(), status);
        io::stdout().flush()?;

        let Some(command) = lines.next() else {
            return Ok(Next::Quit);
        };
        let command = command?;
        let words: Vec<&str> = command.split_whitespace().collect();

        status = match words.as_slice() {
            [] => String::from("invalid command"),
            ["q"] => return Ok(Next::Quit),
            ["help"] => {
                print_help();
                String::from("ok")
            }
            ["dot", row, col] => stroke(capture, PointerButton::Primary, &[*row, *col]),
            ["draw", coords @ ..] => stroke(capture, PointerButton::Primary, coords),
            ["erase", coords @ ..] => stroke(capture, PointerButton::Secondary, coords),
            ["char", key] => describe(capture.dispatch(EditorEvent::Key(KeyInput::plain(key)))),
            ["resize", height, width] => describe(capture.dispatch(EditorEvent::Resize {
                height: height.to_string(),
                width: width.to_string(),
            })),
            ["clear"] => describe(capture.dispatch(EditorEvent::Clear)),
            ["rotate"] => describe(capture.dispatch(EditorEvent::Rotate)),
            ["undo"] => describe(capture.dispatch(EditorEvent::Undo)),
            ["redo"] => describe(capture.dispatch(EditorEvent::Redo)),
            ["load"] => {
                println!("Paste the grid, then an empty line:");
                let mut text = String::new();
                for line in &mut *lines {
                    let line = line?;
                    if line.trim().is_empty() {
                        break;
                    }
                    text.push_str(&line);
                    text.push('\n');
                }
                describe(capture.dispatch(EditorEvent::Load(text)))
            }
            ["open", path] => match load_grid_file(path) {
                Ok(grid) => describe(capture.dispatch(EditorEvent::Load(to_judge_text(&grid)))),
                Err(e) => e.to_string(),
            },
            ["write", path] => match write_judge_file(capture.editor().grid(), path) {
                Ok(()) => String::from("ok"),
                Err(e) => e.to_string(),
            },
            ["save", path] => match save_session(&Session::capture(capture.editor()), path) {
                Ok(()) => String::from("ok"),
                Err(e) => e.to_string(),
            },
            ["restore", path] => match load_session(path) {
                Ok(session) => return Ok(Next::Restore(session)),
                Err(e) => e.to_string(),
            },
            ["export"] => match capture.dispatch(EditorEvent::Copy {
                in_text_field: false,
            }) {
                EventOutcome::Copied(text) => {
                    print!("{}", text);
                    String::from("ok")
                }
                other => describe(other),
            },
            ["share"] => {
                println!("?{}", capture.editor().share_query());
                String::from("ok")
            }
            _ => String::from("invalid command"),
        };
    }
}

// Replays `row col` pairs as one pointer stroke.
fn stroke(capture: &mut InputCapture<'_>, button: PointerButton, coords: &[&str]) -> String {
    let cells: Option<Vec<(i32, i32)>> = coords
        .chunks(2)
        .map(|pair| match pair {
            [row, col] => Some((row.parse().ok()?, col.parse().ok()?)),
            _ => None,
        })
        .collect();
    let cells = match cells {
        Some(cells) if !cells.is_empty() => cells,
        _ => return String::from("invalid cell"),
    };

    let (row, col) = cells[0];
    capture.dispatch(EditorEvent::PointerDown { row, col, button });
    for &(row, col) in &cells[1..] {
        capture.dispatch(EditorEvent::PointerEnter { row, col });
    }
    describe(capture.dispatch(EditorEvent::PointerUp))
}

fn describe(outcome: EventOutcome) -> String {
    match outcome {
        EventOutcome::Ignored => String::from("no change"),
        EventOutcome::Failed(e) => e.to_string(),
        EventOutcome::CharSelected(ch) => format!("painting with '{}'", ch),
        _ => String::from("ok"),
    }
}

fn display(editor: &GridEditor) {
    print!("    ");
    for c in 0..editor.width() {
        print!("{}", c % 10);
    }
    println!();
    for (r, line) in editor.grid().lines().enumerate() {
        println!("{:>3} {}", r, line);
    }
    println!(
        "{} x {}  undo: {}  redo: {}",
        editor.height(),
        editor.width(),
        if editor.can_undo() { "yes" } else { "no" },
        if editor.can_redo() { "yes" } else { "no" }
    );
}

fn print_help() {
    println!("Commands:");
    println!("  q: Quit");
    println!("  dot <r> <c>: Paint a single cell");
    println!("  draw <r> <c> [<r> <c> ...]: Paint a stroke with the selected character");
    println!("  erase <r> <c> [<r> <c> ...]: Erase a stroke back to '.'");
    println!("  char <ch>: Select the paint character");
    println!("  resize <h> <w>: Resize, keeping existing cells");
    println!("  clear: Reset every cell to '.'");
    println!("  rotate: Rotate 90 degrees clockwise");
    println!("  undo / redo: Move through history");
    println!("  load: Read a grid in judge format from the following lines");
    println!("  open <file>: Load a grid from a .txt/.in or .gz file");
    println!("  write <file>: Write the grid in judge format");
    println!("  save <file> / restore <file>: Save or restore the whole session (.gz)");
    println!("  export: Print the grid in judge format");
    println!("  share: Print the share link query");
}
