//! The debug visualizer: a full-repaint, four-pane view of execution state,
//! advanced one key-press at a time.
//!
//! Pane layout follows the classic split: tape on top, output left, code
//! right, prompt line at the bottom. The session driver only sees this as
//! an [`ExecMode`]; nothing outside this module touches the terminal.

use std::io::{self, Stdout};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use crate::config::{self, Colors};
use crate::engine::Snapshot;
use crate::session::ExecMode;

const CONTINUE_PROMPT: &str = "Press any key to continue";
const QUIT_PROMPT: &str = "Press q to quit";

/// Everything one repaint needs.
struct Screen<'a> {
    snapshot: &'a Snapshot<'a>,
    output: &'a [u8],
    prompt: &'a str,
}

/// The visualized execution mode. Owns the terminal for the lifetime of the
/// session and restores it on drop, error paths included.
pub struct Visual {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    output: Vec<u8>,
}

impl Visual {
    /// Raw mode, alternate screen, hidden cursor.
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;
        terminal.clear()?;
        Ok(Self {
            terminal,
            output: Vec::new(),
        })
    }

    fn draw(&mut self, snapshot: &Snapshot, prompt: &str) -> io::Result<()> {
        let Self { terminal, output } = self;
        terminal.draw(|f| {
            ui(
                f,
                &Screen {
                    snapshot,
                    output: output.as_slice(),
                    prompt,
                },
            )
        })?;
        Ok(())
    }

    fn wait_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(key);
                }
            }
        }
    }
}

impl Drop for Visual {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

impl ExecMode for Visual {
    fn emit(&mut self, byte: u8) -> io::Result<()> {
        self.output.push(byte);
        Ok(())
    }

    fn read_byte(&mut self, snapshot: &Snapshot) -> io::Result<u8> {
        // Paint current state first so the operator sees what is asking.
        self.draw(snapshot, CONTINUE_PROMPT)?;
        loop {
            if let Some(byte) = key_byte(&self.wait_key()?) {
                return Ok(byte);
            }
        }
    }

    fn pause(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        self.draw(snapshot, CONTINUE_PROMPT)?;
        self.wait_key()?;
        Ok(())
    }

    fn finished(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        loop {
            self.draw(snapshot, QUIT_PROMPT)?;
            if let KeyCode::Char('q') = self.wait_key()?.code {
                return Ok(());
            }
        }
    }
}

/// Map a key press to the byte `,` stores. Keys with no byte meaning are
/// ignored by the caller, which keeps waiting.
fn key_byte(key: &KeyEvent) -> Option<u8> {
    match key.code {
        KeyCode::Char(c) if c.is_ascii() => Some(c as u8),
        KeyCode::Enter => Some(b'\n'),
        KeyCode::Tab => Some(b'\t'),
        KeyCode::Backspace => Some(0x08),
        KeyCode::Esc => Some(0x1b),
        _ => None,
    }
}

fn ui(f: &mut Frame, view: &Screen) {
    let colors = config::colors();

    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .split(f.area());

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(root[1]);

    draw_tape(f, root[0], view, colors);
    draw_output(f, cols[0], view, colors);
    draw_code(f, cols[1], view, colors);
    draw_status(f, root[2], view, colors);
}

fn draw_tape(f: &mut Frame, area: Rect, view: &Screen, colors: &Colors) {
    let block = Block::default()
        .title("Tape")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.tape_border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let snap = view.snapshot;
    let mut spans: Vec<Span<'static>> = Vec::with_capacity(snap.cells.len());
    for (i, &value) in snap.cells.iter().enumerate() {
        let style = if i == snap.cell_ptr {
            Style::default()
                .fg(colors.tape_cell_active)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.tape_cell)
        };
        spans.push(Span::styled(format!("[{value}] "), style));
    }

    let caret = format!("{}^", " ".repeat(caret_column(snap.cells, snap.cell_ptr)));
    let caret_line = Line::from(Span::styled(
        caret,
        Style::default()
            .fg(colors.tape_pointer)
            .add_modifier(Modifier::BOLD),
    ));

    f.render_widget(Paragraph::new(vec![Line::from(spans), caret_line]), inner);
}

/// Column of the `^` marker: cells print as `[value] `, and the caret sits
/// under the first digit of the active cell.
fn caret_column(cells: &[u8], cell_ptr: usize) -> usize {
    1 + cells[..cell_ptr]
        .iter()
        .map(|v| v.to_string().len() + 3)
        .sum::<usize>()
}

fn draw_output(f: &mut Frame, area: Rect, view: &Screen, colors: &Colors) {
    let block = Block::default()
        .title("Output")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.output_border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = String::from_utf8_lossy(view.output).into_owned();
    f.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(colors.output_text))
            .wrap(Wrap { trim: false }),
        inner,
    );
}

fn draw_code(f: &mut Frame, area: Rect, view: &Screen, colors: &Colors) {
    let block = Block::default()
        .title("Code")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.code_border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    // The program counter has already advanced past the instruction that
    // just ran, so the highlight sits one byte back.
    let current = view.snapshot.pc.saturating_sub(1);
    let lines = code_lines(view.snapshot.program, current, colors);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn code_lines(program: &[u8], current: usize, colors: &Colors) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    for (i, &byte) in program.iter().enumerate() {
        if byte == b'\n' {
            lines.push(Line::from(std::mem::take(&mut spans)));
            continue;
        }
        let style = if i == current {
            Style::default()
                .fg(colors.code_active)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(colors.code_text)
        };
        let ch = if byte.is_ascii_graphic() || byte == b' ' {
            byte as char
        } else {
            ' '
        };
        spans.push(Span::styled(ch.to_string(), style));
    }
    lines.push(Line::from(spans));
    lines
}

fn draw_status(f: &mut Frame, area: Rect, view: &Screen, colors: &Colors) {
    let block = Block::default().borders(Borders::TOP);
    let inner = block.inner(area);
    f.render_widget(block, area);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            view.prompt,
            Style::default().fg(colors.status_text),
        ))),
        inner,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Position;

    fn render(
        program: &[u8],
        pc: usize,
        cells: &[u8],
        cell_ptr: usize,
        output: &[u8],
        prompt: &str,
    ) -> Buffer {
        let snapshot = Snapshot {
            program,
            pc,
            cells,
            cell_ptr,
        };
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal
            .draw(|f| {
                ui(
                    f,
                    &Screen {
                        snapshot: &snapshot,
                        output,
                        prompt,
                    },
                )
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell(Position::new(x, y)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn tape_pane_prints_cells_with_aligned_caret() {
        let buf = render(b"+++.", 1, &[1, 0, 0, 0], 0, b"", CONTINUE_PROMPT);
        assert!(row_text(&buf, 1).contains("[1] [0] [0] [0]"));
        // Border column 0, then "[": the caret lands under the digit.
        assert_eq!(row_text(&buf, 2).chars().nth(2), Some('^'));
    }

    #[test]
    fn caret_column_accounts_for_value_widths() {
        assert_eq!(caret_column(&[0, 0, 0, 0], 0), 1);
        assert_eq!(caret_column(&[0, 0, 0, 0], 2), 9);
        assert_eq!(caret_column(&[100, 2, 3], 2), 11);
    }

    #[test]
    fn code_pane_reverses_the_executed_instruction() {
        let buf = render(b"+++.", 1, &[1, 0, 0, 0], 0, b"", CONTINUE_PROMPT);
        // Middle row starts at y=4; the code pane is the right half, so its
        // first inner cell is (21, 5).
        let current = buf.cell(Position::new(21, 5)).unwrap();
        assert_eq!(current.symbol(), "+");
        assert!(current.modifier.contains(Modifier::REVERSED));

        let next = buf.cell(Position::new(22, 5)).unwrap();
        assert_eq!(next.symbol(), "+");
        assert!(!next.modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn output_pane_shows_emitted_bytes() {
        let buf = render(b"+.", 2, &[1, 0, 0, 0], 0, b"Hi", CONTINUE_PROMPT);
        assert!(row_text(&buf, 5).contains("Hi"));
    }

    #[test]
    fn status_line_carries_the_prompt() {
        let buf = render(b"+", 1, &[1, 0, 0, 0], 0, b"", QUIT_PROMPT);
        assert!(row_text(&buf, 11).contains(QUIT_PROMPT));
    }

    #[test]
    fn code_lines_split_on_newlines() {
        let lines = code_lines(b"++\n--", 3, config::colors());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 2);
        assert_eq!(lines[1].spans.len(), 2);
    }

    #[test]
    fn key_byte_maps_printable_keys() {
        use crossterm::event::KeyModifiers;
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(key_byte(&press(KeyCode::Char('Z'))), Some(b'Z'));
        assert_eq!(key_byte(&press(KeyCode::Enter)), Some(b'\n'));
        assert_eq!(key_byte(&press(KeyCode::F(5))), None);
    }
}
