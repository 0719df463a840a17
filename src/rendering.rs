//! Terminal presentation of the glyph grid.
//!
//! Owns the terminal while the visualizer runs: alternate screen, raw mode
//! and a hidden cursor. Each frame only rewrites cells that changed since
//! the previous one, inside a synchronized update so the terminal never
//! shows a half-drawn frame.

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use log::{debug, warn};
use std::io::{self, Stdout, Write};
use std::time::Duration;

use crate::ascii::{GlyphCell, GlyphGrid};
use crate::color::Rgb;
use crate::params::AsciiParams;
use crate::viewport::Viewport;

/// Pixel viewport covered by a terminal of `cols` × `rows` cells
pub fn viewport_for(cols: u16, rows: u16, params: &AsciiParams) -> Viewport {
    Viewport::new(
        cols as u32 * params.cell_width,
        rows as u32 * params.cell_height,
    )
}

/// Whether a key event should end the session (q, Esc, Ctrl-C)
pub fn is_quit_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Queue the commands turning `previous` into `current`
///
/// Both grids must have the same size. Returns the number of cells written.
pub fn queue_diff<W: Write>(out: &mut W, previous: &GlyphGrid, current: &GlyphGrid) -> io::Result<usize> {
    let mut fg: Option<Rgb> = None;
    let mut written = 0;

    for row in 0..current.rows() {
        let before = previous.row(row);
        for (col, cell) in current.row(row).iter().enumerate() {
            if before.get(col) == Some(cell) {
                continue;
            }
            queue!(out, cursor::MoveTo(col as u16, row as u16))?;
            match cell {
                Some(GlyphCell { glyph, color }) => {
                    if fg != Some(*color) {
                        fg = Some(*color);
                        queue!(out, SetForegroundColor(to_color(*color)))?;
                    }
                    queue!(out, Print(*glyph))?;
                }
                None => queue!(out, Print(' '))?,
            }
            written += 1;
        }
    }
    Ok(written)
}

/// Full-screen glyph presenter on stdout
pub struct TerminalRenderer {
    out: Stdout,
    /// What the terminal currently shows
    previous: GlyphGrid,
}

impl TerminalRenderer {
    /// Take over the terminal
    pub fn new() -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        crossterm::execute!(out, EnterAlternateScreen, cursor::Hide, DisableLineWrap)?;
        Ok(Self {
            out,
            previous: GlyphGrid::default(),
        })
    }

    /// Current pixel viewport derived from the terminal size
    pub fn viewport(&self, params: &AsciiParams) -> io::Result<Viewport> {
        let (cols, rows) = terminal::size()?;
        Ok(viewport_for(cols, rows, params))
    }

    /// Draw `grid`, rewriting only what changed
    pub fn present(&mut self, grid: &GlyphGrid) -> io::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        if grid.cols() != self.previous.cols() || grid.rows() != self.previous.rows() {
            debug!("Terminal grid resized to {}x{}", grid.cols(), grid.rows());
            queue!(self.out, ResetColor, terminal::Clear(ClearType::All))?;
            self.previous = GlyphGrid::new(grid.cols(), grid.rows());
        }

        queue_diff(&mut self.out, &self.previous, grid)?;
        queue!(self.out, EndSynchronizedUpdate)?;
        self.out.flush()?;

        self.previous.clone_from(grid);
        Ok(())
    }

    /// Drain pending input; true when the user asked to quit
    pub fn poll_quit(&mut self) -> io::Result<bool> {
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && is_quit_key(key.code, key.modifiers) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn restore(&mut self) -> io::Result<()> {
        crossterm::execute!(
            self.out,
            ResetColor,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}
