use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{bail, Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Stylize;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};
use log::{debug, info};

use crate::{Cell, Coords, TermInt};
use crate::render::{DrawCommand, Glyph};

const SNAKE_BODY: &str = "██";
const FOOD: &str = "()";
const DEAD_SNAKE: &str = "XX";
const EMPTY: &str = "· ";

/// Owns the terminal while the game runs: raw mode, the alternate screen,
/// reading keys and drawing frames.
pub struct TermManager {
    stdout: Stdout,
    board_cells: TermInt,
    active: bool,
}

impl TermManager {
    pub fn new(board_cells: i32) -> Self {
        TermManager { stdout: stdout(), board_cells: board_cells as TermInt, active: false }
    }

    /// Columns and rows a frame needs: the bordered board plus a status line.
    pub fn required_size(&self) -> Coords {
        (self.board_cells * 2 + 2, self.board_cells + 3)
    }

    pub fn setup(&mut self) -> Result<()> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        let (need_w, need_h) = self.required_size();
        if width < need_w || height < need_h {
            bail!("Terminal is {}x{}, the game needs at least {}x{}", width, height, need_w, need_h);
        }

        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        self.active = true;
        terminal::enable_raw_mode().context("Error enabling raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking, terminal::Clear(ClearType::All))
            .context("Error preparing the screen")?;

        info!("Terminal ready ({}x{})", width, height);
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        terminal::disable_raw_mode().context("Error disabling raw mode")?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("Error leaving alt screen")?;

        debug!("Terminal restored");
        Ok(())
    }

    /// Waits up to `timeout` for a key, then drains whatever else is queued.
    pub fn read_key_events(&self, timeout: Duration) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait).context("Error polling for input")? {
            if let Event::Key(ev) = read().context("Error reading input")? {
                events.push(ev);
            }
            wait = Duration::ZERO;
        }

        Ok(events)
    }

    pub fn draw(&mut self, frame: &[DrawCommand]) -> Result<()> {
        for cmd in frame {
            match cmd {
                DrawCommand::Border { cells } => self.draw_border(*cells as TermInt)?,
                DrawCommand::Cell { cell, glyph } => self.draw_cell(*cell, *glyph)?,
                DrawCommand::Status(text) => self.draw_status(text)?,
                DrawCommand::Message(lines) => self.show_message(lines)?,
            }
        }

        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_border(&mut self, cells: TermInt) -> Result<()> {
        let width = cells * 2 + 2;
        let height = cells + 2;
        let end_y = height - 1;

        for x in 0..width {
            let ch = if x == 0 || x == width - 1 {'+'} else {'-'};
            self.print_at((x, 0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in 1..height - 1 {
            self.print_at((0, y), '|')?;
            self.print_at((width - 1, y), '|')?;
        }

        Ok(())
    }

    fn draw_cell(&mut self, cell: Cell, glyph: Glyph) -> Result<()> {
        let pos = (1 + cell.x as TermInt * 2, 1 + cell.y as TermInt);

        let content = match glyph {
            Glyph::Empty => EMPTY.dark_grey(),
            Glyph::Food => FOOD.red().bold(),
            Glyph::Body => SNAKE_BODY.magenta(),
            Glyph::Dead => DEAD_SNAKE.dark_red(),
            Glyph::Head(dir) => {
                let ch = dir.head_char();
                return self.print_styled_at(pos, format!("{}{}", ch, ch).magenta().bold());
            }
        };

        self.print_styled_at(pos, content)
    }

    fn draw_status(&mut self, text: &str) -> Result<()> {
        let y = self.board_cells + 2;
        queue!(
            self.stdout,
            cursor::MoveTo(0, y),
            style::Print(text),
            terminal::Clear(ClearType::UntilNewLine)
        )
        .context("Error drawing status line")
    }

    /// Draws `lines` in a box centred over the board. The next frame paints
    /// the board back over it.
    fn show_message(&mut self, lines: &[String]) -> Result<()> {
        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let (board_w, board_h) = (self.board_cells * 2 + 2, self.board_cells + 2);
        let center = (board_w / 2, board_h / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        // Print the top and bottom empty lines
        let blank = " ".repeat(msg_width as usize);
        for y in [top_left.1, top_left.1 + msg_height - 1] {
            self.print_str_at((top_left.0, y), &blank)?;
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            self.print_str_at((top_left.0, y), &padded_line)?;
        }

        Ok(())
    }

    fn print_at(&mut self, pos: Coords, ch: char) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch)).context("Error drawing")
    }

    fn print_str_at(&mut self, pos: Coords, text: &str) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(text)).context("Error drawing")
    }

    fn print_styled_at<D: std::fmt::Display>(&mut self, pos: Coords, content: style::StyledContent<D>) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::PrintStyledContent(content))
            .context("Error drawing")
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        // Leave the user's terminal usable even when the game bails out early
        let _ = self.restore();
    }
}
