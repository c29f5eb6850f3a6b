//! Output rendering for gemterm.
//!
//! Defines the [`Renderer`] trait that decouples the chat loop from the
//! display. [`TerminalRenderer`] keeps a live region at the bottom of the
//! terminal: a spinner while the first fragment is pending, then the reply
//! re-rendered as markdown in place, throttled to [`REFRESH_INTERVAL`]. When a
//! turn completes the live region is replaced by one static rendering.

use colored::Colorize;
use crossterm::cursor::{MoveTo, MoveToColumn, MoveUp};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, IsTerminal, Write};
use std::time::Instant;

use crate::constants::{
    API_KEY_ENV, ASSISTANT_LABEL, BANNER_SUBTITLE, BANNER_TITLE, FALLBACK_TERMINAL_HEIGHT,
    FALLBACK_TERMINAL_WIDTH, REFRESH_INTERVAL, SEPARATOR_WIDTH, SPINNER_FRAMES, THINKING_TEXT,
};
use crate::error::ChatError;
use crate::format;

/// Display side of the chat loop.
pub trait Renderer {
    /// Prints the assistant label and starts the waiting indicator.
    fn begin_turn(&mut self);

    /// Periodic timer callback: animates the spinner, flushes throttled updates.
    fn tick(&mut self);

    /// The accumulated reply so far.
    fn update(&mut self, text: &str);

    /// Replaces the live region with the final rendering of `text`.
    fn finish(&mut self, text: &str);

    /// Clears the live region and reports a failed turn.
    fn fail(&mut self, err: &ChatError);

    /// Clears the live region without printing anything.
    fn abort(&mut self);

    /// Prints the goodbye line.
    fn farewell(&mut self);
}

/// Terminal dimensions used for wrapping and cropping.
#[derive(Debug, Clone, Copy)]
pub enum Viewport {
    /// Query the real terminal on every draw.
    Terminal,
    /// Fixed `(columns, rows)`.
    #[cfg(test)]
    Fixed(usize, usize),
}

impl Viewport {
    fn size(self) -> (usize, usize) {
        let (w, h) = match self {
            Viewport::Terminal => terminal_size::terminal_size()
                .map(|(w, h)| (w.0 as usize, h.0 as usize))
                .unwrap_or((FALLBACK_TERMINAL_WIDTH, FALLBACK_TERMINAL_HEIGHT)),
            #[cfg(test)]
            Viewport::Fixed(w, h) => (w, h),
        };
        (w.max(1), h.max(2))
    }
}

/// Renders streamed replies to a terminal (or any writer).
pub struct TerminalRenderer<W: Write> {
    out: W,
    viewport: Viewport,
    /// Whether cursor movement and live redraws are allowed.
    interactive: bool,
    /// Rows occupied by the live region; the cursor sits on its last row.
    live_rows: usize,
    waiting: bool,
    spinner_frame: usize,
    pending: Option<String>,
    last_draw: Option<Instant>,
}

impl TerminalRenderer<io::Stdout> {
    /// Renderer on stdout; live updates only when stdout is a terminal.
    pub fn stdout() -> Self {
        let interactive = io::stdout().is_terminal();
        Self::new(io::stdout(), Viewport::Terminal, interactive)
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, viewport: Viewport, interactive: bool) -> Self {
        Self {
            out,
            viewport,
            interactive,
            live_rows: 0,
            waiting: false,
            spinner_frame: 0,
            pending: None,
            last_draw: None,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Mutable access to the underlying writer, for startup messages.
    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn width(&self) -> usize {
        self.viewport.size().0
    }

    /// Moves to the top of the live region and clears everything below.
    fn erase_region(&mut self) -> io::Result<()> {
        if self.live_rows == 0 {
            return Ok(());
        }
        queue!(self.out, MoveToColumn(0))?;
        if self.live_rows > 1 {
            let up = u16::try_from(self.live_rows - 1).unwrap_or(u16::MAX);
            queue!(self.out, MoveUp(up))?;
        }
        queue!(self.out, Clear(ClearType::FromCursorDown))?;
        self.live_rows = 0;
        Ok(())
    }

    /// Redraws the live region with `content`, cropped to the terminal height.
    fn draw_region(&mut self, content: &str) -> io::Result<()> {
        let (width, height) = self.viewport.size();
        self.erase_region()?;

        // Rows above the screen top can't be reached again with MoveUp, so
        // only the tail that fits is drawn.
        let max_rows = height - 1;
        let mut lines: Vec<&str> = content.split('\n').collect();
        while lines.len() > 1 && format::visual_rows(&lines.join("\n"), width) > max_rows {
            lines.remove(0);
        }
        let visible = lines.join("\n");

        write!(self.out, "{visible}")?;
        self.out.flush()?;
        self.live_rows = format::visual_rows(&visible, width);
        self.last_draw = Some(Instant::now());
        Ok(())
    }

    fn draw_spinner(&mut self) -> io::Result<()> {
        let frame = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
        let line = format!("{} {}", frame.cyan(), THINKING_TEXT.cyan());
        self.draw_region(&line)
    }

    fn draw_markdown(&mut self, text: &str) -> io::Result<()> {
        let rendered = format::render_markdown(text, self.width());
        self.draw_region(&rendered)
    }

    fn reset(&mut self) {
        self.waiting = false;
        self.pending = None;
        self.last_draw = None;
        self.spinner_frame = 0;
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn begin_turn(&mut self) {
        self.reset();
        writeln!(self.out, "{}", ASSISTANT_LABEL.cyan().bold()).ok();
        if self.interactive {
            self.waiting = true;
            self.draw_spinner().ok();
        }
        self.out.flush().ok();
    }

    fn tick(&mut self) {
        if !self.interactive {
            return;
        }
        if self.waiting {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
            self.draw_spinner().ok();
        } else if let Some(text) = self.pending.take() {
            self.draw_markdown(&text).ok();
        }
    }

    fn update(&mut self, text: &str) {
        if !self.interactive {
            return;
        }
        // The first fragment replaces the spinner right away.
        let first = std::mem::replace(&mut self.waiting, false);
        let due = first
            || self
                .last_draw
                .map_or(true, |at| at.elapsed() >= REFRESH_INTERVAL);
        if due {
            self.pending = None;
            self.draw_markdown(text).ok();
        } else {
            self.pending = Some(text.to_string());
        }
    }

    fn finish(&mut self, text: &str) {
        self.erase_region().ok();
        let rendered = format::render_markdown(text, self.width());
        writeln!(self.out, "{rendered}").ok();
        writeln!(self.out).ok();
        self.out.flush().ok();
        self.reset();
    }

    fn fail(&mut self, err: &ChatError) {
        self.erase_region().ok();
        writeln!(
            self.out,
            "{}",
            format!("An error occurred: {err}").red().bold()
        )
        .ok();
        if err.is_auth_failure() {
            writeln!(
                self.out,
                "{}",
                format!("hint: check that {API_KEY_ENV} holds a valid key").dimmed()
            )
            .ok();
        }
        self.out.flush().ok();
        self.reset();
    }

    fn abort(&mut self) {
        self.erase_region().ok();
        self.out.flush().ok();
        self.reset();
    }

    fn farewell(&mut self) {
        writeln!(self.out).ok();
        writeln!(self.out, "{}", "Goodbye!".blue().bold()).ok();
        self.out.flush().ok();
    }
}

/// Clears the screen and homes the cursor.
pub fn clear_screen(out: &mut impl Write) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    out.flush()
}

/// Prints the boxed startup banner.
pub fn print_banner(out: &mut impl Write) -> io::Result<()> {
    let inner = BANNER_TITLE.chars().count().max(BANNER_SUBTITLE.chars().count()) + 4;
    let pad = |text: &str| " ".repeat(inner - 2 - text.chars().count());
    let side = "│".blue();
    let blank = format!("{side}{}{side}", " ".repeat(inner));

    writeln!(out, "{}", format!("╭{}╮", "─".repeat(inner)).blue())?;
    writeln!(out, "{blank}")?;
    writeln!(
        out,
        "{side}  {}{}{side}",
        BANNER_TITLE.cyan().bold(),
        pad(BANNER_TITLE)
    )?;
    writeln!(
        out,
        "{side}  {}{}{side}",
        BANNER_SUBTITLE.dimmed(),
        pad(BANNER_SUBTITLE)
    )?;
    writeln!(out, "{blank}")?;
    writeln!(out, "{}", format!("╰{}╯", "─".repeat(inner)).blue())
}

/// Prints the connection notice, exit hint, and separator.
pub fn print_ready(out: &mut impl Write, model: &str) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        format!("Successfully connected to {model}!").green()
    )?;
    writeln!(out)?;
    writeln!(out, "{}", "Type 'exit', 'quit' to stop.".yellow().bold())?;
    writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer(interactive: bool) -> TerminalRenderer<Vec<u8>> {
        colored::control::set_override(false);
        TerminalRenderer::new(Vec::new(), Viewport::Fixed(40, 10), interactive)
    }

    fn text(r: TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(r.into_inner()).unwrap()
    }

    #[test]
    fn test_non_interactive_prints_only_final() {
        let mut r = renderer(false);
        r.begin_turn();
        r.update("Hi");
        r.tick();
        r.update("Hi there!");
        r.finish("Hi there!");
        assert_eq!(text(r), "Gemini:\nHi there!\n\n");
    }

    #[test]
    fn test_interactive_shows_spinner_then_final() {
        let mut r = renderer(true);
        r.begin_turn();
        r.tick();
        r.update("Hi");
        r.finish("Hi there!");
        let out = text(r);
        assert!(out.starts_with("Gemini:\n"));
        assert!(out.contains(THINKING_TEXT));
        assert!(out.contains(SPINNER_FRAMES[1]));
        assert!(out.ends_with("Hi there!\n\n"));
    }

    #[test]
    fn test_updates_are_throttled() {
        let mut r = renderer(true);
        r.begin_turn();
        r.update("Hi");
        assert!(r.pending.is_none());
        r.update("Hi there");
        assert_eq!(r.pending.as_deref(), Some("Hi there"));
        r.tick();
        assert!(r.pending.is_none());
    }

    #[test]
    fn test_live_region_tracks_rows_and_crops() {
        let mut r = renderer(true);
        r.begin_turn();
        assert_eq!(r.live_rows, 1);
        let tall: Vec<String> = (0..30).map(|i| format!("line {i}")).collect();
        r.draw_markdown(&tall.join("\n")).unwrap();
        assert_eq!(r.live_rows, 9);
        r.abort();
        assert_eq!(r.live_rows, 0);
        let out = text(r);
        assert!(out.contains("line 29"));
        assert!(!out.contains("line 20\n"));
    }

    #[test]
    fn test_live_region_rows_for_wide_text() {
        let mut r = renderer(true);
        r.begin_turn();
        // 60 columns of CJK on a 40-column terminal wraps onto two rows.
        r.update(&"你".repeat(30));
        assert_eq!(r.live_rows, 2);
        r.finish(&"你".repeat(30));
        assert_eq!(r.live_rows, 0);
        let out = text(r);
        // Erasing a two-row region moves up exactly one row.
        assert!(out.contains("\x1b[1A"));
    }

    #[test]
    fn test_fail_reports_error_and_hint() {
        let mut r = renderer(true);
        r.begin_turn();
        r.fail(&ChatError::Stream("API key not valid".into()));
        let out = text(r);
        assert!(out.contains("An error occurred: API key not valid"));
        assert!(out.contains("hint: check that GEMINI_API_KEY"));
    }

    #[test]
    fn test_banner_and_ready() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        print_banner(&mut out).unwrap();
        print_ready(&mut out, "gemini-2.5-flash").unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains(BANNER_TITLE));
        assert!(out.contains(BANNER_SUBTITLE));
        assert!(out.contains("Successfully connected to gemini-2.5-flash!"));
        assert!(out.contains("Type 'exit', 'quit' to stop."));
        let widths: Vec<usize> = out
            .lines()
            .take(6)
            .map(|l| l.chars().count())
            .collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }
}
