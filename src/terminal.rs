use crate::colors::ColorState;
use asciifx::engine::{CellMetrics, Dimensions, FrameSink, LoopCommand, PixelArea};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Stdout, Write};
use std::time::Duration;

/// Full-screen display sink: alternate screen, raw mode, tinted glyphs
pub struct TerminalSink {
    out: Stdout,
    cell: CellMetrics,
    colors: ColorState,
    /// Terminal size and frame size at the last publish; a change forces a full clear
    layout: Option<((u16, u16), Dimensions)>,
}

impl TerminalSink {
    /// Initialize the terminal for drawing
    pub fn new(cell: CellMetrics, colors: ColorState) -> io::Result<Self> {
        let mut out = stdout();
        enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(Self {
            out,
            cell,
            colors,
            layout: None,
        })
    }
}

impl FrameSink for TerminalSink {
    fn area(&mut self) -> io::Result<PixelArea> {
        let (cols, rows) = size()?;
        Ok(self.cell.area_of(cols, rows))
    }

    /// Centre the frame, clipping whatever does not fit
    fn publish(&mut self, frame: &str, dims: Dimensions) -> io::Result<()> {
        let (cols, rows) = size()?;
        if self.layout != Some(((cols, rows), dims)) {
            queue!(self.out, ResetColor, Clear(ClearType::All))?;
            self.layout = Some(((cols, rows), dims));
        }

        let (x0, skip_x) = centre(cols as usize, dims.width);
        let (y0, skip_y) = centre(rows as usize, dims.height);
        let visible_cols = dims.width.min(cols as usize);

        let mut current = None;
        for (i, line) in frame.lines().skip(skip_y).take(rows as usize).enumerate() {
            queue!(self.out, MoveTo(x0 as u16, (y0 + i) as u16))?;
            for ch in line.chars().skip(skip_x).take(visible_cols) {
                let tint = self.colors.tint(ch);
                if tint != current {
                    queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;
                    if let Some((color, bold)) = tint {
                        if bold {
                            queue!(self.out, SetAttribute(Attribute::Bold))?;
                        }
                        queue!(self.out, SetForegroundColor(color))?;
                    }
                    current = tint;
                }
                queue!(self.out, Print(ch))?;
            }
        }
        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;
        self.out.flush()
    }

    /// Check for keypress (non-blocking). Colour keys are handled here and never reach the loop.
    fn poll_command(&mut self) -> io::Result<Option<LoopCommand>> {
        while poll(Duration::from_millis(0))? {
            let Event::Key(key) = read()? else {
                continue;
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            if self.colors.handle_key(key.code) {
                continue;
            }
            if let Some(cmd) = command_for_key(key.code, key.modifiers) {
                return Ok(Some(cmd));
            }
        }
        Ok(None)
    }
}

impl Drop for TerminalSink {
    fn drop(&mut self) {
        let _ = execute!(self.out, ResetColor, Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Offset of a `len`-long span centred in `avail`: (screen offset, cells clipped from the start)
fn centre(avail: usize, len: usize) -> (usize, usize) {
    if len <= avail {
        ((avail - len) / 2, 0)
    } else {
        (0, (len - avail) / 2)
    }
}

/// Number keys: change speed (1=fastest, 9=slowest, 0=the effect's own pace)
fn speed_preset(n: u32) -> Option<Duration> {
    let ms = match n {
        1 => 5,
        2 => 10,
        3 => 20,
        4 => 30,
        5 => 50,
        6 => 70,
        7 => 100,
        8 => 150,
        9 => 200,
        _ => return None,
    };
    Some(Duration::from_millis(ms))
}

pub fn command_for_key(code: KeyCode, modifiers: KeyModifiers) -> Option<LoopCommand> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(LoopCommand::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(LoopCommand::Quit),
        KeyCode::Char(' ') => Some(LoopCommand::TogglePause),
        KeyCode::Char('0') => Some(LoopCommand::ResetInterval),
        KeyCode::Char(c) => c.to_digit(10).and_then(speed_preset).map(LoopCommand::SetInterval),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        assert_eq!(command_for_key(KeyCode::Char('q'), KeyModifiers::NONE), Some(LoopCommand::Quit));
        assert_eq!(command_for_key(KeyCode::Esc, KeyModifiers::NONE), Some(LoopCommand::Quit));
        assert_eq!(command_for_key(KeyCode::Char('c'), KeyModifiers::CONTROL), Some(LoopCommand::Quit));
        assert_eq!(command_for_key(KeyCode::Char('c'), KeyModifiers::NONE), None);
    }

    #[test]
    fn test_speed_keys() {
        assert_eq!(
            command_for_key(KeyCode::Char('1'), KeyModifiers::NONE),
            Some(LoopCommand::SetInterval(Duration::from_millis(5)))
        );
        assert_eq!(
            command_for_key(KeyCode::Char('9'), KeyModifiers::NONE),
            Some(LoopCommand::SetInterval(Duration::from_millis(200)))
        );
        assert_eq!(command_for_key(KeyCode::Char('0'), KeyModifiers::NONE), Some(LoopCommand::ResetInterval));
        assert_eq!(command_for_key(KeyCode::Char(' '), KeyModifiers::NONE), Some(LoopCommand::TogglePause));
    }

    #[test]
    fn test_centre_and_clip() {
        assert_eq!(centre(100, 80), (10, 0));
        assert_eq!(centre(80, 80), (0, 0));
        assert_eq!(centre(60, 80), (0, 10));
    }
}
