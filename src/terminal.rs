use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{self, Stylize},
    terminal,
};
use std::{
    collections::HashMap,
    io::{self, stdout, Stdout, Write},
    time::{Duration, Instant},
};
use vip8_core::{Beeper, Display, Framebuffer, HostCommand, Keyboard, Keypad, KEY_COUNT};

/// Left-hand block of a qwerty keyboard laid over the hex keypad:
/// `1 2 3 C / 4 5 6 D / 7 8 9 E / A 0 B F`.
const KEYMAP: [(char, u8); KEY_COUNT] = [
    ('x', 0x0),
    ('1', 0x1),
    ('2', 0x2),
    ('3', 0x3),
    ('q', 0x4),
    ('w', 0x5),
    ('e', 0x6),
    ('a', 0x7),
    ('s', 0x8),
    ('d', 0x9),
    ('z', 0xA),
    ('c', 0xB),
    ('4', 0xC),
    ('r', 0xD),
    ('f', 0xE),
    ('v', 0xF),
];

/// Terminals that only report presses get keys held this long.
const KEY_HOLD: Duration = Duration::from_millis(150);

pub struct TerminalDisplay {
    stdout: Stdout,
    shown: Option<Framebuffer>,
}

impl TerminalDisplay {
    pub fn new() -> io::Result<Self> {
        let mut stdout = stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All),
            cursor::Hide
        )?;
        Ok(Self {
            stdout,
            shown: None,
        })
    }
}

impl Display for TerminalDisplay {
    fn present(&mut self, framebuffer: &Framebuffer) -> io::Result<()> {
        for (y, row) in framebuffer.rows().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if let Some(shown) = &self.shown {
                    if shown.pixel(x, y) == *cell {
                        continue;
                    }
                }
                queue!(self.stdout, cursor::MoveTo(x as u16 * 2, y as u16))?;
                if *cell == 1 {
                    queue!(self.stdout, style::PrintStyledContent("██".yellow()))?
                } else {
                    queue!(self.stdout, style::PrintStyledContent("  ".black()))?
                }
            }
        }
        self.stdout.flush()?;
        self.shown = Some(framebuffer.clone());
        Ok(())
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
    }
}

pub struct TerminalKeyboard {
    keymap: HashMap<char, u8>,
    held_until: [Option<Instant>; KEY_COUNT],
    reports_release: bool,
}

impl TerminalKeyboard {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let reports_release = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if reports_release {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        log::debug!("key release events available: {reports_release}");
        Ok(Self {
            keymap: HashMap::from(KEYMAP),
            held_until: [None; KEY_COUNT],
            reports_release,
        })
    }

    fn handle_key(&mut self, event: KeyEvent, keypad: &mut Keypad) -> Option<HostCommand> {
        let pressed = matches!(event.kind, KeyEventKind::Press | KeyEventKind::Repeat);
        match event.code {
            KeyCode::Esc if pressed => Some(HostCommand::Quit),
            KeyCode::Char('c') if pressed && event.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(HostCommand::Quit)
            }
            KeyCode::F(5) if pressed => Some(HostCommand::Reset),
            KeyCode::Char(key) => {
                let Some(&mapped) = self.keymap.get(&key.to_ascii_lowercase()) else {
                    log::trace!("unmapped key {key:?}");
                    return None;
                };
                keypad.set_key(mapped, pressed);
                self.held_until[mapped as usize] = pressed.then(|| Instant::now() + KEY_HOLD);
                None
            }
            _ => None,
        }
    }

    fn release_expired(&mut self, keypad: &mut Keypad) {
        let now = Instant::now();
        for (key, held_until) in self.held_until.iter_mut().enumerate() {
            if held_until.is_some_and(|until| until <= now) {
                *held_until = None;
                keypad.set_key(key as u8, false);
            }
        }
    }
}

impl Keyboard for TerminalKeyboard {
    fn update_keystates(
        &mut self,
        keypad: &mut Keypad,
        budget: Duration,
    ) -> io::Result<HostCommand> {
        let deadline = Instant::now() + budget;
        let mut command = HostCommand::Continue;

        while event::poll(deadline.saturating_duration_since(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                if let Some(requested) = self.handle_key(key, keypad) {
                    command = requested;
                    break;
                }
            }
        }

        if !self.reports_release {
            self.release_expired(keypad);
        }
        Ok(command)
    }
}

impl Drop for TerminalKeyboard {
    fn drop(&mut self) {
        if self.reports_release {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = terminal::disable_raw_mode();
    }
}

/// Rings the terminal bell for each tone.
pub struct TerminalBell;

impl Beeper for TerminalBell {
    fn tone(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        stdout.write_all(b"\x07")?;
        stdout.flush()
    }
}
