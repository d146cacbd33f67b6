//! Semantic application events — crossterm key events mapped to a
//! dashboard vocabulary so widgets never touch crossterm directly.
//!
//! In the main event loop, call [`to_app_event`] on every
//! [`crossterm::event::Event`] and match on the returned [`AppEvent`].
//!
//! # Keybindings
//!
//! | Key(s)                  | Event                      |
//! |-------------------------|----------------------------|
//! | `q`, `Ctrl+c`           | `Quit`                     |
//! | `Tab` / `Shift+Tab`     | `NextTab` / `PrevTab`      |
//! | `1` `2` `3`             | `SelectTab(n)`             |
//! | `s` / `S`               | `CycleSector(Forward/Back)`|
//! | `a` / `A`               | `CycleSubArea(Forward/Back)`|
//! | `p` / `P`               | `CyclePest(Forward/Back)`  |
//! | `r`                     | `ResetFilters`             |
//! | `PageUp`, `Ctrl+u`      | `ScrollUp`                 |
//! | `PageDown`, `Ctrl+d`    | `ScrollDown`               |
//! | `↑` / `k`, `↓` / `j`    | `Nav(Up)`, `Nav(Down)`     |
//! | `←` / `h`, `→` / `l`    | `Nav(Left)`, `Nav(Right)`  |
//! | other printable char    | `Char(c)` (`?`, `:`)       |
//! | `Backspace`             | `Backspace`                |
//! | `Enter`                 | `Enter`                    |
//! | terminal resize         | `Resize(w, h)`             |
//!
//! ## Insert mode
//!
//! While the command bar is open the loop calls [`to_app_event_insert`]:
//! every printable character is forwarded as `Char`, arrow keys still move
//! the cursor, and only `Ctrl+c`, `Escape`, `Enter` and `Backspace` keep
//! their special bindings.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Direction to step through a list of filter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Forward,
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    NextTab,
    PrevTab,
    /// Zero-based tab index.
    SelectTab(usize),
    CycleSector(Step),
    CycleSubArea(Step),
    CyclePest(Step),
    ResetFilters,
    ScrollUp,
    ScrollDown,
    Nav(Direction),
    Char(char),
    Backspace,
    Enter,
    Escape,
    Resize(u16, u16),
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`] (normal mode).
///
/// Returns `None` for events with no meaning to the dashboard (mouse
/// events, unbound keys).
pub fn to_app_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key(key),
        _ => None,
    }
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`] for the command bar.
pub fn to_app_event_insert(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key_insert(key),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    let plain = key.modifiers == Mod::NONE;
    let shifted = key.modifiers == Mod::SHIFT;

    match key.code {
        Char('q') if plain => Some(AppEvent::Quit),
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        Tab if plain => Some(AppEvent::NextTab),
        BackTab => Some(AppEvent::PrevTab),
        Char(c @ '1'..='3') if plain => Some(AppEvent::SelectTab(c as usize - '1' as usize)),

        // Uppercase letters may or may not carry SHIFT depending on the
        // terminal; match on the code alone.
        Char('s') if plain => Some(AppEvent::CycleSector(Step::Forward)),
        Char('S') => Some(AppEvent::CycleSector(Step::Back)),
        Char('a') if plain => Some(AppEvent::CycleSubArea(Step::Forward)),
        Char('A') => Some(AppEvent::CycleSubArea(Step::Back)),
        Char('p') if plain => Some(AppEvent::CyclePest(Step::Forward)),
        Char('P') => Some(AppEvent::CyclePest(Step::Back)),
        Char('r') if plain => Some(AppEvent::ResetFilters),

        PageUp => Some(AppEvent::ScrollUp),
        PageDown => Some(AppEvent::ScrollDown),
        Char('u') if key.modifiers == Mod::CONTROL => Some(AppEvent::ScrollUp),
        Char('d') if key.modifiers == Mod::CONTROL => Some(AppEvent::ScrollDown),

        Up | Char('k') if plain => Some(AppEvent::Nav(Direction::Up)),
        Down | Char('j') if plain => Some(AppEvent::Nav(Direction::Down)),
        Left | Char('h') if plain => Some(AppEvent::Nav(Direction::Left)),
        Right | Char('l') if plain => Some(AppEvent::Nav(Direction::Right)),

        Char(c) if plain || shifted => Some(AppEvent::Char(c)),

        Backspace if plain => Some(AppEvent::Backspace),
        Enter if plain => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

fn map_key_insert(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        Up => Some(AppEvent::Nav(Direction::Up)),
        Down => Some(AppEvent::Nav(Direction::Down)),
        Left => Some(AppEvent::Nav(Direction::Left)),
        Right => Some(AppEvent::Nav(Direction::Right)),

        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
