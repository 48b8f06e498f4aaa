//! Platform-specific key bindings

use crossterm::event::KeyModifiers;

/// Modifier for the switch between login and register
/// - macOS: SUPER (Cmd key)
/// - Linux/Windows: CONTROL (Ctrl key)
#[cfg(target_os = "macos")]
pub const SWITCH_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const SWITCH_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// Shortcut display for the login/register switch
#[cfg(target_os = "macos")]
pub const SWITCH_AUTH_SHORTCUT: &str = "Cmd+R";

#[cfg(not(target_os = "macos"))]
pub const SWITCH_AUTH_SHORTCUT: &str = "Ctrl+R";

/// Inserts a line break in multi-line fields, where Enter still advances
pub const NEWLINE_MODIFIER: KeyModifiers = KeyModifiers::ALT;

/// Line break shortcut display
pub const NEWLINE_SHORTCUT: &str = "Alt+Enter";
