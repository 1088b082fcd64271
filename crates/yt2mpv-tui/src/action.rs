//! Action enum: user intents and internal events flowing through the panel.

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Playlist,
    Controls,
    HelpOverlay,
}

/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Playlist ──────────────────────────────────────────────────────────────
    Refresh,
    PlayIndex(usize),
    Remove(String),
    /// `/control?action=<name>`.
    Control(String),

    // ── Enqueue ───────────────────────────────────────────────────────────────
    OpenPrompt,
    ClosePrompt,
    Enqueue(String),
    EnqueueClipboard,

    // ── Navigation ────────────────────────────────────────────────────────────
    FocusNext,
    FocusPane(ComponentId),

    // ── UI ────────────────────────────────────────────────────────────────────
    ToggleHelp,
    Quit,
    Resize(u16, u16),
    Noop,
}
