use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    ToggleUi,
    ToggleLog,
    // Hierarchy panel
    SelectUp,
    SelectDown,
    Descend,
    TraverseUp,
    InspectSelected,
    InspectCurrent,
    EditSearch,
    CancelSearch,
    EditLimit,
    PrevPage,
    NextPage,
    PrevContainer,
    NextContainer,
    // Picking
    TogglePicker,
    // Inspection windows
    CycleWindow,
    CycleWindowBack,
    CloseWindow,
    ScrollWindowUp,
    ScrollWindowDown,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::ToggleUi => "Show / hide inspector",
            Action::ToggleLog => "Show / hide log",
            Action::SelectUp => "Select previous row",
            Action::SelectDown => "Select next row",
            Action::Descend => "Browse children of selected",
            Action::TraverseUp => "Browse parent",
            Action::InspectSelected => "Inspect selected",
            Action::InspectCurrent => "Inspect current node",
            Action::EditSearch => "Search",
            Action::CancelSearch => "Cancel search",
            Action::EditLimit => "Edit page limit",
            Action::PrevPage => "Previous page",
            Action::NextPage => "Next page",
            Action::PrevContainer => "Previous scene",
            Action::NextContainer => "Next scene",
            Action::TogglePicker => "Toggle mouse picking",
            Action::CycleWindow => "Focus next window",
            Action::CycleWindowBack => "Focus previous window",
            Action::CloseWindow => "Close focused window",
            Action::ScrollWindowUp => "Scroll window up",
            Action::ScrollWindowDown => "Scroll window down",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    /// Shift is ignored for character keys: terminals disagree on whether
    /// `<` arrives with it.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        if key.code != self.code {
            return false;
        }
        match self.code {
            KeyCode::Char(_) => {
                key.modifiers.difference(KeyModifiers::SHIFT)
                    == self.mods.difference(KeyModifiers::SHIFT)
            }
            _ => key.modifiers == self.mods,
        }
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "Shift+Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(Quit, KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        kb.add(ToggleUi, KeyCombo::plain(KeyCode::F(7)));
        kb.add(ToggleLog, KeyCombo::plain(KeyCode::F(12)));
        // Hierarchy panel
        kb.add(SelectUp, KeyCombo::plain(KeyCode::Up));
        kb.add(SelectDown, KeyCombo::plain(KeyCode::Down));
        kb.add(Descend, KeyCombo::plain(KeyCode::Enter));
        kb.add(TraverseUp, KeyCombo::plain(KeyCode::Backspace));
        kb.add(TraverseUp, KeyCombo::plain(KeyCode::Left));
        kb.add(InspectSelected, KeyCombo::plain(KeyCode::Char('i')));
        kb.add(InspectCurrent, KeyCombo::plain(KeyCode::Char('c')));
        kb.add(EditSearch, KeyCombo::plain(KeyCode::Char('/')));
        kb.add(CancelSearch, KeyCombo::plain(KeyCode::Esc));
        kb.add(EditLimit, KeyCombo::plain(KeyCode::Char('l')));
        kb.add(PrevPage, KeyCombo::plain(KeyCode::PageUp));
        kb.add(PrevPage, KeyCombo::plain(KeyCode::Char('[')));
        kb.add(NextPage, KeyCombo::plain(KeyCode::PageDown));
        kb.add(NextPage, KeyCombo::plain(KeyCode::Char(']')));
        kb.add(PrevContainer, KeyCombo::plain(KeyCode::Char('<')));
        kb.add(NextContainer, KeyCombo::plain(KeyCode::Char('>')));
        // Picking
        kb.add(TogglePicker, KeyCombo::plain(KeyCode::Char('p')));
        // Inspection windows
        kb.add(CycleWindow, KeyCombo::plain(KeyCode::Tab));
        kb.add(CycleWindowBack, KeyCombo::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        kb.add(CycleWindowBack, KeyCombo::plain(KeyCode::BackTab));
        kb.add(CloseWindow, KeyCombo::plain(KeyCode::Char('x')));
        kb.add(ScrollWindowUp, KeyCombo::new(KeyCode::Up, KeyModifiers::SHIFT));
        kb.add(ScrollWindowDown, KeyCombo::new(KeyCode::Down, KeyModifiers::SHIFT));
        kb
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.map
            .get(&action)
            .is_some_and(|list| list.iter().any(|c| c.matches(key)))
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        self.map
            .iter()
            .find(|(_, list)| list.iter().any(|c| c.matches(key)))
            .map(|(action, _)| *action)
    }

    /// Display strings for every combo mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }

    /// Compact `key action` hint, e.g. for the status bar.
    pub fn hint(&self, action: Action) -> Option<String> {
        let combo = self.map.get(&action)?.first()?;
        Some(format!("{} {}", combo.display(), action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    #[test]
    fn defaults_match_quit() {
        let kb = KeyBindings::default();
        let ev = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(kb.matches(Action::Quit, &ev));
        let plain = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(!kb.matches(Action::Quit, &plain));
    }

    #[test]
    fn shifted_chars_still_match() {
        let kb = KeyBindings::default();
        let ev = KeyEvent::new(KeyCode::Char('>'), KeyModifiers::SHIFT);
        assert_eq!(kb.action_for_key(&ev), Some(Action::NextContainer));
    }

    #[test]
    fn shift_arrows_scroll_windows() {
        let kb = KeyBindings::default();
        let ev = KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT);
        assert_eq!(kb.action_for_key(&ev), Some(Action::ScrollWindowDown));
        let ev = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(kb.action_for_key(&ev), Some(Action::SelectDown));
    }

    #[test]
    fn hint_uses_first_combo() {
        let kb = KeyBindings::default();
        assert_eq!(kb.hint(Action::ToggleUi).as_deref(), Some("F7 Show / hide inspector"));
        assert_eq!(kb.combos_for(Action::NextPage), vec!["PageDown", "]"]);
    }
}
