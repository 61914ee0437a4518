//! Key routing: the decision function of the composition state machine.
//!
//! `KeyRouter::route` is pure. It reads the current state and a key and
//! returns the states to enter, in order; it never mutates anything. The
//! owner (see `ImeEngine`) applies the states and folds `Committing` back to
//! `Idle`.
//!
//! Checks run in a fixed order, and the first match wins:
//! input character, Tab/Return, digit 1-9, Space, Escape, Backspace,
//! Delete, Left, Right, Up, Down, PageDown, PageUp, Home, End, and finally
//! any other printable character, which commits the buffer with that
//! character inserted.

use crate::candidate::CandidateList;
use crate::input_buffer::InputBuffer;
use crate::key::{KeyDescriptor, NamedKey};
use crate::matcher::Completer;
use crate::state::{Composing, CompositionState};
use tracing::{debug, debug_span};

/// Typographic substitute for a typed apostrophe.
pub const APOSTROPHE_SUBSTITUTE: char = '\u{2019}';

/// Outcome of routing one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult {
    /// The host should apply the key's default behavior
    NotHandled,
    /// Consumed; enter these states in order (possibly none)
    Handled(Vec<CompositionState>),
    /// Invalid in this context. The host signals an error cue, and suppresses
    /// the key's default behavior when `consumed` is true.
    Rejected { consumed: bool },
}

impl KeyResult {
    fn enter(state: CompositionState) -> Self {
        KeyResult::Handled(vec![state])
    }

    fn reject() -> Self {
        KeyResult::Rejected { consumed: true }
    }

    pub fn is_handled(&self) -> bool {
        match self {
            KeyResult::NotHandled => false,
            KeyResult::Handled(_) => true,
            KeyResult::Rejected { consumed } => *consumed,
        }
    }
}

/// Characters that start or extend a composition.
pub fn is_input_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '\'' || ch == '^'
}

fn substitute(ch: char) -> char {
    if ch == '\'' {
        APOSTROPHE_SUBSTITUTE
    } else {
        ch
    }
}

/// Routes keys against the current state, completing buffers with `C`.
pub struct KeyRouter<'a, C: Completer + ?Sized> {
    completer: &'a C,
}

impl<'a, C: Completer + ?Sized> KeyRouter<'a, C> {
    pub fn new(completer: &'a C) -> Self {
        Self { completer }
    }

    /// Decide what `key` does in `state`.
    pub fn route(&self, key: &KeyDescriptor, state: &CompositionState) -> KeyResult {
        let _span = debug_span!("route", name = ?key.name, text = ?key.text).entered();

        if key.is_release {
            return KeyResult::NotHandled;
        }

        let result = match state {
            CompositionState::Idle => self.route_idle(key),
            CompositionState::Composing(composing) => self.route_composing(key, composing),
            // Transient; owners fold it away before the next key
            CompositionState::Committing { .. } => KeyResult::Rejected { consumed: false },
        };
        debug!(?result, "routed");
        result
    }

    fn route_idle(&self, key: &KeyDescriptor) -> KeyResult {
        match key.text {
            Some(ch) if is_input_char(ch) => {
                let buffer = InputBuffer::with_cursor(substitute(ch).to_string(), 1);
                KeyResult::enter(self.composing(buffer))
            }
            Some(_) => KeyResult::NotHandled,
            None => KeyResult::Rejected { consumed: false },
        }
    }

    fn route_composing(&self, key: &KeyDescriptor, current: &Composing) -> KeyResult {
        let input = current.input();

        if let Some(ch) = key.text.filter(|&ch| is_input_char(ch)) {
            let mut buffer = input.clone();
            buffer.insert_char(substitute(ch));
            return KeyResult::enter(self.composing(buffer));
        }

        if matches!(key.name, NamedKey::Tab | NamedKey::Return) {
            let text = match current.selected_candidate() {
                Some(candidate) => format!("{} ", candidate.display_text),
                None => input.text().to_string(),
            };
            return KeyResult::enter(CompositionState::committing(text));
        }

        if let Some(digit @ '1'..='9') = key.text {
            let position = digit as usize - '1' as usize;
            return match current.candidate_list().page_candidate(position) {
                Some(candidate) => {
                    KeyResult::enter(CompositionState::committing(candidate.display_text.clone()))
                }
                None => KeyResult::reject(),
            };
        }

        match key.name {
            NamedKey::Space => {
                if input.at_start() {
                    return KeyResult::Handled(vec![
                        CompositionState::committing(" "),
                        CompositionState::Composing(current.clone()),
                    ]);
                }
                let mut buffer = input.clone();
                buffer.insert_char(' ');
                return KeyResult::enter(self.composing(buffer));
            }
            NamedKey::Escape => return KeyResult::Handled(Vec::new()),
            NamedKey::Backspace if !input.at_start() => {
                let mut buffer = input.clone();
                buffer.delete_before();
                return self.after_deletion(buffer);
            }
            NamedKey::Delete if !input.at_end() => {
                let mut buffer = input.clone();
                buffer.delete_after();
                return self.after_deletion(buffer);
            }
            NamedKey::Left => {
                return self.move_cursor(current, InputBuffer::move_left);
            }
            NamedKey::Right => {
                return self.move_cursor(current, InputBuffer::move_right);
            }
            NamedKey::Up => {
                return self.reselect(current, CandidateList::select_previous);
            }
            NamedKey::Down => {
                return self.reselect(current, CandidateList::select_next);
            }
            NamedKey::PageDown => {
                return self.reselect(current, CandidateList::select_next_page);
            }
            NamedKey::PageUp => {
                return self.reselect(current, CandidateList::select_previous_page);
            }
            NamedKey::Home => {
                return self.move_cursor(current, |b| {
                    let moved = !b.at_start();
                    b.move_to_start();
                    moved
                });
            }
            NamedKey::End => {
                return self.move_cursor(current, |b| {
                    let moved = !b.at_end();
                    b.move_to_end();
                    moved
                });
            }
            _ => {}
        }

        if let Some(ch) = key.text.filter(|ch| !ch.is_control()) {
            return KeyResult::enter(CompositionState::committing(input.text_with_inserted(ch)));
        }

        KeyResult::Rejected { consumed: false }
    }

    /// Shared tail of Backspace and Delete.
    ///
    /// A buffer left starting with a space sheds it as a committed space, so
    /// the composition never begins with whitespace.
    fn after_deletion(&self, mut buffer: InputBuffer) -> KeyResult {
        if buffer.is_empty() {
            return KeyResult::enter(CompositionState::Idle);
        }
        if buffer.strip_leading_space() {
            if buffer.is_empty() {
                return KeyResult::enter(CompositionState::Idle);
            }
            return KeyResult::Handled(vec![
                CompositionState::committing(" "),
                self.composing(buffer),
            ]);
        }
        KeyResult::enter(self.composing(buffer))
    }

    /// Cursor motion keeping candidates and selection.
    fn move_cursor<F>(&self, current: &Composing, motion: F) -> KeyResult
    where
        F: FnOnce(&mut InputBuffer) -> bool,
    {
        let mut buffer = current.input().clone();
        if !motion(&mut buffer) {
            return KeyResult::reject();
        }
        KeyResult::enter(CompositionState::Composing(Composing::from_parts(
            buffer,
            current.candidate_list().clone(),
        )))
    }

    /// Selection change keeping the buffer.
    fn reselect<F>(&self, current: &Composing, change: F) -> KeyResult
    where
        F: FnOnce(&CandidateList) -> Option<CandidateList>,
    {
        match change(current.candidate_list()) {
            Some(candidates) => KeyResult::enter(CompositionState::Composing(
                Composing::from_parts(current.input().clone(), candidates),
            )),
            None => KeyResult::reject(),
        }
    }

    /// A fresh composing state with candidates recomputed for `buffer`.
    fn composing(&self, buffer: InputBuffer) -> CompositionState {
        let candidates = self.completer.complete(buffer.text());
        CompositionState::Composing(Composing::from_parts(
            buffer,
            CandidateList::from_candidates(candidates),
        ))
    }
}
