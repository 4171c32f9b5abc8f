//! Shared helpers for the prompt integration tests.

#![allow(dead_code)]

use promptkit::{KeyMsg, KeyType, Model, Msg, ProgramSimulator};
use regex::Regex;

/// Removes ANSI escape sequences from rendered output.
pub fn strip_ansi(s: &str) -> String {
    let re = Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").unwrap();
    re.replace_all(s, "").into_owned()
}

/// One key message per character.
pub fn msgs_from_text(text: &str) -> Vec<Msg> {
    text.chars().map(|c| Msg::Key(KeyMsg::from_char(c))).collect()
}

/// A special key press.
pub fn key(key_type: KeyType) -> Msg {
    Msg::Key(KeyMsg::from_type(key_type))
}

/// Initializes the model and feeds it all messages.
pub fn run<M: Model>(model: M, msgs: impl IntoIterator<Item = Msg>) -> ProgramSimulator<M> {
    let mut sim = ProgramSimulator::new(model);
    sim.init();
    for msg in msgs {
        sim.send(msg);
    }
    sim.run_until_empty();
    sim
}

/// The last rendered view without styling.
pub fn last_view<M: Model>(sim: &ProgramSimulator<M>) -> String {
    strip_ansi(sim.last_view().unwrap_or_default())
}

/// The current view without styling.
pub fn view<M: Model>(sim: &mut ProgramSimulator<M>) -> String {
    strip_ansi(&sim.model_mut().view())
}
