#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Promptkit
//!
//! Interactive terminal prompts built on the Elm Architecture.
//!
//! Promptkit provides three prompts:
//! - **confirmation** - Yes/no question with an explicit undecided state
//! - **selection** - Single choice from a list, with filtering and pagination
//! - **textinput** - Single-line input with validation, masking and completion
//!
//! Each prompt is configured through a plain struct, turned into a model and
//! driven by a host loop through the [`Model`] trait: the host delivers
//! [`Msg`]s, renders [`Model::view`] after each one and stops on
//! [`Cmd::Quit`]. Views are [minijinja](https://docs.rs/minijinja) templates
//! that can be replaced wholesale; see [`template`] for the helper functions
//! every template can call.
//!
//! Without a terminal, [`ProgramSimulator`] drives a prompt from queued
//! messages.
//!
//! ## Example
//!
//! ```rust
//! use promptkit::choice::from_strings;
//! use promptkit::key::KeyType;
//! use promptkit::selection::Selection;
//! use promptkit::{KeyMsg, ProgramSimulator};
//!
//! let prompt = Selection::new("Pick a fruit", from_strings(["apple", "banana", "cherry"]));
//! let mut sim = ProgramSimulator::new(prompt.into_model());
//! sim.type_text("an");
//! sim.send(KeyMsg::from_type(KeyType::Enter));
//! sim.run_until_quit(10);
//!
//! assert_eq!(sim.model().value(), Ok(&"banana"));
//! ```

pub mod autocomplete;
pub mod binding;
pub mod choice;
pub mod confirmation;
pub mod editor;
pub mod error;
pub mod event;
pub mod key;
pub mod paging;
pub mod selection;
pub mod simulator;
pub mod style;
pub mod template;
pub mod textinput;
pub mod wrap;

mod state;

pub use error::{ErrorKind, PromptError, Result};
pub use event::{Cmd, Model, Msg, WindowSizeMsg};
pub use key::{KeyMsg, KeyType};
pub use simulator::ProgramSimulator;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::binding::Binding;
    pub use crate::choice::{Choice, Item};
    pub use crate::confirmation::{Confirmation, ConfirmationModel, Decision};
    pub use crate::selection::{Selection, SelectionModel};
    pub use crate::textinput::{TextInput, TextInputModel};
    pub use crate::{Cmd, KeyMsg, KeyType, Model, Msg, PromptError, ProgramSimulator};
}
