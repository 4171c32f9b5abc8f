//! Headless host loop for driving prompts without a terminal.
//!
//! The simulator plays the part of the host program: it initializes the
//! prompt, delivers queued messages one at a time, renders after every
//! step and stops once the prompt asks to quit.

use std::collections::VecDeque;

use tracing::trace;

use crate::event::{Cmd, Model, Msg};

/// Statistics tracked during simulation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// Number of times init() was called.
    pub init_calls: usize,
    /// Number of times update() was called.
    pub update_calls: usize,
    /// Number of times view() was called.
    pub view_calls: usize,
    /// Commands returned from init/update.
    pub commands_returned: usize,
    /// Whether the prompt asked to quit.
    pub quit_requested: bool,
}

/// A simulator for testing prompts without a terminal.
///
/// # Example
///
/// ```rust
/// use promptkit::confirmation::{Confirmation, Decision};
/// use promptkit::{KeyMsg, ProgramSimulator};
///
/// let mut sim = ProgramSimulator::new(Confirmation::new("Sure?", Decision::No).into_model());
/// sim.send(KeyMsg::from_char('y'));
/// sim.send(KeyMsg::from_char('n'));
/// sim.run_until_quit(10);
///
/// assert!(sim.is_quit());
/// assert_eq!(sim.model().value(), Ok(true));
/// ```
#[derive(Debug)]
pub struct ProgramSimulator<M: Model> {
    model: M,
    input_queue: VecDeque<Msg>,
    output_views: Vec<String>,
    clipboard: Option<String>,
    stats: SimulationStats,
    initialized: bool,
}

impl<M: Model> ProgramSimulator<M> {
    /// Create a new simulator with the given model.
    pub fn new(model: M) -> Self {
        Self {
            model,
            input_queue: VecDeque::new(),
            output_views: Vec::new(),
            clipboard: None,
            stats: SimulationStats::default(),
            initialized: false,
        }
    }

    /// Sets the text answered to [`Cmd::Paste`]. Without a clipboard paste
    /// requests are dropped.
    #[must_use]
    pub fn with_clipboard(mut self, text: impl Into<String>) -> Self {
        self.clipboard = Some(text.into());
        self
    }

    /// Initialize the model and render the first view.
    ///
    /// Calling this again is a no-op.
    pub fn init(&mut self) -> Option<Cmd> {
        if self.initialized {
            return None;
        }
        self.initialized = true;
        self.stats.init_calls += 1;

        let cmd = self.model.init();
        self.record(cmd);
        self.render();
        cmd
    }

    /// Queue a message for processing.
    pub fn send(&mut self, msg: impl Into<Msg>) {
        self.input_queue.push_back(msg.into());
    }

    /// Queue one key press per character of `text`.
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.send(crate::key::KeyMsg::from_char(c));
        }
    }

    /// Process one message from the queue, calling update and view.
    ///
    /// Returns the command returned by update, if any.
    pub fn step(&mut self) -> Option<Cmd> {
        if !self.initialized {
            self.init();
        }

        let msg = self.input_queue.pop_front()?;
        self.stats.update_calls += 1;
        let cmd = self.model.update(msg);
        self.record(cmd);
        self.render();
        cmd
    }

    fn record(&mut self, cmd: Option<Cmd>) {
        let Some(cmd) = cmd else {
            return;
        };
        trace!(%cmd, "command");
        self.stats.commands_returned += 1;
        match cmd {
            Cmd::Quit => self.stats.quit_requested = true,
            Cmd::Paste => {
                if let Some(text) = &self.clipboard {
                    self.input_queue.push_front(Msg::Paste(text.clone()));
                }
            }
        }
    }

    fn render(&mut self) {
        self.stats.view_calls += 1;
        self.output_views.push(self.model.view());
    }

    /// Process all pending messages until the queue is empty or quit is
    /// requested.
    ///
    /// Returns the number of messages processed.
    pub fn run_until_empty(&mut self) -> usize {
        self.run_until_quit(usize::MAX)
    }

    /// Run until quit is requested, the queue is empty or `max_steps` is
    /// reached.
    ///
    /// Returns the number of steps processed.
    pub fn run_until_quit(&mut self, max_steps: usize) -> usize {
        if !self.initialized {
            self.init();
        }
        let mut steps = 0;
        while steps < max_steps && !self.stats.quit_requested && !self.input_queue.is_empty() {
            self.step();
            steps += 1;
        }
        steps
    }

    /// Get a reference to the current model state.
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the current model state.
    pub const fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Consume the simulator and return the final model.
    pub fn into_model(self) -> M {
        self.model
    }

    /// Get the simulation statistics.
    pub const fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Get all captured view outputs.
    pub fn views(&self) -> &[String] {
        &self.output_views
    }

    /// Get the most recent view output.
    pub fn last_view(&self) -> Option<&str> {
        self.output_views.last().map(String::as_str)
    }

    /// Check if quit has been requested.
    pub const fn is_quit(&self) -> bool {
        self.stats.quit_requested
    }

    /// Check if the model has been initialized.
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Get the number of pending messages.
    pub fn pending_count(&self) -> usize {
        self.input_queue.len()
    }
}
