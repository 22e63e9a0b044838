//! The step state machine and the side effects bound to its transitions.

use std::sync::Arc;

use shared::domain::{FormField, FormRecord, Step};
use tracing::{debug, trace};

use crate::{
    effects::{EffectOrchestrator, EffectRequest},
    error_flag::ErrorFlag,
    notifier::NotificationDispatcher,
    timer::{FlowTimings, TimerSlot},
    transitions::{Operation, TransitionRequest},
    validation::is_valid_email,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Enter,
    /// A single printable character.
    Char(char),
    Other,
}

impl KeyInput {
    /// Maps a key name as reported by the input layer ("Enter", "a", "Shift").
    pub fn from_key_name(name: &str) -> Self {
        if name == "Enter" {
            return KeyInput::Enter;
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => KeyInput::Char(ch),
            _ => KeyInput::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Moved { from: Step, to: Step },
    /// The email did not validate; the step did not change.
    Held,
    /// Not a legal operation for the current step.
    Ignored,
}

impl Outcome {
    pub fn moved(&self) -> bool {
        matches!(self, Outcome::Moved { .. })
    }
}

/// Owns the current step and the collected record.
///
/// Operations that are not legal from the current step are ignored, so
/// repeated input events (double Enter, double click) are harmless.
pub struct StepController {
    step: Step,
    record: FormRecord,
    error_flag: ErrorFlag,
    error_clear: TimerSlot,
    effects: EffectOrchestrator,
    dispatcher: Arc<dyn NotificationDispatcher>,
    timings: FlowTimings,
}

impl StepController {
    pub fn new(
        effects: EffectOrchestrator,
        dispatcher: Arc<dyn NotificationDispatcher>,
        timings: FlowTimings,
    ) -> Self {
        Self {
            step: Step::Intro,
            record: FormRecord::default(),
            error_flag: ErrorFlag::new(),
            error_clear: TimerSlot::new("error_flag_clear"),
            effects,
            dispatcher,
            timings,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn is_error_raised(&self) -> bool {
        self.error_flag.is_raised()
    }

    /// Handle that observes the email error flag, including timer clears.
    pub fn error_flag(&self) -> ErrorFlag {
        self.error_flag.clone()
    }

    pub fn effects(&self) -> &EffectOrchestrator {
        &self.effects
    }

    pub fn back_label(&self) -> Option<&'static str> {
        self.step.back_label()
    }

    /// Called once when the flow is mounted.
    pub fn open(&self) {
        self.effects.apply(EffectRequest::SessionOpened);
    }

    pub fn start(&mut self) -> Outcome {
        let Some(to) = self.resolve(Operation::Start) else {
            return Outcome::Ignored;
        };
        self.effects.apply(EffectRequest::Entry);
        self.move_to(to)
    }

    pub fn advance(&mut self) -> Outcome {
        let Some(to) = self.resolve(Operation::Advance) else {
            return Outcome::Ignored;
        };
        self.effects.apply(EffectRequest::Transition);
        self.move_to(to)
    }

    pub fn advance_with_validation(&mut self) -> Outcome {
        let Some(to) = self.resolve(Operation::AdvanceWithValidation) else {
            return Outcome::Ignored;
        };

        if !is_valid_email(&self.record.email) {
            self.reject_email();
            return Outcome::Held;
        }

        self.lower_error_flag();
        self.effects.apply(EffectRequest::Transition);
        self.move_to(to)
    }

    pub fn retreat(&mut self) -> Outcome {
        match self.resolve(Operation::Retreat) {
            Some(to) => self.move_to(to),
            None => Outcome::Ignored,
        }
    }

    /// Seals the message. The notification is started but not awaited.
    pub fn submit(&mut self) -> Outcome {
        let Some(to) = self.resolve(Operation::Submit) else {
            return Outcome::Ignored;
        };

        self.effects.apply(EffectRequest::Completion);
        self.dispatcher.dispatch(&self.record);
        let outcome = self.move_to(to);
        self.effects.apply(EffectRequest::FinaleShown);
        outcome
    }

    pub fn reset(&mut self) -> Outcome {
        let Some(to) = self.resolve(Operation::Reset) else {
            return Outcome::Ignored;
        };

        self.record.clear();
        self.lower_error_flag();
        let outcome = self.move_to(to);
        self.effects.apply(EffectRequest::FinaleHidden);
        outcome
    }

    /// Replaces the value of the field owned by the current step. Returns
    /// `false` on steps that own no field.
    pub fn update_field(&mut self, value: impl Into<String>) -> bool {
        let Some(field) = self.step.field() else {
            trace!(step = ?self.step, "no field on this step; input ignored");
            return false;
        };

        self.record.set(field, value);
        if field == FormField::Email && self.error_flag.is_raised() {
            self.lower_error_flag();
        }
        true
    }

    /// Keyboard contract: Enter advances from the text steps, any single
    /// character plays the keystroke cue whatever the step.
    pub fn handle_key(&mut self, key: KeyInput) -> Outcome {
        match key {
            KeyInput::Char(_) => {
                self.effects.apply(EffectRequest::Keystroke);
                Outcome::Ignored
            }
            KeyInput::Enter => match self.step {
                Step::Email => self.advance_with_validation(),
                Step::Name | Step::Subject => self.advance(),
                Step::Intro | Step::Message | Step::Complete => Outcome::Ignored,
            },
            KeyInput::Other => Outcome::Ignored,
        }
    }

    fn resolve(&self, operation: Operation) -> Option<Step> {
        let request = TransitionRequest::new(self.step, operation);
        let target = request.target();
        if target.is_none() {
            trace!(step = ?self.step, ?operation, "operation not valid from current step");
        }
        target
    }

    fn move_to(&mut self, to: Step) -> Outcome {
        let from = self.step;
        self.step = to;
        debug!(?from, ?to, "step transition");
        Outcome::Moved { from, to }
    }

    fn reject_email(&mut self) {
        debug!("email rejected by validation guard");
        self.effects.apply(EffectRequest::ValidationError);

        let generation = self.error_flag.raise(self.timings.error_flag_clear);
        let flag = self.error_flag.clone();
        let armed = self
            .error_clear
            .arm(self.timings.error_flag_clear, move || {
                flag.clear_if_current(generation);
            });
        if !armed {
            debug!("error flag will lower on its own expiry");
        }
    }

    fn lower_error_flag(&mut self) {
        self.error_clear.cancel();
        self.error_flag.clear();
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
