//! Legal moves of the flow as data: which operation is accepted on which step.

use shared::domain::{Direction, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Start,
    Advance,
    AdvanceWithValidation,
    Retreat,
    Submit,
    Reset,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Start,
        Operation::Advance,
        Operation::AdvanceWithValidation,
        Operation::Retreat,
        Operation::Submit,
        Operation::Reset,
    ];

    pub fn direction(self) -> Direction {
        match self {
            Operation::Retreat | Operation::Reset => Direction::Backward,
            _ => Direction::Forward,
        }
    }

    /// Where this operation lands from `from`: the adjacent step in its
    /// direction, except `Reset` which always returns to the intro.
    fn landing(self, from: Step) -> Option<Step> {
        match (self, self.direction()) {
            (Operation::Reset, _) => Some(Step::Intro),
            (_, Direction::Forward) => from.next(),
            (_, Direction::Backward) => from.previous(),
        }
    }
}

/// Every `(step, operation)` pair the controller accepts. Anything absent is a no-op.
pub const TRANSITIONS: &[(Step, Operation)] = &[
    (Step::Intro, Operation::Start),
    (Step::Name, Operation::Advance),
    (Step::Email, Operation::AdvanceWithValidation),
    (Step::Subject, Operation::Advance),
    (Step::Message, Operation::Submit),
    (Step::Name, Operation::Retreat),
    (Step::Email, Operation::Retreat),
    (Step::Subject, Operation::Retreat),
    (Step::Message, Operation::Retreat),
    (Step::Complete, Operation::Reset),
];

pub fn target(from: Step, operation: Operation) -> Option<Step> {
    if !TRANSITIONS.contains(&(from, operation)) {
        return None;
    }
    operation.landing(from)
}

/// A requested move, evaluated synchronously against [`TRANSITIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRequest {
    pub origin: Step,
    pub operation: Operation,
}

impl TransitionRequest {
    pub fn new(origin: Step, operation: Operation) -> Self {
        Self { origin, operation }
    }

    pub fn direction(&self) -> Direction {
        self.operation.direction()
    }

    pub fn target(&self) -> Option<Step> {
        target(self.origin, self.operation)
    }
}
