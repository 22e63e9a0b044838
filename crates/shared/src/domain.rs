use serde::{Deserialize, Serialize};

/// One screen of the ritual flow, in presentation order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Step {
    #[default]
    Intro = 0,
    Name = 1,
    Email = 2,
    Subject = 3,
    Message = 4,
    Complete = 5,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Intro,
        Step::Name,
        Step::Email,
        Step::Subject,
        Step::Message,
        Step::Complete,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// The form field collected while this step is on screen.
    pub fn field(self) -> Option<FormField> {
        match self {
            Step::Name => Some(FormField::Name),
            Step::Email => Some(FormField::Email),
            Step::Subject => Some(FormField::Subject),
            Step::Message => Some(FormField::Message),
            Step::Intro | Step::Complete => None,
        }
    }

    /// Label of the "go back" control, keyed by the step it leaves.
    pub fn back_label(self) -> Option<&'static str> {
        match self {
            Step::Name => Some("Refermer le voile..."),
            Step::Email => Some("Rebrousser chemin..."),
            Step::Subject => Some("Renoncer à la vision..."),
            Step::Message => Some("Effacer les murmures..."),
            Step::Intro | Step::Complete => None,
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            Step::Intro => "S'ADRESSER A L'ORACLE",
            Step::Name => "Qui ose déranger l'Oracle pendant son repos éternel ?",
            Step::Email => "Où l'Oracle peut-il vous adresser sa vision ?",
            Step::Subject => "Quel est l'objet de ta quête ?",
            Step::Message => "Ta Révélation :",
            Step::Complete => "L'ORACLE A ENTENDU",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Subject,
    Message,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Email,
        FormField::Subject,
        FormField::Message,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

/// The four values collected by the flow. Empty until typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRecord {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl FormRecord {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Subject => &self.subject,
            FormField::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Subject => &mut self.subject,
            FormField::Message => &mut self.message,
        };
        *slot = value.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        FormField::ALL.iter().all(|field| self.get(*field).is_empty())
    }
}
