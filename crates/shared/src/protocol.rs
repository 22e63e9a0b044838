use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{FormField, FormRecord};

pub const NOTIFICATION_TITLE: &str = "🔮 L'ORACLE A REÇU UN MESSAGE";
pub const NOTIFICATION_COLOR: u32 = 0x8B5CF6;
pub const NOTIFICATION_FOOTER: &str = "Oracle Contact Form";
/// Stands in for any field the visitor left empty.
pub const EMPTY_FIELD_PLACEHOLDER: &str = "Non renseigné";

/// Webhook body sent once the visitor seals their message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub timestamp: DateTime<Utc>,
    pub footer: EmbedFooter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}

pub fn field_label(field: FormField) -> &'static str {
    match field {
        FormField::Name => "👤 Nom",
        FormField::Email => "📧 Email",
        FormField::Subject => "📝 Sujet",
        FormField::Message => "💬 Message",
    }
}

fn field_inline(field: FormField) -> bool {
    matches!(field, FormField::Name | FormField::Email)
}

impl NotificationPayload {
    pub fn from_record(record: &FormRecord, sent_at: DateTime<Utc>) -> Self {
        let fields = FormField::ALL
            .iter()
            .map(|field| {
                let value = record.get(*field);
                EmbedField {
                    name: field_label(*field).to_string(),
                    value: if value.is_empty() {
                        EMPTY_FIELD_PLACEHOLDER.to_string()
                    } else {
                        value.to_string()
                    },
                    inline: field_inline(*field),
                }
            })
            .collect();

        Self {
            embeds: vec![Embed {
                title: NOTIFICATION_TITLE.to_string(),
                color: NOTIFICATION_COLOR,
                fields,
                timestamp: sent_at,
                footer: EmbedFooter {
                    text: NOTIFICATION_FOOTER.to_string(),
                },
            }],
        }
    }

    /// Value rendered for `field` in the first embed, placeholder included.
    pub fn field_value(&self, field: FormField) -> Option<&str> {
        let label = field_label(field);
        self.embeds
            .first()?
            .fields
            .iter()
            .find(|entry| entry.name == label)
            .map(|entry| entry.value.as_str())
    }
}
