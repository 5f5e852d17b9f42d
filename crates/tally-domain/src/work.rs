//! Recurring work definitions tracked by the back office.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, recurrence::RecurrenceDescriptor};

/// A unit of work that recurs on a fixed cadence and is billed per period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkDefinition {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    pub descriptor: RecurrenceDescriptor,
    pub active: bool,
}

impl WorkDefinition {
    pub fn new(name: impl Into<String>, descriptor: RecurrenceDescriptor) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            customer: None,
            descriptor,
            active: true,
        }
    }

    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Identifiable for WorkDefinition {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for WorkDefinition {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for WorkDefinition {
    fn display_label(&self) -> String {
        let state = if self.active { "active" } else { "inactive" };
        format!("{} [{}] {}", self.name, state, self.descriptor)
    }
}
