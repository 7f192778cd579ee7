//! Contact form payload validation.
//!
//! The same [`CONTACT_LIMITS`] back both the form's `maxLength` attributes and
//! server-side validation. The phone limit is asymmetric: the form accepts the
//! national number only ([`ContactLimits::phone_national`]) while the server
//! receives it with the dial-code prefix ([`ContactLimits::phone_full`]).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};

/// Maximum length, in characters, of each contact field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactLimits {
    pub first_name: usize,
    pub last_name: usize,
    pub company: usize,
    pub email: usize,
    pub country: usize,
    pub subject: usize,
    pub message: usize,
    pub phone_national: usize,
    pub phone_full: usize,
}

pub const CONTACT_LIMITS: ContactLimits = ContactLimits {
    first_name: 100,
    last_name: 100,
    company: 200,
    email: 254,
    country: 100,
    subject: 200,
    message: 5000,
    phone_national: 30,
    phone_full: 50,
};

/// Mailbox a message is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Sales,
    Support,
    Admin,
}

impl Destination {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sales" => Some(Destination::Sales),
            "support" => Some(Destination::Support),
            "admin" => Some(Destination::Admin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Destination::Sales => "sales",
            Destination::Support => "support",
            Destination::Admin => "admin",
        }
    }

    /// Human-readable department name.
    pub fn label(self) -> &'static str {
        match self {
            Destination::Sales => "Sales / Wholesale Inquiries",
            Destination::Support => "Customer Support",
            Destination::Admin => "General / Administration",
        }
    }
}

/// A validated, trimmed contact submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub email: String,
    pub country: String,
    pub phone: String,
    pub subject: Option<String>,
    pub destination: Destination,
    pub message: String,
}

impl ContactPayload {
    /// Validate a raw JSON body.
    ///
    /// Required: `firstName`, `lastName`, `email` (must contain `@`),
    /// `country`, `phone`, `destination` (`sales`/`support`/`admin`), and
    /// `message`, all non-blank strings. `company` and `subject` are optional;
    /// blank values become `None`. Every field is trimmed and checked against
    /// [`CONTACT_LIMITS`].
    pub fn validate(body: &Value) -> Result<Self> {
        let obj = body.as_object().ok_or(CoreError::InvalidField("body"))?;
        let limits = CONTACT_LIMITS;

        let first_name = required(obj, "firstName", limits.first_name)?;
        let last_name = required(obj, "lastName", limits.last_name)?;
        let email = required(obj, "email", limits.email)?;
        if !email.contains('@') {
            return Err(CoreError::InvalidField("email"));
        }
        let country = required(obj, "country", limits.country)?;
        let phone = required(obj, "phone", limits.phone_full)?;
        let destination = obj
            .get("destination")
            .and_then(Value::as_str)
            .and_then(Destination::parse)
            .ok_or(CoreError::InvalidField("destination"))?;
        let message = required(obj, "message", limits.message)?;
        let company = optional(obj, "company", limits.company)?;
        let subject = optional(obj, "subject", limits.subject)?;

        Ok(Self {
            first_name,
            last_name,
            company,
            email,
            country,
            phone,
            subject,
            destination,
            message,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// `[SALES] <subject>`, or `[SALES] New inquiry from <name>` without one.
    pub fn subject_line(&self) -> String {
        let tag = self.destination.as_str().to_uppercase();
        match &self.subject {
            Some(subject) => format!("[{tag}] {subject}"),
            None => format!("[{tag}] New inquiry from {}", self.full_name()),
        }
    }

    /// Plain-text notification body. `sent_at` is appended as the footer.
    pub fn text_body(&self, site_name: &str, sent_at: &str) -> String {
        let dash = "—";
        let rows = [
            ("Name", self.full_name()),
            ("Company", self.company.clone().unwrap_or_else(|| dash.to_string())),
            ("Email", self.email.clone()),
            ("Country", self.country.clone()),
            ("Phone", self.phone.clone()),
            ("Subject", self.subject.clone().unwrap_or_else(|| dash.to_string())),
            ("Department", self.destination.label().to_string()),
        ];

        let mut out = format!("New contact form submission — {site_name}\n\n");
        for (label, value) in rows {
            out.push_str(&format!("{label:<11} {value}\n"));
        }
        out.push_str("\nMessage:\n");
        out.push_str(&self.message);
        out.push_str(&format!("\n\n-- \nSent via the {site_name} contact form · {sent_at}\n"));
        out
    }
}

fn required(obj: &serde_json::Map<String, Value>, field: &'static str, limit: usize) -> Result<String> {
    let value = obj
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(CoreError::InvalidField(field))?;
    check_len(field, value, limit)?;
    Ok(value.to_string())
}

fn optional(
    obj: &serde_json::Map<String, Value>,
    field: &'static str,
    limit: usize,
) -> Result<Option<String>> {
    match obj.get(field).and_then(Value::as_str).map(str::trim) {
        Some(s) if !s.is_empty() => {
            check_len(field, s, limit)?;
            Ok(Some(s.to_string()))
        }
        _ => Ok(None),
    }
}

fn check_len(field: &'static str, value: &str, limit: usize) -> Result<()> {
    if value.chars().count() > limit {
        return Err(CoreError::FieldTooLong { field, limit });
    }
    Ok(())
}
