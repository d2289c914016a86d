//! Credential entries stored inside a vault.
//!
//! A `CredentialEntry` is an immutable value: editing produces a new
//! entry (same id, same `created_at`) that replaces the old one in the
//! store.  Field validation and URL normalization happen in the
//! constructors, so every entry that exists has passed them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroize;

use crate::errors::{VaultError, Result};

/// The four fields every entry must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    WebsiteName,
    Url,
    Username,
    Password,
}

impl RequiredField {
    /// All required fields, in column order.
    pub const ALL: [RequiredField; 4] = [
        RequiredField::WebsiteName,
        RequiredField::Url,
        RequiredField::Username,
        RequiredField::Password,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RequiredField::WebsiteName => "website",
            RequiredField::Url => "url",
            RequiredField::Username => "username",
            RequiredField::Password => "password",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join field names for error messages: "url, password".
pub fn describe_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The user-editable part of an entry.
#[derive(Clone, Default, PartialEq, Eq, Zeroize)]
pub struct EntryFields {
    pub website_name: String,
    pub url: String,
    pub username: String,
    pub password: String,
    pub note: String,
}

impl EntryFields {
    /// Required fields that are empty (after trimming), in column order.
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        RequiredField::ALL
            .into_iter()
            .filter(|field| self.value(*field).trim().is_empty())
            .collect()
    }

    /// Fail with `VaultError::Validation` naming every blank required field.
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(VaultError::Validation(format!(
                "required fields are empty: {}",
                describe_fields(&missing)
            )))
        }
    }

    fn value(&self, field: RequiredField) -> &str {
        match field {
            RequiredField::WebsiteName => &self.website_name,
            RequiredField::Url => &self.url,
            RequiredField::Username => &self.username,
            RequiredField::Password => &self.password,
        }
    }
}

impl fmt::Debug for EntryFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryFields")
            .field("website_name", &self.website_name)
            .field("url", &self.url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Prepend `https://` unless the url already carries an http(s) scheme.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// First 8 hex digits of an id, as shown in listings.
pub fn short_id(id: Uuid) -> String {
    let mut simple = id.simple().to_string();
    simple.truncate(8);
    simple
}

/// A single stored credential.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
pub struct CredentialEntry {
    #[zeroize(skip)]
    id: Uuid,
    website_name: String,
    url: String,
    username: String,
    password: String,
    #[serde(default)]
    note: String,
    #[zeroize(skip)]
    created_at: DateTime<Utc>,
    #[zeroize(skip)]
    updated_at: DateTime<Utc>,
}

impl CredentialEntry {
    /// Create a new entry with a fresh id, timestamped now.
    pub fn new(fields: EntryFields) -> Result<Self> {
        Self::new_at(fields, Utc::now())
    }

    /// Create a new entry with a fresh id and an explicit creation time.
    pub fn new_at(fields: EntryFields, now: DateTime<Utc>) -> Result<Self> {
        fields.validate()?;
        Ok(Self::from_fields(Uuid::new_v4(), fields, now, now))
    }

    /// Produce the edited version of this entry.
    ///
    /// Keeps `id` and `created_at`; `updated_at` moves to now (never
    /// earlier than `created_at`).
    pub fn revise(&self, fields: EntryFields) -> Result<Self> {
        fields.validate()?;
        let updated_at = Utc::now().max(self.created_at);
        Ok(Self::from_fields(self.id, fields, self.created_at, updated_at))
    }

    fn from_fields(
        id: Uuid,
        fields: EntryFields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            website_name: fields.website_name.trim().to_string(),
            url: normalize_url(&fields.url),
            username: fields.username.trim().to_string(),
            password: fields.password,
            note: fields.note.trim().to_string(),
            created_at,
            updated_at,
        }
    }

    /// Copy of the editable fields (for pre-filling an edit).
    pub fn fields(&self) -> EntryFields {
        EntryFields {
            website_name: self.website_name.clone(),
            url: self.url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            note: self.note.clone(),
        }
    }

    /// Re-check the constructor contract on a deserialized entry.
    pub(crate) fn validate(&self) -> Result<()> {
        self.fields().validate()?;
        if self.updated_at < self.created_at {
            return Err(VaultError::Validation(format!(
                "entry {} was updated before it was created",
                self.id
            )));
        }
        Ok(())
    }

    /// Set `updated_at` to now, keeping it at or after `created_at`.
    pub(crate) fn touch(&mut self, created_at: DateTime<Utc>) {
        self.created_at = created_at;
        self.updated_at = Utc::now().max(created_at);
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn website_name(&self) -> &str {
        &self.website_name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// The note, or `None` when empty.
    pub fn note(&self) -> Option<&str> {
        if self.note.is_empty() {
            None
        } else {
            Some(&self.note)
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Short id used in listings (first 8 hex digits).
    pub fn short_id(&self) -> String {
        short_id(self.id)
    }
}

impl fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialEntry")
            .field("id", &self.id)
            .field("website_name", &self.website_name)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"********")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> EntryFields {
        EntryFields {
            website_name: "GitHub".into(),
            url: "github.com".into(),
            username: "octocat".into(),
            password: "hunter2".into(),
            note: String::new(),
        }
    }

    #[test]
    fn new_normalizes_url() {
        let entry = CredentialEntry::new(fields()).unwrap();
        assert_eq!(entry.url(), "https://github.com");
        assert_eq!(entry.created_at(), entry.updated_at());
        assert!(entry.note().is_none());
    }

    #[test]
    fn explicit_scheme_is_kept() {
        let mut f = fields();
        f.url = "http://intranet.local".into();
        let entry = CredentialEntry::new(f).unwrap();
        assert_eq!(entry.url(), "http://intranet.local");
    }

    #[test]
    fn blank_fields_are_named() {
        let mut f = fields();
        f.url = "  ".into();
        f.password = String::new();
        assert_eq!(
            f.missing_fields(),
            vec![RequiredField::Url, RequiredField::Password]
        );
        let err = CredentialEntry::new(f).unwrap_err().to_string();
        assert!(err.contains("url, password"), "{err}");
    }

    #[test]
    fn revise_keeps_identity() {
        let entry = CredentialEntry::new(fields()).unwrap();
        let mut f = entry.fields();
        f.password = "correct horse".into();
        let edited = entry.revise(f).unwrap();
        assert_eq!(edited.id(), entry.id());
        assert_eq!(edited.created_at(), entry.created_at());
        assert!(edited.updated_at() >= entry.updated_at());
        assert_eq!(edited.password(), "correct horse");
    }

    #[test]
    fn ids_are_unique() {
        let a = CredentialEntry::new(fields()).unwrap();
        let b = CredentialEntry::new(fields()).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn zeroize_wipes_secrets() {
        let mut entry = CredentialEntry::new(fields()).unwrap();
        let id = entry.id();
        entry.zeroize();
        assert!(entry.password().is_empty());
        assert!(entry.username().is_empty());
        assert_eq!(entry.id(), id);
    }
}
