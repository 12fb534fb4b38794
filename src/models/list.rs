//! Persisted conversion lists and their entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::target::{ConversionTarget, ObjectType};

/// Last known conversion outcome of a list entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConversionStatus {
    #[default]
    Na,
    Succeed,
    Warning,
    Failed,
}

impl fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConversionStatus::Na => "N/A",
            ConversionStatus::Succeed => "Succeed",
            ConversionStatus::Warning => "Warning",
            ConversionStatus::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// One queued member inside a conversion list.
///
/// The persisted `targetmember` key holds the *source* file the member lives
/// in. The naming is historical; renaming the key would orphan existing
/// settings files, so only the field name is corrected here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionEntry {
    pub member: String,
    pub library: String,
    #[serde(rename = "targetmember", default)]
    pub source_file: String,
    #[serde(rename = "srctype", default)]
    pub source_type: String,
    #[serde(rename = "objtype", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<ObjectType>,
    #[serde(default)]
    pub status: ConversionStatus,
    #[serde(default)]
    pub message: String,
    #[serde(
        rename = "conversiondate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub conversion_date: Option<DateTime<Utc>>,
}

impl ConversionEntry {
    /// Work unit equivalent of this entry.
    pub fn to_target(&self) -> ConversionTarget {
        ConversionTarget {
            library: self.library.clone(),
            file: self.source_file.clone(),
            member: Some(self.member.clone()),
            extension: Some(self.source_type.clone()),
            object_type: self.object_type,
            filter: None,
        }
    }
}

/// Field-wise update for one entry. Unset fields keep the stored value,
/// except `source_file` which resets to empty when not supplied. Callers
/// that want it preserved must echo it back in the patch.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub source_file: Option<String>,
    pub source_type: Option<String>,
    pub object_type: Option<ObjectType>,
    pub status: Option<ConversionStatus>,
    pub message: Option<String>,
    pub conversion_date: Option<DateTime<Utc>>,
}

impl EntryPatch {
    pub fn apply(&self, entry: &mut ConversionEntry) {
        entry.source_file = self.source_file.clone().unwrap_or_default();
        if let Some(source_type) = &self.source_type {
            entry.source_type = source_type.clone();
        }
        if let Some(object_type) = self.object_type {
            entry.object_type = Some(object_type);
        }
        if let Some(status) = self.status {
            entry.status = status;
        }
        if let Some(message) = &self.message {
            entry.message = message.clone();
        }
        if let Some(date) = self.conversion_date {
            entry.conversion_date = Some(date);
        }
    }
}

/// A user-named batch of members queued for conversion, independent of any
/// single source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionList {
    #[serde(rename = "listname")]
    pub name: String,
    #[serde(rename = "connectionname", default)]
    pub connection: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "targetlibrary", default)]
    pub target_library: String,
    #[serde(rename = "targetsourcefile", default)]
    pub target_source_file: String,
    #[serde(default)]
    pub items: Vec<ConversionEntry>,
}

impl ConversionList {
    pub fn new(name: &str, connection: &str) -> ConversionList {
        ConversionList {
            name: name.to_string(),
            connection: connection.to_string(),
            ..Default::default()
        }
    }

    pub fn find_item(&self, member: &str) -> Option<&ConversionEntry> {
        self.items
            .iter()
            .find(|item| item.member.eq_ignore_ascii_case(member))
    }

    pub fn find_item_mut(&mut self, member: &str) -> Option<&mut ConversionEntry> {
        self.items
            .iter_mut()
            .find(|item| item.member.eq_ignore_ascii_case(member))
    }

    pub fn contains_member(&self, member: &str) -> bool {
        self.find_item(member).is_some()
    }
}
