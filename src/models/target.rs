//! Conversion targets and source member coordinates

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::utils::{is_supported_source_type, matches_regex_pattern, matches_simple_pattern};

lazy_static! {
    // LIBRARY/FILE/MEMBER.EXTENSION, the shape produced by remote editors
    static ref MEMBER_PATH: Regex =
        Regex::new(r"^/?([^/.]+)/([^/.]+)/([^/.]+)\.([^/.]+)$").unwrap();
}

/// Compiled-artifact kind associated with a member name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectType {
    #[serde(rename = "*PGM")]
    Pgm,
    #[serde(rename = "*MODULE")]
    Module,
    #[serde(rename = "*NONE")]
    None,
}

impl ObjectType {
    /// Every selectable value, in display order.
    pub const ALL: &'static [ObjectType] = &[ObjectType::Pgm, ObjectType::Module, ObjectType::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Pgm => "*PGM",
            ObjectType::Module => "*MODULE",
            ObjectType::None => "*NONE",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "*PGM" | "PGM" => Ok(ObjectType::Pgm),
            "*MODULE" | "MODULE" => Ok(ObjectType::Module),
            "*NONE" | "NONE" => Ok(ObjectType::None),
            other => Err(Error::InvalidParameterValue {
                parameter: "OBJTYPE".into(),
                value: other.into(),
                expected: "*PGM, *MODULE, *NONE".into(),
            }),
        }
    }
}

/// How a member filter pattern is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Simple,
    Regex,
}

impl Default for FilterKind {
    fn default() -> Self {
        FilterKind::Simple
    }
}

/// Optional member/extension filter applied when a target spans a whole
/// source file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<String>,
    #[serde(default)]
    pub kind: FilterKind,
}

impl MemberFilter {
    pub fn matches(&self, name: &str, extension: &str) -> bool {
        let matches_one = |value: &str, pattern: &Option<String>| match pattern {
            Some(p) => match self.kind {
                FilterKind::Simple => matches_simple_pattern(value, p),
                FilterKind::Regex => matches_regex_pattern(value, p),
            },
            None => true,
        };
        matches_one(name, &self.members) && matches_one(extension, &self.extensions)
    }
}

/// One member as reported by the remote member listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMember {
    pub library: String,
    pub file: String,
    pub name: String,
    pub extension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl SourceMember {
    /// Parse a `LIBRARY/FILE/MEMBER.EXTENSION` path, the editor-side shape of
    /// a member location. Names are normalized to uppercase.
    pub fn parse_path(path: &str) -> Result<SourceMember> {
        let caps = MEMBER_PATH
            .captures(path.trim())
            .ok_or_else(|| Error::InvalidMemberPath(path.to_string()))?;
        Ok(SourceMember {
            library: caps[1].to_uppercase(),
            file: caps[2].to_uppercase(),
            name: caps[3].to_uppercase(),
            extension: caps[4].to_uppercase(),
            text: None,
        })
    }

    /// Full remote path of this member.
    pub fn path(&self) -> String {
        format!(
            "{}/{}/{}.{}",
            self.library, self.file, self.name, self.extension
        )
    }
}

/// Describes one unit of conversion work.
///
/// A target without a `member` spans every member of `library/file` that
/// passes the filter (batch mode).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionTarget {
    pub library: String,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<ObjectType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<MemberFilter>,
}

impl ConversionTarget {
    /// Target for a single member, validating its source type first.
    pub fn for_member(member: &SourceMember) -> Result<ConversionTarget> {
        if !is_supported_source_type(&member.extension) {
            return Err(Error::UnsupportedSourceType(member.extension.clone()));
        }
        Ok(ConversionTarget {
            library: member.library.clone(),
            file: member.file.clone(),
            member: Some(member.name.clone()),
            extension: Some(member.extension.to_uppercase()),
            object_type: None,
            filter: None,
        })
    }

    /// Batch target spanning a whole source file.
    pub fn for_file(library: &str, file: &str, filter: Option<MemberFilter>) -> ConversionTarget {
        ConversionTarget {
            library: library.to_uppercase(),
            file: file.to_uppercase(),
            member: None,
            extension: None,
            object_type: None,
            filter,
        }
    }

    pub fn is_batch(&self) -> bool {
        self.member.is_none()
    }

    /// Display name: the member when present, otherwise the source file.
    pub fn display_name(&self) -> &str {
        self.member.as_deref().unwrap_or(&self.file)
    }
}
