//! Object type and member resolution against the remote catalog

use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::warn;

use crate::error::Result;
use crate::gateway::Gateway;
use crate::models::{ConversionTarget, ObjectType, SourceMember};
use crate::utils::is_supported_source_type;

#[derive(Debug, Deserialize)]
struct ObjectRow {
    #[serde(rename = "OBJNAME")]
    name: String,
    #[serde(rename = "OBJTYPE")]
    object_type: String,
}

#[derive(Debug, Deserialize)]
struct MemberRow {
    #[serde(rename = "SYSTEM_TABLE_MEMBER")]
    member: String,
    #[serde(rename = "SOURCE_TYPE", default)]
    source_type: Option<String>,
    #[serde(rename = "PARTITION_TEXT", default)]
    text: Option<String>,
}

fn object_listing_sql(library: &str) -> String {
    format!(
        "select OBJNAME, OBJTYPE from table (QSYS2.OBJECT_STATISTICS('{library}', 'PGM MODULE', '*ALL'))"
    )
}

fn member_listing_sql(library: &str, file: &str) -> String {
    format!(
        "select SYSTEM_TABLE_MEMBER, SOURCE_TYPE, PARTITION_TEXT \
         from QSYS2.SYSPARTITIONSTAT \
         where SYSTEM_TABLE_SCHEMA = '{library}' and SYSTEM_TABLE_NAME = '{file}' \
         order by SYSTEM_TABLE_MEMBER"
    )
}

/// Looks up the compiled-object type for member names by walking a
/// prioritized library list. Each library's object listing is fetched once
/// and kept for the lifetime of the resolver, so a batch of members costs
/// one query per library at most.
pub struct ObjectTypeResolver<'a> {
    gateway: &'a dyn Gateway,
    library_list: &'a [String],
    listings: HashMap<String, HashMap<String, ObjectType>>,
}

impl<'a> ObjectTypeResolver<'a> {
    pub fn new(gateway: &'a dyn Gateway, library_list: &'a [String]) -> Self {
        ObjectTypeResolver {
            gateway,
            library_list,
            listings: HashMap::new(),
        }
    }

    async fn listing(&mut self, library: &str) -> Result<&HashMap<String, ObjectType>> {
        if !self.listings.contains_key(library) {
            let rows = self.gateway.query(&object_listing_sql(library)).await?;
            let mut objects = HashMap::new();
            for row in rows {
                let Ok(parsed) = serde_json::from_value::<ObjectRow>(row) else {
                    continue;
                };
                if let Ok(object_type) = ObjectType::from_str(&parsed.object_type) {
                    objects.insert(parsed.name.to_uppercase(), object_type);
                }
            }
            self.listings.insert(library.to_string(), objects);
        }
        Ok(&self.listings[library])
    }

    /// The member's originating library is searched first, then the library
    /// list with the origin skipped. First match wins; an unknown name
    /// resolves to `*NONE`.
    pub async fn resolve(&mut self, library: &str, name: &str) -> Result<ObjectType> {
        let name = name.to_uppercase();
        let origin = library.to_uppercase();
        if let Some(object_type) = self.listing(&origin).await?.get(&name) {
            return Ok(*object_type);
        }
        for library in self.library_list.iter().map(|l| l.to_uppercase()) {
            if library == origin {
                continue;
            }
            if let Some(object_type) = self.listing(&library).await?.get(&name) {
                return Ok(*object_type);
            }
        }
        Ok(ObjectType::None)
    }
}

/// Members of the target's source file that are candidates for conversion:
/// supported source type, passing the target's filter when one is set.
pub async fn list_members(
    gateway: &dyn Gateway,
    target: &ConversionTarget,
) -> Result<Vec<SourceMember>> {
    let rows = gateway
        .query(&member_listing_sql(&target.library, &target.file))
        .await?;

    let mut members = Vec::new();
    for row in rows {
        let Ok(parsed) = serde_json::from_value::<MemberRow>(row) else {
            continue;
        };
        let extension = parsed.source_type.unwrap_or_default().to_uppercase();
        if !is_supported_source_type(&extension) {
            continue;
        }
        let name = parsed.member.to_uppercase();
        if let Some(filter) = &target.filter {
            if !filter.matches(&name, &extension) {
                continue;
            }
        }
        members.push(SourceMember {
            library: target.library.clone(),
            file: target.file.clone(),
            name,
            extension,
            text: parsed.text,
        });
    }
    Ok(members)
}

/// Fetch the source lines of one member through a QTEMP alias.
pub async fn fetch_member_source(gateway: &dyn Gateway, member: &SourceMember) -> Result<String> {
    let alias = format!("QTEMP.{}", member.name);
    gateway
        .query(&format!(
            "CREATE OR REPLACE ALIAS {alias} FOR {}.{} ({})",
            member.library, member.file, member.name
        ))
        .await?;

    let rows = gateway.query(&format!("SELECT SRCDTA FROM {alias}")).await;

    if let Err(err) = gateway.query(&format!("DROP ALIAS {alias}")).await {
        warn!(%alias, %err, "failed to drop member alias");
    }

    let lines: Vec<String> = rows?
        .into_iter()
        .filter_map(|row| {
            row.get("SRCDTA")
                .and_then(serde_json::Value::as_str)
                .map(|line| line.trim_end().to_string())
        })
        .collect();
    Ok(lines.join("\n"))
}
