//! Persisted user settings: default parameters and conversion lists

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{CommandParams, ConversionList, EntryPatch};

/// Everything the tool remembers between runs, stored wholesale as one
/// JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub command: CommandParams,
    #[serde(rename = "conversionList", default)]
    pub conversion_list: Vec<ConversionList>,
}

/// Read-modify-write persistence for [`Settings`].
///
/// Every mutation loads the whole document, edits it in memory and writes
/// it back. Concurrent writers get last-write-wins, which is acceptable for
/// a single-user tool driven from one terminal at a time.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Store {
        Store { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let text = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(settings)?)?;
        Ok(())
    }

    pub fn params(&self) -> Result<CommandParams> {
        Ok(self.load()?.command)
    }

    pub fn save_params(&self, params: &CommandParams) -> Result<()> {
        let mut settings = self.load()?;
        settings.command = params.clone();
        self.save(&settings)
    }

    pub fn lists(&self) -> Result<Vec<ConversionList>> {
        Ok(self.load()?.conversion_list)
    }

    pub fn find(&self, name: &str) -> Result<Option<ConversionList>> {
        Ok(self
            .load()?
            .conversion_list
            .into_iter()
            .find(|list| list.name.eq_ignore_ascii_case(name)))
    }

    /// Append a list. Name uniqueness is the caller's concern; creation
    /// flows check against existing names before calling this.
    pub fn add(&self, list: ConversionList) -> Result<()> {
        let mut settings = self.load()?;
        settings.conversion_list.push(list);
        self.save(&settings)
    }

    /// Replace the stored list with the same name. Unknown names are a
    /// silent no-op.
    pub fn update(&self, list: ConversionList) -> Result<()> {
        let mut settings = self.load()?;
        if let Some(stored) = settings
            .conversion_list
            .iter_mut()
            .find(|stored| stored.name.eq_ignore_ascii_case(&list.name))
        {
            *stored = list;
            self.save(&settings)?;
        }
        Ok(())
    }

    /// Delete a list by name. Unknown names are a silent no-op.
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut settings = self.load()?;
        let before = settings.conversion_list.len();
        settings
            .conversion_list
            .retain(|list| !list.name.eq_ignore_ascii_case(name));
        if settings.conversion_list.len() != before {
            self.save(&settings)?;
        }
        Ok(())
    }

    /// Merge a patch into one entry, located by list name and member name.
    /// Missing list or member is a silent no-op.
    pub fn update_item(&self, list_name: &str, member: &str, patch: &EntryPatch) -> Result<()> {
        let mut settings = self.load()?;
        let entry = settings
            .conversion_list
            .iter_mut()
            .find(|list| list.name.eq_ignore_ascii_case(list_name))
            .and_then(|list| list.find_item_mut(member));
        if let Some(entry) = entry {
            patch.apply(entry);
            self.save(&settings)?;
        }
        Ok(())
    }

    /// Drop one entry from one list. Missing list or member is a silent
    /// no-op.
    pub fn remove_item(&self, list_name: &str, member: &str) -> Result<()> {
        let mut settings = self.load()?;
        if let Some(list) = settings
            .conversion_list
            .iter_mut()
            .find(|list| list.name.eq_ignore_ascii_case(list_name))
        {
            let before = list.items.len();
            list.items
                .retain(|item| !item.member.eq_ignore_ascii_case(member));
            if list.items.len() != before {
                self.save(&settings)?;
            }
        }
        Ok(())
    }
}
