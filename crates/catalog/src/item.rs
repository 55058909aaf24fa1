use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use seragam_core::{DomainError, DomainResult, Entity, ItemId};

/// School level (jenjang) — classification axis for items and orders.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Elementary (SD).
    Sd,
    /// Middle (SMP).
    Smp,
    /// High (SMA).
    Sma,
}

impl core::fmt::Display for Level {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Level::Sd => "sd",
            Level::Smp => "smp",
            Level::Sma => "sma",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl core::fmt::Display for Gender {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Gender::Male => "male",
            Gender::Female => "female",
        };
        f.write_str(s)
    }
}

/// Catalog entry for one uniform article (name + level + gender + size).
///
/// Referenced by order lines and by the stock ledger. Immutable once
/// created except through [`Item::edit`], which re-validates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    name: String,
    level: Level,
    gender: Gender,
    size: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Item {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        level: Level,
        gender: Gender,
        size: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let size = size.into();
        Self::validate(&name, &size)?;

        Ok(Self {
            id,
            name,
            level,
            gender,
            size,
            created_at: now,
            updated_at: now,
        })
    }

    /// Explicit edit — the only mutation path for a catalog entry.
    pub fn edit(
        &mut self,
        name: impl Into<String>,
        level: Level,
        gender: Gender,
        size: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let name = name.into();
        let size = size.into();
        Self::validate(&name, &size)?;

        self.name = name;
        self.level = level;
        self.gender = gender;
        self.size = size;
        self.updated_at = now;
        Ok(())
    }

    fn validate(name: &str, size: &str) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        if size.trim().is_empty() {
            return Err(DomainError::validation("item size cannot be empty"));
        }
        Ok(())
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn new_item_validates_name_and_size() {
        let err = Item::new(
            ItemId::new(),
            "  ",
            Level::Sd,
            Gender::Male,
            "M",
            test_time(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = Item::new(
            ItemId::new(),
            "Kemeja SD",
            Level::Sd,
            Gender::Male,
            "",
            test_time(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn edit_revalidates_and_bumps_updated_at() {
        let created = test_time();
        let mut item = Item::new(
            ItemId::new(),
            "Kemeja SD",
            Level::Sd,
            Gender::Male,
            "M",
            created,
        )
        .unwrap();

        let later = created + chrono::Duration::seconds(5);
        item.edit("Kemeja SMP", Level::Smp, Gender::Male, "L", later)
            .unwrap();

        assert_eq!(item.name(), "Kemeja SMP");
        assert_eq!(item.level(), Level::Smp);
        assert_eq!(item.size(), "L");
        assert_eq!(item.updated_at(), later);
        assert_eq!(item.created_at(), created);

        let err = item
            .edit("", Level::Sma, Gender::Female, "XL", later)
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        // Failed edit must leave the entry untouched.
        assert_eq!(item.name(), "Kemeja SMP");
    }
}
