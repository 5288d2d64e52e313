//! Table configuration and the request whitelist merge.
//!
//! A [`TableConfig`] carries the declared settings of a table instance. Request
//! parameters may override them, but only for keys the config already knows: the
//! declared fields, and whatever keys the table definition placed in
//! `extra_properties`. Every override is parsed against the field's type; a value that
//! does not parse is dropped and the configured value stays.

use crate::params::RequestParameters;
use crate::source::SortOrder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sort expression used when a definition does not pick one.
pub const DEFAULT_ORDERBY: &str = "menu_order title";

/// Page size used when a definition does not pick one.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// A typed value held in [`TableConfig::extra_properties`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Flag(bool),
    Integer(i64),
    Text(String),
}

impl ConfigValue {
    /// Parses `raw` into the same variant as `self`.
    fn parse_like(&self, raw: &str) -> Option<ConfigValue> {
        match self {
            ConfigValue::Flag(_) => parse_flag(raw).map(ConfigValue::Flag),
            ConfigValue::Integer(_) => raw.trim().parse().ok().map(ConfigValue::Integer),
            ConfigValue::Text(_) => Some(ConfigValue::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Flag(b) => write!(f, "{}", b),
            ConfigValue::Integer(i) => write!(f, "{}", i),
            ConfigValue::Text(s) => f.write_str(s),
        }
    }
}

/// The declared fields of a [`TableConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Singular,
    Plural,
    Ajax,
    PerPage,
    PostType,
    PostStatus,
    Paged,
    Orderby,
    Order,
    ShowFilter,
    Name,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Singular,
        Field::Plural,
        Field::Ajax,
        Field::PerPage,
        Field::PostType,
        Field::PostStatus,
        Field::Paged,
        Field::Orderby,
        Field::Order,
        Field::ShowFilter,
        Field::Name,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Field::Singular => "singular",
            Field::Plural => "plural",
            Field::Ajax => "ajax",
            Field::PerPage => "per_page",
            Field::PostType => "post_type",
            Field::PostStatus => "post_status",
            Field::Paged => "paged",
            Field::Orderby => "orderby",
            Field::Order => "order",
            Field::ShowFilter => "show_filter",
            Field::Name => "name",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// Settings of one table instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Singular label of the listed records; also names the checkbox field.
    pub singular: String,
    pub plural: String,
    pub ajax: bool,
    pub per_page: u32,
    pub post_type: String,
    pub post_status: String,
    pub paged: u32,
    pub orderby: String,
    pub order: SortOrder,
    pub show_filter: bool,
    /// Form name of the full-page render.
    pub name: String,
    /// Definition-specific settings. Declared fields always win over an entry of the
    /// same name.
    #[serde(default)]
    pub extra_properties: BTreeMap<String, ConfigValue>,
}

/// Outcome of [`TableConfig::merge_request`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub applied: Vec<String>,
    pub rejected: Vec<String>,
}

impl TableConfig {
    pub fn new(post_type: impl Into<String>) -> Self {
        let post_type = post_type.into();
        Self {
            singular: String::new(),
            plural: String::new(),
            ajax: true,
            per_page: DEFAULT_PER_PAGE,
            name: format!("{}_table", post_type),
            post_type,
            post_status: "any".to_string(),
            paged: 1,
            orderby: DEFAULT_ORDERBY.to_string(),
            order: SortOrder::Asc,
            show_filter: false,
            extra_properties: BTreeMap::new(),
        }
    }

    pub fn labels(mut self, singular: impl Into<String>, plural: impl Into<String>) -> Self {
        self.singular = singular.into();
        self.plural = plural.into();
        self
    }

    /// Adds an extra property. Returns `false` (and does nothing) when `key` names a
    /// declared field.
    pub fn set_extra(&mut self, key: impl Into<String>, value: ConfigValue) -> bool {
        let key = key.into();
        if Field::from_key(&key).is_some() {
            return false;
        }
        self.extra_properties.insert(key, value);
        true
    }

    /// Reads any known key, declared fields first.
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        match Field::from_key(key) {
            Some(field) => Some(self.field_value(field)),
            None => self.extra_properties.get(key).cloned(),
        }
    }

    fn field_value(&self, field: Field) -> ConfigValue {
        match field {
            Field::Singular => ConfigValue::Text(self.singular.clone()),
            Field::Plural => ConfigValue::Text(self.plural.clone()),
            Field::Ajax => ConfigValue::Flag(self.ajax),
            Field::PerPage => ConfigValue::Integer(i64::from(self.per_page)),
            Field::PostType => ConfigValue::Text(self.post_type.clone()),
            Field::PostStatus => ConfigValue::Text(self.post_status.clone()),
            Field::Paged => ConfigValue::Integer(i64::from(self.paged)),
            Field::Orderby => ConfigValue::Text(self.orderby.clone()),
            Field::Order => ConfigValue::Text(self.order.as_str().to_string()),
            Field::ShowFilter => ConfigValue::Flag(self.show_filter),
            Field::Name => ConfigValue::Text(self.name.clone()),
        }
    }

    /// Known keys whose value differs from `defaults`, as `(key, value)` pairs.
    ///
    /// Declared fields come first in [`Field::ALL`] order, then extra properties. The
    /// window fields (`paged`, `orderby`, `order`) are left out; links set those
    /// themselves.
    pub fn changed_from(&self, defaults: &TableConfig) -> Vec<(String, String)> {
        let declared = Field::ALL
            .into_iter()
            .filter(|f| !matches!(f, Field::Paged | Field::Orderby | Field::Order))
            .map(|f| (f.key(), self.field_value(f), Some(defaults.field_value(f))));
        let extra = self
            .extra_properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone(), defaults.extra_properties.get(k).cloned()));

        declared
            .chain(extra)
            .filter(|(_, value, default)| default.as_ref() != Some(value))
            .map(|(key, value, _)| (key.to_string(), value.to_string()))
            .collect()
    }

    /// Applies request overrides for known keys only.
    pub fn merge_request(&mut self, params: &RequestParameters) -> MergeReport {
        let mut report = MergeReport::default();
        for (key, raw) in params.iter() {
            let accepted = match Field::from_key(key) {
                Some(field) => self.apply_field(field, raw),
                None => match self.extra_properties.get_mut(key) {
                    Some(slot) => match slot.parse_like(raw) {
                        Some(value) => {
                            *slot = value;
                            true
                        }
                        None => false,
                    },
                    None => continue,
                },
            };
            if accepted {
                report.applied.push(key.to_string());
            } else {
                report.rejected.push(key.to_string());
            }
        }
        report
    }

    fn apply_field(&mut self, field: Field, raw: &str) -> bool {
        match field {
            Field::Singular => self.singular = raw.to_string(),
            Field::Plural => self.plural = raw.to_string(),
            Field::PostType => self.post_type = raw.to_string(),
            Field::PostStatus => self.post_status = raw.to_string(),
            Field::Orderby => self.orderby = raw.to_string(),
            Field::Name => self.name = raw.to_string(),
            Field::Ajax => match parse_flag(raw) {
                Some(b) => self.ajax = b,
                None => return false,
            },
            Field::ShowFilter => match parse_flag(raw) {
                Some(b) => self.show_filter = b,
                None => return false,
            },
            Field::PerPage => match parse_positive(raw) {
                Some(n) => self.per_page = n,
                None => return false,
            },
            Field::Paged => match parse_positive(raw) {
                Some(n) => self.paged = n,
                None => return false,
            },
            Field::Order => match SortOrder::parse(raw) {
                Some(o) => self.order = o,
                None => return false,
            },
        }
        true
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Parses an integer and clamps it to at least 1.
fn parse_positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<i64>().ok().map(|n| n.clamp(1, i64::from(u32::MAX)) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_are_not_injected() {
        let mut config = TableConfig::new("post");
        let params = RequestParameters::from_query("per_page=5&evil_field=x");
        let report = config.merge_request(&params);

        assert_eq!(config.per_page, 5);
        assert_eq!(report.applied, vec!["per_page".to_string()]);
        assert!(config.get("evil_field").is_none());
        assert!(!config.extra_properties.contains_key("evil_field"));
    }

    #[test]
    fn malformed_values_keep_the_configured_value() {
        let mut config = TableConfig::new("post");
        let params = RequestParameters::from_query("per_page=lots&order=sideways&show_filter=maybe&paged=-4");
        let report = config.merge_request(&params);

        assert_eq!(config.per_page, DEFAULT_PER_PAGE);
        assert_eq!(config.order, SortOrder::Asc);
        assert!(!config.show_filter);
        assert_eq!(config.paged, 1);
        assert_eq!(report.rejected.len(), 3);
        assert_eq!(report.applied, vec!["paged".to_string()]);
    }

    #[test]
    fn extra_properties_are_typed_by_their_default() {
        let mut config = TableConfig::new("post");
        assert!(config.set_extra("author", ConfigValue::Integer(0)));
        assert!(config.set_extra("highlight", ConfigValue::Flag(false)));
        assert!(!config.set_extra("per_page", ConfigValue::Integer(99)));

        let params = RequestParameters::from_query("author=12&highlight=banana");
        let report = config.merge_request(&params);

        assert_eq!(config.get("author"), Some(ConfigValue::Integer(12)));
        assert_eq!(config.get("highlight"), Some(ConfigValue::Flag(false)));
        assert_eq!(report.rejected, vec!["highlight".to_string()]);
        assert_eq!(config.get("per_page"), Some(ConfigValue::Integer(20)));
    }

    #[test]
    fn changed_fields_skip_the_page_window() {
        let defaults = TableConfig::new("post");
        let mut config = defaults.clone();
        config.set_extra("author", ConfigValue::Integer(3));
        let params = RequestParameters::from_query("post_status=draft&per_page=5&paged=4&order=desc");
        config.merge_request(&params);

        assert_eq!(
            config.changed_from(&defaults),
            vec![
                ("per_page".to_string(), "5".to_string()),
                ("post_status".to_string(), "draft".to_string()),
                ("author".to_string(), "3".to_string()),
            ]
        );
        assert!(defaults.changed_from(&defaults).is_empty());
    }

    #[test]
    fn declared_field_lookup_round_trips_keys() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key("evil_field"), None);
    }
}
