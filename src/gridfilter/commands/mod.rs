//! # Command Layer
//!
//! Business operations built on the rule engine and a [`FilterStore`](crate::store::FilterStore).
//! Every command returns a [`CmdResult`]: structured data plus leveled
//! messages. Nothing here prints.

use crate::catalog::{EquipmentType, Field, OperatorType};
use crate::config::GridFilterConfig;
use crate::model::{FilterRecord, GroupNode, NodeId};
use crate::rules::{QueryValidity, ReasonCode, ValidationMap};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use uuid::Uuid;

pub mod check;
pub mod config;
pub mod create;
pub mod delete;
pub mod fields;
pub mod get;
pub mod helpers;
pub mod list;
pub mod remove_rule;
pub mod update;

/// Where filters and configuration live on disk.
#[derive(Debug, Clone)]
pub struct GridFilterPaths {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// One row of `list`.
#[derive(Debug, Clone)]
pub struct FilterSummary {
    /// 1-based position in the listing
    pub index: usize,
    pub id: Uuid,
    pub name: String,
    pub directory: String,
    pub equipment_type: EquipmentType,
    pub rule_count: usize,
    pub updated_at: DateTime<Utc>,
}

/// A node that failed validation, addressed by its path.
#[derive(Debug, Clone)]
pub struct NodeIssue {
    pub id: NodeId,
    pub path: Vec<usize>,
    pub description: String,
    pub reasons: Vec<ReasonCode>,
}

/// Outcome of checking a tree.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub tree: GroupNode,
    pub validation: ValidationMap,
    pub validity: QueryValidity,
    pub rule_count: usize,
    pub issues: Vec<NodeIssue>,
}

/// A field with the operators it accepts.
#[derive(Debug, Clone)]
pub struct FieldListing {
    pub field: Field,
    pub operators: Vec<OperatorType>,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_filters: Vec<FilterRecord>,
    pub listed_filters: Vec<FilterSummary>,
    pub report: Option<CheckReport>,
    pub fields: Vec<FieldListing>,
    pub config: Option<GridFilterConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_filters(mut self, filters: Vec<FilterRecord>) -> Self {
        self.affected_filters = filters;
        self
    }

    pub fn with_listed_filters(mut self, filters: Vec<FilterSummary>) -> Self {
        self.listed_filters = filters;
        self
    }

    pub fn with_report(mut self, report: CheckReport) -> Self {
        self.report = Some(report);
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldListing>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_config(mut self, config: GridFilterConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Fields to apply to a new filter. Unset options fall back to the config.
#[derive(Debug, Clone)]
pub struct NewFilter {
    pub name: String,
    pub description: String,
    pub directory: Option<String>,
    pub equipment_type: Option<EquipmentType>,
    pub tree: GroupNode,
}

/// Changes to an existing filter; `None` leaves the attribute as is.
#[derive(Debug, Clone, Default)]
pub struct FilterUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tree: Option<GroupNode>,
}

/// How a command names a stored filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSelector {
    /// 1-based position in `list`
    Index(usize),
    Id(Uuid),
    /// Exact name, or a unique name prefix
    Name(String),
}

impl std::fmt::Display for FilterSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterSelector::Index(i) => write!(f, "{}", i),
            FilterSelector::Id(id) => write!(f, "{}", id),
            FilterSelector::Name(name) => write!(f, "\"{}\"", name),
        }
    }
}
