//! 变更集列表

use serde::Serialize;
use serde_json::Value;

use crate::triage::parser::value::{field, integer_or_null, opt_text, text};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangesetDetails {
    pub status: String,
    pub initiated_at: String,
    pub published_at: String,
    pub pricing_generated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub based_on_id: String,
    pub additions_to_base: Option<i64>,
    pub modifications_to_base: Option<i64>,
    pub removals_from_base: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Changeset {
    pub id: String,
    pub name: String,
    pub details: ChangesetDetails,
    pub version_info: VersionInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangesetPage {
    pub total: Option<i64>,
    /// 按 publishedAt 倒序
    pub changesets: Vec<Changeset>,
    pub next_page: Option<String>,
    pub previous_page: Option<String>,
}

impl ChangesetPage {
    pub fn ids(&self) -> Vec<String> {
        self.changesets.iter().map(|c| c.id.clone()).collect()
    }
}

/// 解析变更集列表；没有 `changesets` 字段时返回空页
pub fn parse_changesets(raw: &Value) -> ChangesetPage {
    let has_list = raw.as_object().map(|o| o.contains_key("changesets")).unwrap_or(false);
    if !has_list {
        return ChangesetPage::default();
    }

    let mut changesets: Vec<Changeset> = field(raw, "changesets")
        .as_array()
        .map(|items| items.iter().filter_map(parse_changeset).collect())
        .unwrap_or_default();

    // ISO-8601 字符串的字典序即时间序；sort_by 稳定，同一时间保持原顺序
    changesets.sort_by(|a, b| b.details.published_at.cmp(&a.details.published_at));

    ChangesetPage {
        total: integer_or_null(field(raw, "total")),
        changesets,
        next_page: opt_text(field(raw, "nextPage")),
        previous_page: opt_text(field(raw, "previousPage")),
    }
}

fn parse_changeset(item: &Value) -> Option<Changeset> {
    if !item.is_object() {
        return None;
    }
    let details = field(item, "details");
    let version_info = field(item, "versionInfo");

    Some(Changeset {
        id: text(field(item, "id")),
        name: text(field(item, "name")),
        details: ChangesetDetails {
            status: text(field(details, "status")),
            initiated_at: text(field(details, "initiatedAt")),
            published_at: text(field(details, "publishedAt")),
            pricing_generated_at: text(field(details, "pricingGeneratedAt")),
        },
        version_info: VersionInfo {
            based_on_id: text(field(version_info, "basedOnId")),
            additions_to_base: integer_or_null(field(version_info, "additionsToBase")),
            modifications_to_base: integer_or_null(field(version_info, "modificationsToBase")),
            removals_from_base: integer_or_null(field(version_info, "removalsFromBase")),
        },
    })
}
