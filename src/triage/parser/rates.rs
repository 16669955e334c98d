//! PE 利率集合

use serde::Serialize;
use serde_json::Value;

use crate::triage::parser::value::{bool_only, field, integer_or_null, opt_text, text};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSetItem {
    pub id: String,
    pub changeset_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_rate_set_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RatePage {
    pub items: Vec<RateSetItem>,
    pub total: Option<i64>,
}

/// 解析 `{data: {items, total}}`；缺少 data 信封时返回空结果
pub fn parse_pe_rates(raw: &Value) -> RatePage {
    let has_envelope = raw.as_object().map(|o| o.contains_key("data")).unwrap_or(false);
    if !has_envelope {
        return RatePage::default();
    }
    let data = field(raw, "data");

    let items = field(data, "items")
        .as_array()
        .map(|list| {
            list.iter()
                .filter(|item| item.is_object())
                .map(|item| RateSetItem {
                    id: text(field(item, "id")),
                    changeset_id: text(field(item, "changesetId")),
                    base_rate_set_id: opt_text(field(item, "baseRateSetId")),
                    created_on: opt_text(field(item, "createdOn")),
                    is_published: bool_only(field(item, "isPublished")),
                })
                .collect()
        })
        .unwrap_or_default();

    RatePage {
        items,
        total: integer_or_null(field(data, "total")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_rates() {
        let raw = json!({"data": {"total": 2, "items": [
            {"id": "r1", "changesetId": "c1", "baseRateSetId": "r0", "createdOn": "2024-01-01", "isPublished": true},
            {"id": "r2", "changesetId": "c1", "isPublished": "yes"},
            "junk"
        ]}});
        let page = parse_pe_rates(&raw);
        assert_eq!(page.total, Some(2));
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].base_rate_set_id.as_deref(), Some("r0"));
        assert_eq!(page.items[0].is_published, Some(true));
        assert_eq!(page.items[1].is_published, None);
        assert_eq!(page.items[1].created_on, None);

        let json = serde_json::to_value(&page.items[1]).unwrap();
        assert_eq!(json, json!({"id": "r2", "changesetId": "c1"}));
    }

    #[test]
    fn test_missing_envelope() {
        assert_eq!(parse_pe_rates(&json!({"items": []})), RatePage::default());
        assert_eq!(parse_pe_rates(&json!(null)), RatePage::default());
        let page = parse_pe_rates(&json!({"data": null}));
        assert!(page.items.is_empty());
        assert_eq!(page.total, None);
    }
}
