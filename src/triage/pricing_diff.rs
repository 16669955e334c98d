//! 锁价请求之间的定价输入差异
//!
//! 只比较 borrower / loan / property / search / customValues 五个分区。
//! 每个分区被展开为点分路径的叶子节点（数组整体视为一个叶子），
//! 两边展示文本不同即记为一处变化。

use serde::Serialize;
use serde_json::Value;

use crate::triage::parser::lock_requests::LockRequest;
use crate::triage::parser::pricing_scenarios::{PricingByPeRequestId, PricingScenario};
use crate::triage::parser::value::text;

pub const PRICING_INPUT_SECTIONS: [&str; 5] = ["borrower", "loan", "property", "search", "customValues"];

/// 缺失值的展示
pub const EMPTY_DISPLAY: &str = "—";
const EMPTY_VALUE_DISPLAY: &str = "(empty)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricingChange {
    pub path: String,
    pub previous: String,
    pub current: String,
}

/// 展示文本：路径缺失为 `—`，空字符串为 `(empty)`
pub fn format_for_display(leaf: Option<&str>) -> String {
    match leaf {
        None => EMPTY_DISPLAY.to_string(),
        Some("") => EMPTY_VALUE_DISPLAY.to_string(),
        Some(s) => s.to_string(),
    }
}

/// 叶子值的文本：null 为空串，数组逐项转文本后以 ", " 连接
pub fn leaf_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().map(text).collect::<Vec<_>>().join(", "),
        other => text(other),
    }
}

/// 展开为 `prefix.key.sub` -> 叶子文本，保持字段顺序
pub fn flatten_section(value: &Value, prefix: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    flatten_into(value, prefix, &mut out);
    out
}

fn flatten_into(value: &Value, prefix: &str, out: &mut Vec<(String, String)>) {
    let Some(object) = value.as_object() else {
        return;
    };
    for (key, child) in object {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match child {
            Value::Object(_) => flatten_into(child, &path, out),
            leaf => out.push((path, leaf_text(leaf))),
        }
    }
}

fn leaf_at<'a>(flat: &'a [(String, String)], path: &str) -> Option<&'a str> {
    flat.iter()
        .find(|(p, _)| p == path)
        .map(|(_, leaf)| leaf.as_str())
}

/// 比较两个定价快照（任意 JSON），只看输入分区
pub fn diff_pricing(previous: &Value, current: &Value) -> Vec<PricingChange> {
    let mut changes = Vec::new();
    for section in PRICING_INPUT_SECTIONS {
        let prev_flat = flatten_section(section_of(previous, section), section);
        let curr_flat = flatten_section(section_of(current, section), section);

        let curr_only = curr_flat
            .iter()
            .map(|(path, _)| path)
            .filter(|path| leaf_at(&prev_flat, path).is_none());
        let paths: Vec<&String> = prev_flat.iter().map(|(path, _)| path).chain(curr_only).collect();

        for path in paths {
            let prev_display = format_for_display(leaf_at(&prev_flat, path));
            let curr_display = format_for_display(leaf_at(&curr_flat, path));
            if prev_display != curr_display {
                changes.push(PricingChange {
                    path: path.clone(),
                    previous: prev_display,
                    current: curr_display,
                });
            }
        }
    }
    changes
}

fn section_of<'a>(pricing: &'a Value, section: &str) -> &'a Value {
    static EMPTY: Value = Value::Null;
    match pricing.get(section) {
        Some(value) if value.is_object() => value,
        _ => &EMPTY,
    }
}

pub fn diff_scenarios(previous: &PricingScenario, current: &PricingScenario) -> Vec<PricingChange> {
    let previous = serde_json::to_value(previous).unwrap_or(Value::Null);
    let current = serde_json::to_value(current).unwrap_or(Value::Null);
    diff_pricing(&previous, &current)
}

/// 每个锁价请求相对其时间上前一个请求的定价差异，按传入顺序返回
///
/// 时间上最早的请求、或自身/前一个请求缺少定价场景时，对应位置为 None。
/// 时间按 requestedOn 升序，相同时按 id 升序。
pub fn pricing_diffs_from_previous(
    locks: &[LockRequest],
    pricing: &PricingByPeRequestId,
) -> Vec<Option<Vec<PricingChange>>> {
    let mut chronological: Vec<usize> = (0..locks.len()).collect();
    chronological.sort_by(|&a, &b| {
        locks[a]
            .requested_on
            .cmp(&locks[b].requested_on)
            .then(locks[a].id.cmp(&locks[b].id))
    });

    let mut diffs = vec![None; locks.len()];
    for pair in chronological.windows(2) {
        let (prev, curr) = (&locks[pair[0]], &locks[pair[1]]);
        diffs[pair[1]] = match (scenario_for(prev, pricing), scenario_for(curr, pricing)) {
            (Some(p), Some(c)) => Some(diff_scenarios(p, c)),
            _ => None,
        };
    }
    diffs
}

fn scenario_for<'a>(lock: &LockRequest, pricing: &'a PricingByPeRequestId) -> Option<&'a PricingScenario> {
    lock.pe_request_id()
        .and_then(|id| pricing.get(id))
        .and_then(Option::as_ref)
}
