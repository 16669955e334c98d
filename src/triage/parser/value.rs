//! 宽松取值工具
//!
//! 接口返回的 JSON 字段可能缺失、为 null 或类型不对，这里统一按默认值收敛，
//! 任何输入都不会报错。

use serde_json::{Map, Value};

static NULL: Value = Value::Null;

/// 取对象字段；不是对象或字段不存在时返回 null，嵌套缺失等价于 `{}`
pub fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&NULL)
}

/// 字符串：null/缺失 -> ""，其他类型转成文本
pub fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(_) => number_text(value),
        Value::Array(items) => items.iter().map(text).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// 可选字符串：只有字段存在且非 null 时才有值
pub fn opt_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(text(other)),
    }
}

/// 宽松数值：数字原样，数字字符串解析，其余（含空串、非数字）为 None
pub fn number_or_null(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

/// 严格数值：只接受 JSON 数字
pub fn number_only(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

pub fn integer_or_null(value: &Value) -> Option<i64> {
    number_or_null(value).map(|n| n as i64)
}

/// 真值判断：null/false/0/"" 为 false
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn bool_only(value: &Value) -> Option<bool> {
    value.as_bool()
}

/// 字符串数组；不是数组时为空
pub fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(text).collect(),
        _ => Vec::new(),
    }
}

/// 对象原样保留；不是对象时为空
pub fn object_or_empty(value: &Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    }
}

/// 数字的展示文本，整数值不带小数点
pub fn number_text(value: &Value) -> String {
    match value {
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return n.to_string();
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
                Some(f) => format!("{}", f),
                None => n.to_string(),
            }
        }
        _ => String::new(),
    }
}
