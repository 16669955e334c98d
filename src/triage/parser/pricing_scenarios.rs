//! 定价场景（PE 请求的输入快照）

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::triage::parser::value::{field, number_or_null, object_or_empty, string_list, text};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioBorrower {
    pub first_name: String,
    pub last_name: String,
    pub fico: Option<f64>,
    pub dti_ratio: Option<f64>,
    pub annual_income: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioLoan {
    pub amount: Option<f64>,
    pub purpose: String,
    pub refinance_purpose: String,
    pub ltv: Option<f64>,
    pub cltv: Option<f64>,
    pub los_loan_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioProperty {
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub property_type: String,
    pub occupancy: String,
    pub appraised_value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSearch {
    pub desired_lock_period: Option<f64>,
    pub product_codes: Vec<String>,
    pub loan_types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingScenario {
    pub base_rate_set_id: String,
    pub changeset_id: String,
    pub requested_on: String,
    pub completed_on: String,
    pub borrower: ScenarioBorrower,
    pub loan: ScenarioLoan,
    pub property: ScenarioProperty,
    pub search: ScenarioSearch,
    /// 自定义字段原样保留
    pub custom_values: Map<String, Value>,
}

/// peRequestId -> 定价场景；获取失败的 id 映射为 None
pub type PricingByPeRequestId = BTreeMap<String, Option<PricingScenario>>;

pub fn parse_pricing_scenario(raw: &Value) -> PricingScenario {
    let borrower = field(raw, "borrower");
    let loan = field(raw, "loan");
    let property = field(raw, "property");
    let search = field(raw, "search");

    PricingScenario {
        base_rate_set_id: text(field(raw, "baseRateSetId")),
        changeset_id: text(field(raw, "changesetId")),
        requested_on: text(field(raw, "requestedOn")),
        completed_on: text(field(raw, "completedOn")),
        borrower: ScenarioBorrower {
            first_name: text(field(borrower, "firstName")),
            last_name: text(field(borrower, "lastName")),
            fico: number_or_null(field(borrower, "fico")),
            dti_ratio: number_or_null(field(borrower, "dtiRatio")),
            annual_income: number_or_null(field(borrower, "annualIncome")),
        },
        loan: ScenarioLoan {
            amount: number_or_null(field(loan, "amount")),
            purpose: text(field(loan, "purpose")),
            refinance_purpose: text(field(loan, "refinancePurpose")),
            ltv: number_or_null(field(loan, "ltv")),
            cltv: number_or_null(field(loan, "cltv")),
            los_loan_id: text(field(loan, "losLoanId")),
        },
        property: ScenarioProperty {
            address_line1: text(field(property, "addressLine1")),
            city: text(field(property, "city")),
            state: text(field(property, "state")),
            zip_code: text(field(property, "zipCode")),
            property_type: text(field(property, "propertyType")),
            occupancy: text(field(property, "occupancy")),
            appraised_value: number_or_null(field(property, "appraisedValue")),
        },
        search: ScenarioSearch {
            desired_lock_period: number_or_null(field(search, "desiredLockPeriod")),
            product_codes: string_list(field(search, "productCodes")),
            loan_types: string_list(field(search, "loanTypes")),
        },
        custom_values: object_or_empty(field(raw, "customValues")),
    }
}
