//! 贷款详情

use serde::Serialize;
use serde_json::Value;

use crate::triage::parser::value::{field, number_only, text};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanBorrower {
    pub first_name: String,
    pub last_name: String,
    pub fico: Option<f64>,
    pub dti_ratio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanProperty {
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub property_type: String,
    pub occupancy: String,
    pub appraised_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoanOfficer {
    pub name: String,
    pub email: String,
}

/// 金额、利率、LTV 等保持接口原文，便于直接展示
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub loan_number: String,
    pub los_loan_id: String,
    pub purpose: String,
    pub amount: String,
    pub rate: String,
    pub product_name: String,
    pub product_code: String,
    pub loan_term: Option<f64>,
    pub loan_type: String,
    pub amortization_type: String,
    pub application_date: String,
    pub funded_at: String,
    pub ltv: String,
    pub cltv: String,
    pub borrower: LoanBorrower,
    pub property: LoanProperty,
    pub loan_officer: LoanOfficer,
}

pub fn parse_loan(raw: &Value) -> Loan {
    let borrower = field(raw, "borrower");
    let property = field(raw, "property");
    let officer = field(raw, "loanofficer");

    Loan {
        loan_number: text(field(raw, "loanNumber")),
        los_loan_id: text(field(raw, "losLoanId")),
        purpose: text(field(raw, "purpose")),
        amount: text(field(raw, "amount")),
        rate: text(field(raw, "rate")),
        product_name: text(field(raw, "productName")),
        product_code: text(field(raw, "productCode")),
        loan_term: number_only(field(raw, "loanTerm")),
        loan_type: text(field(raw, "loanType")),
        amortization_type: text(field(raw, "amortizationType")),
        application_date: text(field(raw, "applicationDate")),
        funded_at: text(field(raw, "fundedAt")),
        ltv: text(field(raw, "ltv")),
        cltv: text(field(raw, "cltv")),
        borrower: LoanBorrower {
            first_name: text(field(borrower, "firstName")),
            last_name: text(field(borrower, "lastName")),
            fico: number_only(field(borrower, "fico")),
            dti_ratio: text(field(borrower, "dtiRatio")),
        },
        property: LoanProperty {
            address_line1: text(field(property, "addressLine1")),
            city: text(field(property, "city")),
            state: text(field(property, "state")),
            zip_code: text(field(property, "zipCode")),
            property_type: text(field(property, "propertyType")),
            occupancy: text(field(property, "occupancy")),
            appraised_value: text(field(property, "appraisedValue")),
        },
        loan_officer: LoanOfficer {
            name: text(field(officer, "name")),
            email: text(field(officer, "email")),
        },
    }
}
