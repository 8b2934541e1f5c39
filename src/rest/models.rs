use serde::{Deserialize, Serialize};

use crate::{
    entity::{Department, EmployeeField, EmployeeFilter},
    error::QueryError,
};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Query string of `GET /employees/count`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountParams {
    pub by: Option<String>,
    pub born_before: Option<String>,
    pub born_after: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug)]
pub enum ParamsError {
    Query(QueryError),
    Invalid(String),
}

impl CountParams {
    pub fn parse(&self) -> Result<(EmployeeField, EmployeeFilter), ParamsError> {
        let field = match self.by.as_deref() {
            Some(by) => by.parse::<EmployeeField>().map_err(ParamsError::Query)?,
            None => EmployeeField::Department,
        };
        let filter = EmployeeFilter {
            born_before: parse_date("bornBefore", self.born_before.as_deref())?,
            born_after: parse_date("bornAfter", self.born_after.as_deref())?,
            department: self
                .department
                .as_deref()
                .map(|d| d.parse::<Department>())
                .transpose()
                .map_err(|e| ParamsError::Invalid(e.to_string()))?,
        };
        Ok((field, filter))
    }
}

fn parse_date(name: &str, raw: Option<&str>) -> Result<Option<chrono::NaiveDate>, ParamsError> {
    raw.map(|s| {
        s.trim()
            .parse::<chrono::NaiveDate>()
            .map_err(|e| ParamsError::Invalid(format!("invalid {name} {s:?}: {e}")))
    })
    .transpose()
}
