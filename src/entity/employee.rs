use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Column, Entity, FieldSelector, FieldValue, Value, ValueKind};
use crate::{
    error::{CoercionError, QueryError},
    query::{CountReport, Predicate, Repository},
    storage::EntityStore,
};

pub type EmployeeRepository<S> = Repository<Employee, S>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Department {
    Hr,
    It,
    Communication,
}

impl Department {
    pub const ALL: [Department; 3] = [Department::Hr, Department::It, Department::Communication];

    pub const fn as_str(self) -> &'static str {
        match self {
            Department::Hr => "HR",
            Department::It => "IT",
            Department::Communication => "COMMUNICATION",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown department: {0}")]
pub struct UnknownDepartment(pub String);

impl FromStr for Department {
    type Err = UnknownDepartment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDepartment(s.to_string()))
    }
}

// Stored by name, like an enum column mapped as text.
impl FieldValue for Department {
    const KIND: ValueKind = ValueKind::Text;

    fn into_value(self) -> Value {
        Value::Text(self.as_str().to_string())
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            // stored names are exact; case folding is for user input only
            Value::Text(s) => Department::ALL
                .into_iter()
                .find(|d| d.as_str() == s)
                .ok_or_else(|| CoercionError::new("Department", Value::Text(s))),
            other => Err(CoercionError::new("Department", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDateTime,
    pub department: Department,
}

impl Employee {
    pub const ID: FieldSelector<Employee, i64> = FieldSelector::new("id", |e| e.id);
    pub const FIRST_NAME: FieldSelector<Employee, String> =
        FieldSelector::new("first_name", |e| e.first_name.clone());
    pub const LAST_NAME: FieldSelector<Employee, String> =
        FieldSelector::new("last_name", |e| e.last_name.clone());
    pub const DATE_OF_BIRTH: FieldSelector<Employee, NaiveDateTime> =
        FieldSelector::new("date_of_birth", |e| e.date_of_birth);
    pub const DEPARTMENT: FieldSelector<Employee, Department> =
        FieldSelector::new("department", |e| e.department);
}

impl Entity for Employee {
    const TABLE: &'static str = "employee";
    const COLUMNS: &'static [Column] = &[
        Column::new("id", ValueKind::Integer).primary_key(),
        Column::new("first_name", ValueKind::Text),
        Column::new("last_name", ValueKind::Text),
        Column::new("date_of_birth", ValueKind::Timestamp),
        Column::new("department", ValueKind::Text),
    ];

    fn value_of(&self, column: &str) -> Option<Value> {
        let value = match column {
            "id" => Value::Integer(self.id),
            "first_name" => Value::Text(self.first_name.clone()),
            "last_name" => Value::Text(self.last_name.clone()),
            "date_of_birth" => Value::Timestamp(self.date_of_birth),
            "department" => self.department.into_value(),
            _ => return None,
        };
        Some(value)
    }
}

/// Grouping field chosen by name at runtime (CLI flag, query string).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmployeeField {
    Id,
    FirstName,
    LastName,
    DateOfBirth,
    Department,
}

impl EmployeeField {
    pub const fn name(self) -> &'static str {
        match self {
            EmployeeField::Id => Employee::ID.column(),
            EmployeeField::FirstName => Employee::FIRST_NAME.column(),
            EmployeeField::LastName => Employee::LAST_NAME.column(),
            EmployeeField::DateOfBirth => Employee::DATE_OF_BIRTH.column(),
            EmployeeField::Department => Employee::DEPARTMENT.column(),
        }
    }

    pub fn count_report<S: EntityStore<Employee>>(
        self,
        repo: &EmployeeRepository<S>,
        filter: &Predicate<Employee>,
    ) -> Result<CountReport, QueryError> {
        let name = self.name();
        let report = match self {
            EmployeeField::Id => CountReport::new(name, &repo.group_and_count(&Employee::ID, filter)?),
            EmployeeField::FirstName => {
                CountReport::new(name, &repo.group_and_count(&Employee::FIRST_NAME, filter)?)
            }
            EmployeeField::LastName => {
                CountReport::new(name, &repo.group_and_count(&Employee::LAST_NAME, filter)?)
            }
            EmployeeField::DateOfBirth => {
                CountReport::new(name, &repo.group_and_count(&Employee::DATE_OF_BIRTH, filter)?)
            }
            EmployeeField::Department => {
                CountReport::new(name, &repo.group_and_count(&Employee::DEPARTMENT, filter)?)
            }
        };
        Ok(report)
    }
}

impl fmt::Display for EmployeeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EmployeeField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "id" => Ok(EmployeeField::Id),
            "first_name" => Ok(EmployeeField::FirstName),
            "last_name" => Ok(EmployeeField::LastName),
            "date_of_birth" => Ok(EmployeeField::DateOfBirth),
            "department" => Ok(EmployeeField::Department),
            other => Err(QueryError::unknown_column(Employee::TABLE, other)),
        }
    }
}

/// Criteria accepted from the CLI and the REST layer. Absent criteria do not
/// restrict the result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub born_before: Option<NaiveDate>,
    pub born_after: Option<NaiveDate>,
    pub department: Option<Department>,
}

impl EmployeeFilter {
    pub fn to_predicate(&self) -> Predicate<Employee> {
        let mut predicate = Predicate::all();
        if let Some(date) = self.born_before {
            predicate = predicate & Employee::DATE_OF_BIRTH.lt(date.and_time(NaiveTime::MIN));
        }
        // born after the given day: from the following midnight on
        if let Some(date) = self.born_after {
            let start = date.succ_opt().unwrap_or(NaiveDate::MAX).and_time(NaiveTime::MIN);
            predicate = predicate & Employee::DATE_OF_BIRTH.gte(start);
        }
        if let Some(department) = self.department {
            predicate = predicate & Employee::DEPARTMENT.eq(department);
        }
        predicate
    }
}
