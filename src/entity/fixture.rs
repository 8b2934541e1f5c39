// Demo data: the staff used by the `seed` command and the scenario tests.
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{Department, Employee};

const FIRST_NAMES: [&str; 8] = [
    "Alice", "Bruno", "Chiara", "Dmitri", "Elena", "Farid", "Greta", "Hugo",
];
const LAST_NAMES: [&str; 6] = ["Moreau", "Novak", "Okafor", "Petrov", "Quinn", "Rossi"];

fn born(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
}

/// `(year of birth, department, head count)` groups of the demo staff.
pub const DEMO_GROUPS: [(i32, Department, usize); 4] = [
    (1960, Department::Hr, 15),
    (1960, Department::It, 16),
    (1960, Department::Communication, 14),
    (1990, Department::Hr, 5),
];

/// 45 employees born in 1960 spread over the three departments, plus five
/// HR employees born in 1990.
pub fn demo_employees() -> Vec<Employee> {
    let mut employees = Vec::new();
    for (year, department, head_count) in DEMO_GROUPS {
        for n in 0..head_count {
            let id = employees.len() as i64 + 1;
            let idx = id as usize;
            employees.push(Employee {
                id,
                first_name: FIRST_NAMES[idx % FIRST_NAMES.len()].to_string(),
                last_name: LAST_NAMES[idx % LAST_NAMES.len()].to_string(),
                date_of_birth: born(year, (n % 12) as u32 + 1, (n % 28) as u32 + 1),
                department,
            });
        }
    }
    employees
}
