use chrono::NaiveDate;
use clap::{Args, Subcommand};

use crate::entity::{Department, EmployeeField, EmployeeFilter};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(
        about = "Install the demo employees",
        long_about = "Insert the demo staff into the employee table, replacing rows with the same id."
    )]
    Seed,
    #[command(
        about = "Count employees grouped by a field",
        long_about = "Group the employees matching the filters by FIELD and print the count per value as JSON."
    )]
    Count {
        #[arg(
            long = "by",
            value_name = "FIELD",
            default_value = "department",
            help = "Field to group by: id, first_name, last_name, date_of_birth or department"
        )]
        by: EmployeeField,
        #[command(flatten)]
        filter: FilterArgs,
    },
    #[command(
        about = "Serve the REST API",
        long_about = "Expose the grouped count over HTTP until Ctrl-C."
    )]
    Serve {
        #[arg(
            long = "api-listen",
            env = "GROUPCOUNT_API_LISTEN",
            value_name = "ADDR",
            default_value = "127.0.0.1:8083",
            help = "REST API listen address (host:port)"
        )]
        api_listen: std::net::SocketAddr,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(
        long,
        value_name = "DATE",
        help = "Only employees born before DATE (YYYY-MM-DD)"
    )]
    pub born_before: Option<NaiveDate>,

    #[arg(
        long,
        value_name = "DATE",
        help = "Only employees born after DATE (YYYY-MM-DD)"
    )]
    pub born_after: Option<NaiveDate>,

    #[arg(long, value_name = "DEPARTMENT", help = "Only employees of DEPARTMENT")]
    pub department: Option<Department>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> EmployeeFilter {
        EmployeeFilter {
            born_before: self.born_before,
            born_after: self.born_after,
            department: self.department,
        }
    }
}
