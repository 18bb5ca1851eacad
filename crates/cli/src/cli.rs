//! Command-line schema for the `sitebook` binary.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use sitebook_core::models::AttendanceStatus;
use sitebook_core::roles::Area;
use sitebook_core::table::DEFAULT_PAGE_SIZE;

#[derive(Parser, Debug)]
#[command(name = "sitebook")]
#[command(about = "Construction site records: labour, attendance, money and projects")]
pub struct Cli {
    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and print the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SITEBOOK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// List records with search, sort and paging
    List(ListArgs),
    /// Show one record
    Show { entity: Entity, id: String },
    /// Create a record from `key=value` / `key:=json` fields
    Create {
        entity: Entity,
        #[arg(long = "set", value_name = "FIELD", required = true)]
        fields: Vec<String>,
    },
    /// Edit a record (asks for your password)
    Edit {
        entity: Entity,
        id: String,
        #[arg(long = "set", value_name = "FIELD", required = true)]
        fields: Vec<String>,
        #[arg(long, env = "SITEBOOK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Delete a record (asks for your password)
    Delete {
        entity: Entity,
        id: String,
        #[arg(long, env = "SITEBOOK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Attendance sheet and marking
    #[command(subcommand)]
    Attendance(AttendanceCommand),
    /// Salary records, for everyone or one labourer
    Salaries {
        #[arg(long)]
        labourer: Option<String>,
    },
    /// Project details with its financial summary
    Site { project_id: String },
    /// Download a file from the API
    Download {
        /// Path relative to the API base URL
        path: String,
        #[arg(short, long, value_name = "FILE")]
        output: Option<std::path::PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    pub entity: Entity,
    #[arg(short, long)]
    pub search: Option<String>,
    /// Column to sort by
    #[arg(long)]
    pub sort: Option<String>,
    #[arg(long, requires = "sort")]
    pub desc: bool,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}

#[derive(Subcommand, Debug)]
pub enum AttendanceCommand {
    /// Month sheet: one row per labourer, one column per day
    Grid {
        #[arg(long)]
        year: i32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },
    /// Attendance percentage per site
    Sites,
    /// Mark one day for several labourers at once
    Mark {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, value_parser = parse_status)]
        status: AttendanceStatus,
        #[arg(long)]
        project: Option<String>,
        #[arg(required = true)]
        labourers: Vec<String>,
    },
}

/// REST collections reachable from the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Labour,
    Attendance,
    Salaries,
    Materials,
    Suppliers,
    Subcontractors,
    Customers,
    Transactions,
    Expenses,
    Projects,
}

impl Entity {
    /// Permission area a create on this collection falls under.
    pub fn area(self) -> Area {
        match self {
            Entity::Attendance => Area::Attendance,
            Entity::Salaries | Entity::Transactions | Entity::Expenses => Area::Accounts,
            _ => Area::Records,
        }
    }
}

fn parse_status(raw: &str) -> Result<AttendanceStatus, String> {
    AttendanceStatus::parse(raw)
        .ok_or_else(|| format!("unknown status '{raw}' (present, absent, half-day, leave, holiday)"))
}
