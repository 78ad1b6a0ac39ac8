use crate::infra::{bootstrap, parse_constraint, parse_date};
use chrono::{Local, NaiveDate};
use clap::Args;
use dd_scoring::error::AppError;
use dd_scoring::scoring::{ConstraintKind, PropertyDescriptor, ReportMeta, RulesView};
use serde::Serialize;

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct PropertyArgs {
    /// Current use of the building, as written in the source documents
    #[arg(long = "use", value_name = "DESCRIPTION", default_value = "")]
    pub(crate) use_description: String,
    /// Total stories of the building
    #[arg(long)]
    pub(crate) stories: Option<u32>,
    /// Floor of the suite under evaluation; omit for a whole-building evaluation
    #[arg(long)]
    pub(crate) floor: Option<u32>,
    /// Shared-space constraint of the suite (repeatable), e.g. shared_hvac
    #[arg(long = "constraint", value_parser = parse_constraint)]
    pub(crate) constraints: Vec<ConstraintKind>,
}

impl PropertyArgs {
    pub(crate) fn descriptor(&self) -> PropertyDescriptor {
        PropertyDescriptor {
            use_description: self.use_description.clone(),
            building_stories: self.stories,
            occupied_floor: self.floor,
            constraints: self.constraints.iter().copied().collect(),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct OccupancyArgs {
    #[command(flatten)]
    pub(crate) property: PropertyArgs,
}

#[derive(Args, Debug)]
pub(crate) struct JurisdictionArgs {
    /// Two-letter state code
    pub(crate) code: String,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    #[command(flatten)]
    pub(crate) property: PropertyArgs,
    /// Two-letter state code of the site
    #[arg(long)]
    pub(crate) state: String,
    /// Site name used for the report title
    #[arg(long)]
    pub(crate) site_name: Option<String>,
    /// Report date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Print only the flat placeholder map
    #[arg(long)]
    pub(crate) placeholders_only: bool,
}

pub(crate) fn run_occupancy(args: OccupancyArgs) -> Result<(), AppError> {
    let (_, engine) = bootstrap(|_| {})?;
    let result = engine.score_occupancy(&args.property.descriptor());
    print_json(&result)
}

pub(crate) fn run_jurisdiction(args: JurisdictionArgs) -> Result<(), AppError> {
    let (_, engine) = bootstrap(|_| {})?;
    let result = engine.score_jurisdiction(&args.code);
    print_json(&result)
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let (_, engine) = bootstrap(|_| {})?;
    let meta = ReportMeta {
        site_name: args.site_name,
        report_date: args.date,
    }
    .dated_or(Local::now().date_naive());
    let report = engine.report(&args.property.descriptor(), &args.state, &meta);

    if args.placeholders_only {
        print_json(&report.placeholders)
    } else {
        print_json(&report)
    }
}

pub(crate) fn run_rules() -> Result<(), AppError> {
    let (_, engine) = bootstrap(|_| {})?;
    print_json(&RulesView::from_engine(&engine))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
