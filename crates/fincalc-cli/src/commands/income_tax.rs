use clap::Args;
use serde_json::Value;

use fincalc_core::income_tax::{australia, canada, france, south_africa, uk};

use super::{evaluate, Jurisdiction, RequestArgs};

/// Arguments for personal income tax
#[derive(Args)]
pub struct IncomeTaxArgs {
    #[command(flatten)]
    pub request: RequestArgs,
}

pub fn run_income_tax(args: IncomeTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = &args.request;
    match request.jurisdiction {
        Jurisdiction::Canada => evaluate(request, "income tax", canada::calculate_net_income),
        Jurisdiction::France => evaluate(request, "income tax", france::calculate_net_income),
        Jurisdiction::SouthAfrica => {
            evaluate(request, "income tax", south_africa::calculate_net_income)
        }
        Jurisdiction::Uk => evaluate(request, "income tax", uk::calculate_net_income),
        Jurisdiction::Australia => evaluate(request, "income tax", australia::calculate_net_income),
    }
}
