use clap::Args;
use serde_json::Value;

use fincalc_core::mortgage::{australia, canada, france, south_africa, uk};

use super::{evaluate, Jurisdiction, RequestArgs};

/// Arguments for mortgage calculation
#[derive(Args)]
pub struct MortgageArgs {
    #[command(flatten)]
    pub request: RequestArgs,
}

pub fn run_mortgage(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = &args.request;
    match request.jurisdiction {
        Jurisdiction::Canada => evaluate(request, "mortgage", canada::calculate_mortgage),
        Jurisdiction::France => evaluate(request, "mortgage", france::calculate_mortgage),
        Jurisdiction::SouthAfrica => evaluate(request, "mortgage", south_africa::calculate_mortgage),
        Jurisdiction::Uk => evaluate(request, "mortgage", uk::calculate_mortgage),
        Jurisdiction::Australia => evaluate(request, "mortgage", australia::calculate_mortgage),
    }
}
