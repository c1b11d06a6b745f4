use clap::Args;
use serde_json::Value;

use fincalc_core::corporate_tax::{australia, canada, france, south_africa, uk};

use super::{evaluate, Jurisdiction, RequestArgs};

/// Arguments for corporate tax
#[derive(Args)]
pub struct CorporateTaxArgs {
    #[command(flatten)]
    pub request: RequestArgs,
}

pub fn run_corporate_tax(args: CorporateTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = &args.request;
    match request.jurisdiction {
        Jurisdiction::Canada => evaluate(request, "corporate tax", canada::calculate_corporate_tax),
        Jurisdiction::France => evaluate(request, "corporate tax", france::calculate_corporate_tax),
        Jurisdiction::SouthAfrica => {
            evaluate(request, "corporate tax", south_africa::calculate_corporate_tax)
        }
        Jurisdiction::Uk => evaluate(request, "corporate tax", uk::calculate_corporate_tax),
        Jurisdiction::Australia => {
            evaluate(request, "corporate tax", australia::calculate_corporate_tax)
        }
    }
}
