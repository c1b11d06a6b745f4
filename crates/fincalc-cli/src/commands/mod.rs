pub mod corporate_tax;
pub mod income_tax;
pub mod mortgage;

use std::io::{self, Read};

use clap::{Args, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use fincalc_core::{CalculationRequest, ComputationOutput, FinCalcResult};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Jurisdiction {
    Canada,
    France,
    SouthAfrica,
    Uk,
    Australia,
}

/// Where the request comes from. Shared by every calculator subcommand.
#[derive(Args)]
pub struct RequestArgs {
    /// Jurisdiction whose calculator applies
    #[arg(long, value_enum)]
    pub jurisdiction: Jurisdiction,

    /// Path to a JSON or YAML request `{ "input": ..., "rules": ... }`,
    /// or to the input alone when --rules is given
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a JSON or YAML rules document
    #[arg(long)]
    pub rules: Option<String>,
}

/// Assemble the request from the files named on the command line, falling
/// back to a full request piped on stdin.
fn load_request<I, R>(
    args: &RequestArgs,
    calculator: &str,
) -> Result<CalculationRequest<I, R>, Box<dyn std::error::Error>>
where
    I: DeserializeOwned,
    R: DeserializeOwned,
{
    let document = if let Some(ref path) = args.input {
        tracing::debug!(path = %path, "reading request file");
        input::file::read_value(path)?
    } else if let Some(data) = read_piped_request()? {
        tracing::debug!("reading request from stdin");
        data
    } else {
        return Err(format!("--input <file> or stdin required for {calculator}").into());
    };

    match args.rules {
        Some(ref path) => {
            tracing::debug!(path = %path, "reading rules file");
            Ok(CalculationRequest {
                input: serde_json::from_value(document)?,
                rules: input::file::read_document(path)?,
            })
        }
        None => Ok(serde_json::from_value(document)?),
    }
}

/// The request piped on stdin, if any. An interactive or empty stdin yields
/// `None`.
fn read_piped_request() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    if buffer.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&buffer)
        .map(Some)
        .map_err(|e| format!("stdin does not hold a JSON request: {e}").into())
}

/// Load a request, run `calculate` on it and return the serialized envelope.
pub fn evaluate<I, R, T, F>(
    args: &RequestArgs,
    calculator: &str,
    calculate: F,
) -> Result<Value, Box<dyn std::error::Error>>
where
    I: DeserializeOwned,
    R: DeserializeOwned,
    T: Serialize,
    F: FnOnce(&I, &R) -> FinCalcResult<ComputationOutput<T>>,
{
    let request: CalculationRequest<I, R> = load_request(args, calculator)?;
    tracing::info!(calculator, jurisdiction = ?args.jurisdiction, "running calculation");

    let output = calculate(&request.input, &request.rules)?;
    if !output.warnings.is_empty() {
        tracing::info!(calculator, warnings = output.warnings.len(), "calculation produced warnings");
    }
    Ok(serde_json::to_value(output)?)
}
