//! Line-based property form on stdin.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the form provides the "answer a few questions" UX of `prophet estimate -i`
//!
//! Each prompt shows the current value; an empty answer keeps it, `q` cancels.
//! Only the input shape is checked here (a number where a number is expected);
//! range checks run in the valuation pipeline.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::domain::PropertyFeatures;
use crate::error::AppError;

/// Prompt for every feature using stdin/stdout, starting from `defaults`.
pub fn prompt_for_features(defaults: PropertyFeatures) -> Result<PropertyFeatures, AppError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    run_form(&mut input, &mut output, defaults)
}

/// Form loop over arbitrary reader/writer (testable without a terminal).
pub fn run_form<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    defaults: PropertyFeatures,
) -> Result<PropertyFeatures, AppError> {
    let mut f = defaults;

    writeln!(output, "Property parameters (Enter keeps the value in brackets, q quits):")
        .map_err(write_err)?;

    f.living_area_sqft = ask(input, output, "Living area (sqft)", f.living_area_sqft)?;
    f.bedrooms = ask(input, output, "Bedrooms", f.bedrooms)?;
    f.bathrooms = ask(input, output, "Bathrooms", f.bathrooms)?;
    f.year_built = ask(input, output, "Year built", f.year_built)?;
    f.year_renovated = ask_optional(input, output, "Year renovated (- for none)", f.year_renovated)?;
    f.grade = ask(input, output, "Grade (1-13)", f.grade)?;
    f.condition = ask(input, output, "Condition (1-5)", f.condition)?;
    f.zip_code = ask::<String, _, _>(input, output, "Zip code", f.zip_code)?.trim().to_string();

    Ok(f)
}

fn ask<T, R, W>(input: &mut R, output: &mut W, label: &str, current: T) -> Result<T, AppError>
where
    T: FromStr + std::fmt::Display,
    R: BufRead,
    W: Write,
{
    loop {
        let Some(answer) = read_answer(input, output, label, &current.to_string())? else {
            return Ok(current);
        };
        match answer.parse::<T>() {
            Ok(value) => return Ok(value),
            Err(_) => {
                writeln!(output, "Invalid value '{answer}' for {label}.").map_err(write_err)?;
            }
        }
    }
}

fn ask_optional<T, R, W>(input: &mut R, output: &mut W, label: &str, current: Option<T>) -> Result<Option<T>, AppError>
where
    T: FromStr + std::fmt::Display,
    R: BufRead,
    W: Write,
{
    let shown = current.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
    loop {
        let Some(answer) = read_answer(input, output, label, &shown)? else {
            return Ok(current);
        };
        if answer == "-" {
            return Ok(None);
        }
        match answer.parse::<T>() {
            Ok(value) => return Ok(Some(value)),
            Err(_) => {
                writeln!(output, "Invalid value '{answer}' for {label}.").map_err(write_err)?;
            }
        }
    }
}

/// `Ok(None)` means "keep the current value".
fn read_answer<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    shown: &str,
) -> Result<Option<String>, AppError> {
    write!(output, "{label} [{shown}]: ").map_err(write_err)?;
    output.flush().map_err(write_err)?;

    let mut line = String::new();
    let bytes = input
        .read_line(&mut line)
        .map_err(|e| AppError::usage(format!("Failed to read input: {e}")))?;

    if bytes == 0 {
        return Err(AppError::usage(
            "No input received. Pass features as flags, e.g. `prophet estimate --sqft 1800`.",
        ));
    }

    let answer = line.trim();
    if answer.eq_ignore_ascii_case("q") {
        return Err(AppError::usage("Canceled."));
    }
    if answer.is_empty() {
        return Ok(None);
    }
    Ok(Some(answer.to_string()))
}

fn write_err(e: io::Error) -> AppError {
    AppError::usage(format!("Failed to write prompt: {e}"))
}
