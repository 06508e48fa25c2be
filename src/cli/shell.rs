//! The interactive conversion loop.
//!
//! After startup the shell moves between three states: it shows the menu,
//! asks for an amount once a conversion is chosen, prints the result and
//! goes back to the menu. Choosing exit or reaching the end of input
//! terminates it.

use super::ui::{self, StyleType};
use crate::core::config::UnitLabels;
use crate::core::{Direction, ExchangeState, InputError, RateFetcher};
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::debug;

const EXIT_OPTION: i64 = 5;

const MSG_FETCH_FAILED: &str = "Failed to fetch current price data. Please try again later.";
const MSG_INVALID_NUMBER: &str = "Please enter a valid number.";
const MSG_INVALID_OPTION: &str = "Please select a valid option (1-5).";
const MSG_NEGATIVE_AMOUNT: &str = "Please enter a positive amount.";
const MSG_UNAVAILABLE: &str = "Calculation failed because price data is unavailable.";
const MSG_FAREWELL: &str = "Thank you for using the calculator!";

/// What the user picked at the menu prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Convert(Direction),
    Exit,
}

/// Parses a menu selection: `1`-`4` pick a conversion, `5` exits.
pub fn parse_choice(input: &str) -> Result<MenuChoice, InputError> {
    let trimmed = input.trim();
    let choice: i64 = trimmed
        .parse()
        .map_err(|_| InputError::NotANumber(trimmed.to_string()))?;

    if choice == EXIT_OPTION {
        return Ok(MenuChoice::Exit);
    }
    choice
        .checked_sub(1)
        .and_then(|index| usize::try_from(index).ok())
        .and_then(|index| Direction::ALL.get(index))
        .map(|direction| MenuChoice::Convert(*direction))
        .ok_or(InputError::InvalidChoice(choice))
}

/// Parses an amount. Zero is accepted, negative amounts are not.
pub fn parse_amount(input: &str) -> Result<f64, InputError> {
    let trimmed = input.trim();
    let amount: f64 = trimmed
        .parse()
        .ok()
        .filter(|a: &f64| a.is_finite())
        .ok_or_else(|| InputError::NotANumber(trimmed.to_string()))?;

    if amount < 0.0 {
        return Err(InputError::NegativeAmount(amount));
    }
    Ok(amount)
}

/// Runs the startup fetch and prints its outcome.
///
/// Returns `None` when a rate could not be obtained; the caller should end
/// the program without showing the menu.
pub async fn startup<W: Write>(
    fetcher: &RateFetcher<'_>,
    labels: &UnitLabels,
    output: &mut W,
) -> Result<Option<ExchangeState>> {
    let spinner = ui::new_spinner("Fetching current rates...");
    let mut failures = Vec::new();
    let state = fetcher.fetch_state(|line| failures.push(line)).await;
    spinner.finish_and_clear();

    for line in &failures {
        writeln!(output, "{}", ui::style_text(line, StyleType::Error))?;
    }

    let (Some(price), Some(rate)) = (state.asset_price_usd(), state.usd_to_fiat_rate()) else {
        writeln!(output, "{}", ui::style_text(MSG_FETCH_FAILED, StyleType::Error))?;
        return Ok(None);
    };

    writeln!(
        output,
        "Current rates: 1 {} = ${price:.4} USD, 1 USD = {}{rate:.2} {}",
        labels.asset, labels.fiat_symbol, labels.fiat_code
    )?;
    Ok(Some(state))
}

enum State {
    MenuPrompt,
    AmountPrompt(Direction),
    Result(Direction, f64),
    Terminated,
}

pub struct Shell<'a> {
    state: &'a ExchangeState,
    labels: &'a UnitLabels,
}

impl<'a> Shell<'a> {
    pub fn new(state: &'a ExchangeState, labels: &'a UnitLabels) -> Self {
        Self { state, labels }
    }

    /// Reads choices and amounts from `input` until the user exits or the
    /// input ends.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, output: &mut W) -> Result<()> {
        let mut state = State::MenuPrompt;
        loop {
            state = match state {
                State::MenuPrompt => self.menu_prompt(&mut input, output)?,
                State::AmountPrompt(direction) => {
                    self.amount_prompt(direction, &mut input, output)?
                }
                State::Result(direction, amount) => self.show_result(direction, amount, output)?,
                State::Terminated => return Ok(()),
            };
        }
    }

    fn menu_prompt<R: BufRead, W: Write>(&self, input: &mut R, output: &mut W) -> Result<State> {
        writeln!(output, "\nChoose a conversion:")?;
        for (index, direction) in Direction::ALL.iter().enumerate() {
            writeln!(
                output,
                "{}. {} to {}",
                index + 1,
                self.labels.name(direction.source()),
                self.labels.name(direction.target())
            )?;
        }
        writeln!(output, "{EXIT_OPTION}. Exit")?;

        let Some(line) = prompt(input, output, "Enter choice (1-5): ")? else {
            return Ok(State::Terminated);
        };

        let next = match parse_choice(&line) {
            Ok(MenuChoice::Convert(direction)) => State::AmountPrompt(direction),
            Ok(MenuChoice::Exit) => {
                writeln!(output, "{MSG_FAREWELL}")?;
                State::Terminated
            }
            Err(e) => {
                debug!(error = %e, "Rejected menu input");
                let message = match e {
                    InputError::InvalidChoice(_) => MSG_INVALID_OPTION,
                    _ => MSG_INVALID_NUMBER,
                };
                writeln!(output, "{}", ui::style_text(message, StyleType::Error))?;
                State::MenuPrompt
            }
        };
        Ok(next)
    }

    fn amount_prompt<R: BufRead, W: Write>(
        &self,
        direction: Direction,
        input: &mut R,
        output: &mut W,
    ) -> Result<State> {
        let Some(line) = prompt(input, output, "Enter amount: ")? else {
            return Ok(State::Terminated);
        };

        let next = match parse_amount(&line) {
            Ok(amount) => State::Result(direction, amount),
            Err(e) => {
                debug!(error = %e, "Rejected amount input");
                let message = match e {
                    InputError::NegativeAmount(_) => MSG_NEGATIVE_AMOUNT,
                    _ => MSG_INVALID_NUMBER,
                };
                writeln!(output, "{}", ui::style_text(message, StyleType::Error))?;
                State::MenuPrompt
            }
        };
        Ok(next)
    }

    fn show_result<W: Write>(
        &self,
        direction: Direction,
        amount: f64,
        output: &mut W,
    ) -> Result<State> {
        match self.state.convert(direction, amount) {
            Some(result) => writeln!(
                output,
                "{} = {}",
                self.labels.format_amount(direction.source(), amount),
                self.labels.format_amount(direction.target(), result)
            )?,
            None => writeln!(output, "{}", ui::style_text(MSG_UNAVAILABLE, StyleType::Error))?,
        }
        Ok(State::MenuPrompt)
    }
}

/// Writes `text` and reads one line. `None` means the input is exhausted.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    text: &str,
) -> Result<Option<String>> {
    write!(output, "{}", ui::style_text(text, StyleType::Prompt))?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
