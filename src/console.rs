//! Line-oriented terminal front end for a single form session.
//!
//! The session owns its `FormState` and passes it by `&mut` into the
//! orchestrator; nothing here is global.

use crate::errors::PricerResult;
use crate::form::{validate, CalcType, ErrorKey, Field, FormState, OptionType};
use crate::orchestrator::{self, SubmitOutcome};
use crate::pricing::PricingService;
use std::fmt::Write as _;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const HELP: &str = "\
commands:
  set <field> [value]   stockPrice | strikePrice | timeToMaturity | riskFreeRate | volatility | optionPrice
  type call|put         option type
  mode price|iv         optionPrice or impliedVolatility
  show                  print the form
  check                 validate without submitting
  submit                validate and price
  reset                 clear the form
  help | quit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(Field, String),
    OptionType(OptionType),
    Mode(CalcType),
    Show,
    Check,
    Submit,
    Reset,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((v, r)) => (v, r.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "set" => {
            let (name, value) = match rest.split_once(char::is_whitespace) {
                Some((n, v)) => (n, v.trim()),
                None => (rest, ""),
            };
            if name.is_empty() {
                return Err("usage: set <field> [value]".into());
            }
            Ok(Command::Set(name.parse()?, value.to_string()))
        }
        "type" => Ok(Command::OptionType(rest.parse()?)),
        "mode" => Ok(Command::Mode(rest.parse()?)),
        "show" => Ok(Command::Show),
        "check" => Ok(Command::Check),
        "submit" => Ok(Command::Submit),
        "reset" => Ok(Command::Reset),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err("empty command".into()),
        other => Err(format!("unknown command '{other}' (try help)")),
    }
}

/// Form view: every field with its error beside it, the form-level error, then the result.
pub fn render(state: &FormState) -> String {
    let input = state.input();
    let errors = state.errors();
    let mut out = String::new();

    let _ = writeln!(out, "  {:<20}{} / {}", "Mode", input.calc_type, input.option_type);
    for field in Field::ALL {
        let unused = if field == input.inactive_field() { "  (unused)" } else { "" };
        let _ = writeln!(out, "  {:<20}{}{unused}", field.label(), input.get(field));
        if let Some(msg) = errors.get(field) {
            let _ = writeln!(out, "    ! {msg}");
        }
    }

    if let Some(msg) = errors.get(ErrorKey::Api) {
        let _ = writeln!(out, "  error: {msg}");
    }

    if let Some(r) = state.result() {
        let _ = writeln!(out, "  ── result ──");
        let rows = [
            ("Option Price", r.option_price),
            ("Delta", r.delta),
            ("Gamma", r.gamma),
            ("Theta", r.theta),
            ("Vega", r.vega),
            ("Rho", r.rho),
        ];
        for (label, value) in rows {
            let _ = writeln!(out, "  {label:<20}{value:.4}");
        }
        if input.calc_type == CalcType::ImpliedVolatility {
            if let Some(iv) = r.implied_volatility {
                let _ = writeln!(out, "  {:<20}{iv:.4}", "Implied Volatility");
            }
        }
        if let Some(at) = state.settled_at() {
            let _ = writeln!(out, "  {:<20}{}", "Calculated", at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
    }

    out
}

/// Drive one session until `quit` or end of input.
pub async fn run_session<R, W, S>(reader: R, mut writer: W, service: &S) -> PricerResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: PricingService,
{
    let mut state = FormState::new();
    let mut lines = reader.lines();

    writer.write_all(HELP.as_bytes()).await?;
    writer.flush().await?;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(c) => c,
            Err(msg) => {
                writer.write_all(format!("{msg}\n").as_bytes()).await?;
                continue;
            }
        };

        let output = match command {
            Command::Set(field, value) => {
                state.set_field(field, value);
                continue;
            }
            Command::OptionType(t) => {
                state.set_option_type(t);
                continue;
            }
            Command::Mode(m) => {
                state.set_calc_type(m);
                continue;
            }
            Command::Show => render(&state),
            Command::Check => {
                let errors = validate(state.input());
                if errors.is_empty() {
                    "ok\n".to_string()
                } else {
                    errors.iter().map(|(key, msg)| format!("{}: {msg}\n", key.as_str())).collect()
                }
            }
            Command::Submit => {
                let outcome = orchestrator::submit(&mut state, service).await;
                let headline = match &outcome {
                    SubmitOutcome::Invalid(errors) => format!("{} field(s) need attention\n", errors.len()),
                    SubmitOutcome::Priced(_) => "priced\n".to_string(),
                    SubmitOutcome::Failed(_) => "calculation failed\n".to_string(),
                    SubmitOutcome::Stale => String::new(),
                };
                headline + &render(&state)
            }
            Command::Reset => {
                state.reset();
                render(&state)
            }
            Command::Help => HELP.to_string(),
            Command::Quit => break,
        };

        writer.write_all(output.as_bytes()).await?;
        writer.flush().await?;
    }

    tracing::debug!(phase = %state.phase(), "form session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PricerError;
    use crate::form::ErrorSet;
    use crate::pricing::{PricingRequest, PricingResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedService {
        calls: AtomicUsize,
        fail_with: Option<String>,
    }

    impl PricingService for FixedService {
        async fn calculate(&self, _request: &PricingRequest) -> PricerResult<PricingResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(msg) => Err(PricerError::Service { status: 400, message: msg.clone() }),
                None => Ok(PricingResult {
                    option_price: 10.4506,
                    delta: 0.6368,
                    gamma: 0.0188,
                    theta: -6.414,
                    vega: 37.52,
                    rho: 53.23,
                    implied_volatility: None,
                }),
            }
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_command("set stockPrice 100"),
            Ok(Command::Set(Field::StockPrice, "100".into()))
        );
        assert_eq!(parse_command("set volatility"), Ok(Command::Set(Field::Volatility, String::new())));
        assert_eq!(parse_command("type put"), Ok(Command::OptionType(OptionType::Put)));
        assert_eq!(parse_command("mode iv"), Ok(Command::Mode(CalcType::ImpliedVolatility)));
        assert_eq!(parse_command("  SUBMIT "), Ok(Command::Submit));
        assert_eq!(parse_command("exit"), Ok(Command::Quit));
        assert_eq!(parse_command("check"), Ok(Command::Check));
        assert!(parse_command("set").is_err());
        assert!(parse_command("set dividend 2").is_err());
        assert!(parse_command("launch").is_err());
    }

    #[test]
    fn test_render_shows_field_errors_and_unused_marker() {
        let mut state = FormState::new();
        state.set_field(Field::StockPrice, "abc");
        let mut errors = ErrorSet::new();
        errors.insert(Field::StockPrice, "Stock Price must be a positive number.");
        state.errors = errors;

        let view = render(&state);
        assert!(view.contains("! Stock Price must be a positive number."));
        assert!(view.contains("(unused)"));
        assert!(!view.contains("result"));
    }

    #[tokio::test]
    async fn test_session_prices_valid_form() {
        let script = "set stockPrice 100\nset strikePrice 100\nset timeToMaturity 1\n\
                      set riskFreeRate 0.05\nset volatility 0.2\nsubmit\nquit\nsubmit\n";
        let service = FixedService { calls: AtomicUsize::new(0), fail_with: None };
        let mut out = Vec::new();

        run_session(script.as_bytes(), &mut out, &service).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
        assert!(text.contains("priced"));
        assert!(text.contains("10.4506"));
        assert!(!text.contains("Implied Volatility"));
    }

    #[tokio::test]
    async fn test_session_invalid_form_skips_service() {
        let service = FixedService { calls: AtomicUsize::new(0), fail_with: None };
        let mut out = Vec::new();

        run_session("mode iv\ncheck\nsubmit\n".as_bytes(), &mut out, &service).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
        assert!(text.contains("optionPrice: Option Price must be a positive number."));
        assert!(text.contains("5 field(s) need attention"));
        assert!(text.contains("Option Price must be a positive number."));
    }

    #[tokio::test]
    async fn test_session_shows_service_error() {
        let script = "set stockPrice 100\nset strikePrice 100\nset timeToMaturity 1\n\
                      set riskFreeRate 0\nset volatility 9\nsubmit\n";
        let service = FixedService {
            calls: AtomicUsize::new(0),
            fail_with: Some("volatility too large".into()),
        };
        let mut out = Vec::new();

        run_session(script.as_bytes(), &mut out, &service).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("error: volatility too large"));
    }
}
