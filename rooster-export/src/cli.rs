use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

use getopts::{Matches, Options};
use rooster_parser::DEFAULT_TIMEZONE;

pub const TIMEZONE_VAR: &str = "ROOSTER_TZ";
pub const ADDRESS_VAR: &str = "ROOSTER_ADDR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Export {
        inputs: Vec<PathBuf>,
        output: Option<PathBuf>,
        json: bool,
    },
    Serve {
        address: SocketAddr,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub timezone: String,
    pub mode: Mode,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optmulti(
        "i",
        "input",
        "Label list or saved week-view page, `-` for stdin [Default: stdin]",
        "FILE",
    );
    opts.optopt("o", "output", "Write the calendar here [Default: stdout]", "FILE");
    opts.optopt(
        "z",
        "timezone",
        "Time zone of the schedule [Default: $ROOSTER_TZ or Europe/Amsterdam]",
        "TZID",
    );
    opts.optflag("j", "json", "Print events as JSON instead of iCalendar");
    opts.optflag("s", "serve", "Serve the converter over HTTP");
    opts.optopt(
        "a",
        "address",
        "Socket address (IP and port) to listen on [Default: $ROOSTER_ADDR or 127.0.0.1:8080]",
        "SOCKET_ADDRESS",
    );
    opts
}

/// Parses command line arguments, exiting the process on invalid input.
pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))));
        process::exit(0);
    }

    match from_matches(&matches, |name| env::var(name).ok()) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

fn from_matches(matches: &Matches, var: impl Fn(&str) -> Option<String>) -> Result<Args, String> {
    let timezone = matches
        .opt_str("timezone")
        .or_else(|| var(TIMEZONE_VAR))
        .unwrap_or_else(|| DEFAULT_TIMEZONE.name().to_string());

    if !matches.opt_present("serve") {
        return Ok(Args {
            timezone,
            mode: Mode::Export {
                inputs: matches.opt_strs("input").into_iter().map(PathBuf::from).collect(),
                output: matches.opt_str("output").map(PathBuf::from),
                json: matches.opt_present("json"),
            },
        });
    }

    let address = match matches.opt_str("address").or_else(|| var(ADDRESS_VAR)) {
        Some(raw) => raw
            .parse()
            .map_err(|err| format!("Provided value for option 'address' is invalid: {err}"))?,
        None => SocketAddr::from(([127, 0, 0, 1], 8080)),
    };

    Ok(Args {
        timezone,
        mode: Mode::Serve { address },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_with(args: &[&str], vars: &[(&str, &str)]) -> Result<Args, String> {
        let matches = opts()
            .parse(args.iter().map(|arg| arg.to_string()))
            .map_err(|fail| fail.to_string())?;

        from_matches(&matches, |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        })
    }

    #[test]
    fn defaults_to_stdin_stdout_export() {
        assert_eq!(
            parse_with(&[], &[]),
            Ok(Args {
                timezone: "Europe/Amsterdam".into(),
                mode: Mode::Export {
                    inputs: vec![],
                    output: None,
                    json: false,
                },
            })
        );
    }

    #[test]
    fn collects_repeated_inputs_in_order() {
        let args = parse_with(
            &["-i", "week1.html", "--input", "week2.txt", "-o", "rooster.ics", "--json"],
            &[],
        )
        .unwrap();

        assert_eq!(
            args.mode,
            Mode::Export {
                inputs: vec!["week1.html".into(), "week2.txt".into()],
                output: Some("rooster.ics".into()),
                json: true,
            }
        );
    }

    #[test]
    fn timezone_flag_beats_environment() {
        let vars = [(TIMEZONE_VAR, "Europe/Brussels")];

        assert_eq!(parse_with(&[], &vars).unwrap().timezone, "Europe/Brussels");
        assert_eq!(
            parse_with(&["-z", "Europe/Berlin"], &vars).unwrap().timezone,
            "Europe/Berlin"
        );
    }

    #[test]
    fn serve_mode_address() {
        assert_eq!(
            parse_with(&["--serve"], &[]).unwrap().mode,
            Mode::Serve {
                address: SocketAddr::from(([127, 0, 0, 1], 8080))
            }
        );

        assert_eq!(
            parse_with(&["-s"], &[(ADDRESS_VAR, "0.0.0.0:9000")])
                .unwrap()
                .mode,
            Mode::Serve {
                address: SocketAddr::from(([0, 0, 0, 0], 9000))
            }
        );
    }

    #[test]
    fn rejects_bad_address() {
        assert!(parse_with(&["-s", "-a", "localhost"], &[]).is_err());
    }
}
