use std::num::ParseIntError;
use std::path::PathBuf;

use clapp::{Error, FromArgs, ParseError, Settings};

#[derive(FromArgs, Debug, PartialEq)]
struct Positionals {
    a: i32,
    b: f64,
    c: String,
}

#[test]
fn positional_scenario() {
    let parsed = Positionals::try_from_tokens(["2", "0.4", "test"]).unwrap();
    assert_eq!(
        parsed,
        Positionals {
            a: 2,
            b: 0.4,
            c: "test".to_owned()
        }
    );

    assert!(Positionals::try_from_tokens(["2", "0.4"]).is_err());
}

#[derive(FromArgs, Debug, PartialEq)]
struct Mixed {
    positional: i32,
    not_positional_: f64,
}

#[test]
fn mixed_scenario() {
    let expected = Mixed {
        positional: 2,
        not_positional_: 0.4,
    };

    assert_eq!(Mixed::try_from_tokens(["2", "-n", "0.4"]).unwrap(), expected);
    assert_eq!(
        Mixed::try_from_tokens(["2", "--not_positional", "0.4"]).unwrap(),
        expected
    );

    let err = Mixed::try_from_tokens(["2"]).unwrap_err();
    assert!(matches!(err, Error::Parse(ParseError::MissingRequired { .. })));
}

#[derive(FromArgs, Debug, PartialEq)]
struct Flags {
    a_: bool,

    #[clapp(default = true)]
    b_: bool,
}

#[test]
fn flag_scenario() {
    assert_eq!(
        Flags::try_from_tokens(["-a"]).unwrap(),
        Flags { a_: true, b_: false }
    );
    assert_eq!(
        Flags::try_from_tokens(["-a", "-b"]).unwrap(),
        Flags { a_: true, b_: true }
    );
}

fn plus_one(arg: &str) -> Result<i32, ParseIntError> {
    arg.parse::<i32>().map(|a| a + 1)
}

#[derive(FromArgs, Debug, PartialEq)]
#[clapp(type_parser(ty = f64, with = |arg: &str| arg.parse::<f64>().map(|b| b + 0.1)))]
struct Overrides {
    #[clapp(parser = plus_one)]
    a: i32,

    b: f64,

    #[clapp(parser = |arg: &str| arg.parse::<f64>())]
    c: f64,
}

#[test]
fn override_scenario() {
    let parsed = Overrides::try_from_tokens(["1", "0.4", "0.4"]).unwrap();
    assert_eq!(
        parsed,
        Overrides {
            a: 2,
            b: 0.4 + 0.1,
            c: 0.4
        }
    );
}

#[derive(FromArgs, Debug, PartialEq)]
struct Defaults {
    #[clapp(default = 4, options = ["1", "2", "4", "8"])]
    jobs_: u8,

    #[clapp(default)]
    retries_: u32,

    #[clapp(default = "fast".to_owned(), options = ["fast", "slow"])]
    mode_: String,

    label_: Option<String>,

    #[clapp(default = PathBuf::from("out"))]
    output_: Option<PathBuf>,
}

#[test]
fn defaults_and_optionals() {
    let parsed = Defaults::try_from_tokens(Vec::<&str>::new()).unwrap();
    assert_eq!(
        parsed,
        Defaults {
            jobs_: 4,
            retries_: 0,
            mode_: "fast".to_owned(),
            label_: None,
            output_: Some(PathBuf::from("out")),
        }
    );

    let parsed = Defaults::try_from_tokens(["-j", "8", "-m", "slow", "-l", "x", "-r", "3"]).unwrap();
    assert_eq!(parsed.jobs_, 8);
    assert_eq!(parsed.mode_, "slow");
    assert_eq!(parsed.label_.as_deref(), Some("x"));
    assert_eq!(parsed.retries_, 3);

    let err = Defaults::try_from_tokens(["--jobs", "3"]).unwrap_err();
    assert!(matches!(err, Error::Parse(ParseError::InvalidChoice { .. })));
}

#[derive(FromArgs, Debug)]
#[clapp(init = Normalized::finish)]
struct Normalized {
    name: String,

    #[clapp(named)]
    shout: bool,

    #[clapp(default = String::new())]
    greeting_: String,
}

impl Normalized {
    fn finish(&mut self) {
        if self.shout {
            self.name = self.name.to_uppercase();
        }

        self.greeting_ = format!("hello, {}", self.name);
    }
}

#[test]
fn initializer_runs_after_binding() {
    let parsed = Normalized::try_from_tokens(["world", "--shout"]).unwrap();
    assert_eq!(parsed.name, "WORLD");
    assert_eq!(parsed.greeting_, "hello, WORLD");

    let parsed = Normalized::try_from_tokens(["world"]).unwrap();
    assert_eq!(parsed.greeting_, "hello, world");
}

/// Connects to a host.
#[derive(FromArgs, Debug)]
#[clapp(
    prog = "connect",
    epilog = "That's all.",
    conflict_handler = "resolve",
    no_abbrev,
    no_exit_on_error
)]
struct Connect {
    host_: String,
    port_: u16,
}

#[test]
fn struct_settings() {
    let settings = Connect::settings();

    assert_eq!(settings.prog.as_deref(), Some("connect"));
    assert_eq!(settings.description.as_deref(), Some("Connects to a host."));
    assert_eq!(settings.epilog.as_deref(), Some("That's all."));
    assert!(!settings.allow_abbrev);
    assert!(!settings.exit_on_error);
    assert!(settings.add_help);

    let parsed = Connect::try_from_tokens(["-h", "example.com", "-p", "80"]).unwrap();
    assert_eq!(parsed.host_, "example.com");
    assert_eq!(parsed.port_, 80);

    let err = Connect::try_from_tokens(["--help"]).unwrap_err();
    assert!(err.is_help_request());

    let err = Connect::try_from_tokens(["-h", "example.com", "-p", "80", "--po", "81"]).unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(ParseError::Unrecognized { ref arguments }) if *arguments == ["--po", "81"]
    ));
}

#[test]
fn settings_can_be_overridden() {
    let err = Connect::try_from_tokens_with(Settings::default(), ["-h", "example.com", "-p", "80"])
        .unwrap_err();
    assert!(matches!(err, Error::Schema(_)));
}

#[derive(FromArgs, Debug)]
#[clapp(no_help)]
struct NoHelp {
    #[clapp(options = ["x", "y"])]
    choice: String,
}

#[test]
fn help_can_be_disabled() {
    assert!(!NoHelp::settings().add_help);

    let err = NoHelp::try_from_tokens(["-h"]).unwrap_err();
    assert!(!err.is_help_request());

    let parsed = NoHelp::try_from_tokens(["y"]).unwrap();
    assert_eq!(parsed.choice, "y");
}

#[test]
fn schema_lists_fields_in_order() {
    let schema = Defaults::schema();
    assert_eq!(
        schema.field_names().collect::<Vec<_>>(),
        ["jobs_", "retries_", "mode_", "label_", "output_"]
    );
}
