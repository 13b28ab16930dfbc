use std::{
    borrow::Cow,
    ffi::OsStr,
    fmt::Display,
    io::{self, Write as _},
    path::Path,
};

use lazy_format::lazy_format;

use crate::settings::Settings;

/// The name diagnostics are prefixed with: the configured `prog`, or else
/// the file name of `argv0`
pub fn program_name<'a>(settings: &'a Settings, argv0: Option<&'a OsStr>) -> Cow<'a, str> {
    match settings.prog {
        Some(ref prog) => Cow::Borrowed(prog.as_str()),
        None => argv0
            .map(Path::new)
            .and_then(Path::file_name)
            .map(OsStr::to_string_lossy)
            .unwrap_or(Cow::Borrowed("program")),
    }
}

/// `usage: <usage>`, if a usage string was configured
fn usage_line(settings: &Settings) -> Option<impl Display + '_> {
    settings
        .usage
        .as_deref()
        .map(|usage| lazy_format!("usage: {}", usage))
}

/// Write the configured help text. Nothing is generated; the description,
/// usage and epilog are printed as given, separated by blank lines.
pub fn write_help(out: &mut impl io::Write, settings: &Settings) -> io::Result<()> {
    let usage = usage_line(settings).map(|usage| usage.to_string());

    let sections = [
        usage.as_deref(),
        settings.description.as_deref(),
        settings.epilog.as_deref(),
    ];

    let mut first = true;

    for section in sections.into_iter().flatten() {
        if !first {
            writeln!(out)?;
        }

        writeln!(out, "{section}")?;
        first = false;
    }

    Ok(())
}

pub fn write_error(
    out: &mut impl io::Write,
    prog: &str,
    settings: &Settings,
    error: &impl Display,
) -> io::Result<()> {
    if let Some(usage) = usage_line(settings) {
        writeln!(out, "{usage}")?;
    }

    writeln!(out, "{prog}: error: {error}")
}

pub fn print_help(settings: &Settings) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_help(&mut out, settings)?;
    out.flush()
}

pub fn print_error(prog: &str, settings: &Settings, error: &impl Display) -> io::Result<()> {
    write_error(&mut io::stderr().lock(), prog, settings, error)
}
