#![no_std]

/*!
Low-level classification of command-line tokens. Takes care of the distinctions
between positional values, long options, and clusters of short options, and of
the rules for where an option's value comes from. No type handling happens
here, and nothing here knows which options exist; that's up to the
[`Visitor`].
*/

#[cfg(any(test, feature = "std"))]
extern crate std;

mod arg;

pub use arg::Arg;

/**
The [`ArgumentsParser`] type operates by passing the tokens it classifies into
a [`Visitor`], to be handled.
 */
pub trait Visitor<'arg> {
    type Value;

    /// A positional value.
    fn visit_positional(self, argument: Arg<'arg>) -> Self::Value;

    /// A long option that definitely has a value, because it was given as
    /// `--option=value`
    fn visit_long_option(self, option: Arg<'arg>, argument: Arg<'arg>) -> Self::Value;

    /// A long option or flag, such as `--option`
    fn visit_long(self, option: Arg<'arg>, argument: impl ArgAccess<'arg>) -> Self::Value;

    /// A short option or flag, such as `-o`
    fn visit_short(self, option: u8, argument: impl ArgAccess<'arg>) -> Self::Value;
}

/**
[`ArgAccess`] lets a visitor decide whether an option consumes a value, based
on what it knows about that option.

Consider `-ab 5`. This could be the flags `-a` and `-b` followed by the
positional `5`, or the flag `-a` followed by `-b 5`, or `-a` with the value
`b`. The parser can't tell these apart on its own, so options that need a
value ask for one through this trait, and the parser works out where it comes
from.
*/
pub trait ArgAccess<'arg>: Sized {
    /**
    Get the option's value. Only options should call this; flags should
    ignore it, so that the next token is classified on its own.

    Returns [`None`] if the tokens are exhausted, or if the next token is the
    `--` terminator.
    */
    fn take(self) -> Option<Arg<'arg>>;

    /// True if the value would come from the same token as the option, as
    /// in `-n0.4`, rather than from the token after it.
    fn attached(&self) -> bool;
}

#[derive(Debug, Clone, Copy)]
enum State<'arg> {
    Ready,
    PositionalOnly,

    /// In the middle of a `-abc` cluster. `option` is the next short option
    /// to be visited and `rest` is whatever follows it.
    ShortInProgress {
        option: u8,
        rest: &'arg [u8],
    },
}

/**
An `ArgumentsParser` is the main entry point into `clapp_lexer`. Each call to
[`next_arg`][ArgumentsParser::next_arg] classifies a single token (or a single
short option from a cluster) and sends it to the given [`Visitor`].

All of the data is borrowed; the `'arg` lifetime refers to the tokens loaded
from the command line.
*/
#[derive(Debug, Clone)]
pub struct ArgumentsParser<'arg, I> {
    state: State<'arg>,
    args: I,
    negative_numbers: bool,
}

impl<'arg, I> ArgumentsParser<'arg, I>
where
    I: Iterator<Item = &'arg [u8]>,
{
    /**
    Create a new [`ArgumentsParser`] from an iterator of byte slices, where
    each byte slice is a single token. The program name should *not* be
    included.
     */
    #[inline]
    #[must_use]
    pub fn new(args: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            state: State::Ready,
            args: args.into_iter(),
            negative_numbers: false,
        }
    }

    /**
    If enabled, tokens like `-5` or `-0.25` are treated as positional values
    rather than short options. Callers should only enable this if none of
    their short options are digits.
     */
    #[inline]
    #[must_use]
    pub fn negative_numbers_are_positional(self, enabled: bool) -> Self {
        Self {
            negative_numbers: enabled,
            ..self
        }
    }

    /// Put `self` into a `PositionalOnly` state, then process a positional
    /// argument
    #[inline]
    fn positional_only_arg<V>(&mut self, visitor: V) -> Option<V::Value>
    where
        V: Visitor<'arg>,
    {
        self.state = State::PositionalOnly;
        self.args
            .next()
            .map(Arg::new)
            .map(|arg| visitor.visit_positional(arg))
    }

    /// Put `self` into a `Ready` state, then return a `StandardArgAccess`
    #[inline]
    fn standard_arg(&mut self) -> StandardArgAccess<'_, 'arg, I> {
        debug_assert!(!matches!(self.state, State::PositionalOnly));

        self.state = State::Ready;
        StandardArgAccess { parent: self }
    }

    /// Visit the short option `option`. If there's anything after it in the
    /// cluster, that remainder is a candidate for its value; otherwise the
    /// next token is.
    fn handle_short<V>(&mut self, option: u8, rest: &'arg [u8], visitor: V) -> V::Value
    where
        V: Visitor<'arg>,
    {
        match rest.split_first() {
            None => visitor.visit_short(option, self.standard_arg()),
            Some((&next, tail)) => {
                self.state = State::ShortInProgress {
                    option: next,
                    rest: tail,
                };

                visitor.visit_short(
                    option,
                    ShortArgAccess {
                        remainder: rest,
                        state: &mut self.state,
                    },
                )
            }
        }
    }

    pub fn next_arg<V>(&mut self, visitor: V) -> Option<V::Value>
    where
        V: Visitor<'arg>,
    {
        match self.state {
            State::Ready => match self.args.next()? {
                b"--" => self.positional_only_arg(visitor),
                argument => Some(match argument {
                    [b'-', b'-', option @ ..] => match split_once(option, b'=') {
                        Some((option, value)) => {
                            visitor.visit_long_option(Arg::new(option), Arg::new(value))
                        }
                        None => visitor.visit_long(Arg::new(option), self.standard_arg()),
                    },
                    [b'-'] => visitor.visit_positional(Arg::new(argument)),
                    number if self.negative_numbers && is_negative_number(number) => {
                        visitor.visit_positional(Arg::new(number))
                    }
                    [b'-', option, rest @ ..] => self.handle_short(*option, rest, visitor),
                    positional => visitor.visit_positional(Arg::new(positional)),
                }),
            },
            State::PositionalOnly => self.positional_only_arg(visitor),
            State::ShortInProgress { option, rest } => {
                Some(self.handle_short(option, rest, visitor))
            }
        }
    }
}

/// ArgAccess implementation that gets the next token from the list. Handles
/// the `--` terminator.
struct StandardArgAccess<'a, 'arg, I> {
    parent: &'a mut ArgumentsParser<'arg, I>,
}

impl<'arg, I> ArgAccess<'arg> for StandardArgAccess<'_, 'arg, I>
where
    I: Iterator<Item = &'arg [u8]>,
{
    fn take(self) -> Option<Arg<'arg>> {
        match self.parent.args.next()? {
            b"--" => {
                self.parent.state = State::PositionalOnly;
                None
            }
            arg => Some(Arg::new(arg)),
        }
    }

    #[inline]
    fn attached(&self) -> bool {
        false
    }
}

/// ArgAccess implementation that gets the remainder of a short cluster, so
/// that `-n0.4` is equivalent to `-n 0.4`.
struct ShortArgAccess<'a, 'arg> {
    remainder: &'arg [u8],
    state: &'a mut State<'arg>,
}

impl<'arg> ArgAccess<'arg> for ShortArgAccess<'_, 'arg> {
    fn take(self) -> Option<Arg<'arg>> {
        *self.state = State::Ready;
        Some(Arg::new(self.remainder))
    }

    #[inline]
    fn attached(&self) -> bool {
        true
    }
}

fn split_once(input: &[u8], delimiter: u8) -> Option<(&[u8], &[u8])> {
    memchr::memchr(delimiter, input).map(|i| (&input[..i], &input[i + 1..]))
}

/// `-` followed by digits, optionally with a single `.` and at least one
/// digit after it: `-5`, `-0.5`, `-.5`.
pub fn is_negative_number(token: &[u8]) -> bool {
    let Some((b'-', number)) = token.split_first() else {
        return false;
    };

    let (whole, fraction) = match split_once(number, b'.') {
        Some((whole, fraction)) if !fraction.is_empty() => (whole, fraction),
        Some(_) => return false,
        None if number.is_empty() => return false,
        None => (number, &[][..]),
    };

    whole.iter().chain(fraction).all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use std::string::{String, ToString};
    use std::vec::Vec;

    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        Positional(String),
        LongOption(String, String),
        Long(String, Option<String>),
        Short(char, Option<String>),
    }

    fn text(arg: Arg<'_>) -> String {
        arg.as_str().unwrap().to_string()
    }

    /// Records every visit. Options listed in `takes_value` ask for a value;
    /// everything else is treated as a flag.
    struct Recorder<'a> {
        takes_value: &'a [&'a str],
        events: &'a mut Vec<Event>,
    }

    impl<'arg> Visitor<'arg> for Recorder<'_> {
        type Value = ();

        fn visit_positional(self, argument: Arg<'arg>) {
            self.events.push(Event::Positional(text(argument)));
        }

        fn visit_long_option(self, option: Arg<'arg>, argument: Arg<'arg>) {
            self.events
                .push(Event::LongOption(text(option), text(argument)));
        }

        fn visit_long(self, option: Arg<'arg>, argument: impl ArgAccess<'arg>) {
            let option = text(option);
            let value = match self.takes_value.contains(&option.as_str()) {
                true => argument.take().map(text),
                false => None,
            };
            self.events.push(Event::Long(option, value));
        }

        fn visit_short(self, option: u8, argument: impl ArgAccess<'arg>) {
            let name = [option];
            let name = core::str::from_utf8(&name).unwrap();
            let value = match self.takes_value.contains(&name) {
                true => argument.take().map(text),
                false => None,
            };
            self.events.push(Event::Short(option as char, value));
        }
    }

    fn run(tokens: &[&str], takes_value: &[&str], negative_numbers: bool) -> Vec<Event> {
        let mut events = Vec::new();
        let mut parser = ArgumentsParser::new(tokens.iter().map(|token| token.as_bytes()))
            .negative_numbers_are_positional(negative_numbers);

        while let Some(()) = parser.next_arg(Recorder {
            takes_value,
            events: &mut events,
        }) {}

        events
    }

    fn pos(s: &str) -> Event {
        Event::Positional(s.to_string())
    }

    #[test]
    fn positionals_and_terminator() {
        assert_eq!(
            run(&["2", "--", "--not-an-option", "-x"], &[], false),
            [pos("2"), pos("--not-an-option"), pos("-x")]
        );
    }

    #[test]
    fn lone_dash_is_positional() {
        assert_eq!(run(&["-"], &[], false), [pos("-")]);
    }

    #[test]
    fn long_forms() {
        assert_eq!(
            run(&["--mode=fast", "--rate", "0.4", "--verbose", "x"], &["rate"], false),
            [
                Event::LongOption("mode".to_string(), "fast".to_string()),
                Event::Long("rate".to_string(), Some("0.4".to_string())),
                Event::Long("verbose".to_string(), None),
                pos("x"),
            ]
        );
    }

    #[test]
    fn short_value_attached_or_separate() {
        assert_eq!(
            run(&["-n0.4", "-n", "0.5"], &["n"], false),
            [
                Event::Short('n', Some("0.4".to_string())),
                Event::Short('n', Some("0.5".to_string())),
            ]
        );
    }

    #[test]
    fn short_cluster_of_flags_then_option() {
        assert_eq!(
            run(&["-abn", "3", "tail"], &["n"], false),
            [
                Event::Short('a', None),
                Event::Short('b', None),
                Event::Short('n', Some("3".to_string())),
                pos("tail"),
            ]
        );
    }

    #[test]
    fn option_value_stops_at_terminator() {
        assert_eq!(
            run(&["--rate", "--", "-5"], &["rate"], false),
            [Event::Long("rate".to_string(), None), pos("-5")]
        );
    }

    #[test]
    fn negative_numbers() {
        assert_eq!(
            run(&["-5", "-0.25", "-.5", "-1."], &[], true),
            [
                pos("-5"),
                pos("-0.25"),
                pos("-.5"),
                Event::Short('1', None),
                Event::Short('.', None),
            ]
        );

        assert_eq!(run(&["-5"], &[], false), [Event::Short('5', None)]);
    }

    #[test]
    fn negative_number_shapes() {
        assert!(is_negative_number(b"-12"));
        assert!(is_negative_number(b"-.5"));
        assert!(!is_negative_number(b"-"));
        assert!(!is_negative_number(b"-v"));
        assert!(!is_negative_number(b"-1."));
        assert!(!is_negative_number(b"5"));
    }
}
