use std::collections::HashMap;

use clapp_lexer::{Arg, ArgAccess, ArgumentsParser, Visitor, is_negative_number};

use crate::errors::ParseError;
use crate::value::AnyValue;

use super::{Action, Grammar, Matches, Rule, ValueRule};

pub(super) fn parse<'arg>(
    grammar: &Grammar,
    tokens: impl IntoIterator<Item = &'arg [u8]>,
) -> Result<Matches, ParseError> {
    // If any short alias is a digit, `-1` has to mean that alias
    let negative_numbers = !grammar
        .rules
        .iter()
        .filter_map(Rule::short)
        .any(|short| short.is_ascii_digit());

    let mut parser = ArgumentsParser::new(tokens).negative_numbers_are_positional(negative_numbers);

    let mut state = State {
        grammar,
        positionals: grammar
            .rules
            .iter()
            .filter(|rule| rule.tags.is_none())
            .collect(),
        position: 0,
        negative_numbers,
        values: HashMap::new(),
        unrecognized: Vec::new(),
    };

    while let Some(result) = parser.next_arg(&mut state) {
        result?;
    }

    state.finish()
}

struct State<'g> {
    grammar: &'g Grammar,

    /// Positional rules, in the order they consume tokens
    positionals: Vec<&'g Rule>,
    position: usize,

    /// Whether `-5` is a value rather than a short option
    negative_numbers: bool,

    values: HashMap<String, AnyValue>,
    unrecognized: Vec<String>,
}

fn lossy(arg: Arg<'_>) -> String {
    String::from_utf8_lossy(arg.bytes()).into_owned()
}


impl<'g> State<'g> {
    fn find_long(&self, option: Arg<'_>) -> Result<Option<&'g Rule>, ParseError> {
        let grammar: &'g Grammar = self.grammar;

        let Some(option) = option.as_str() else {
            return Ok(None);
        };

        if let Some(rule) = grammar.rules.iter().find(|rule| rule.long() == Some(option)) {
            return Ok(Some(rule));
        }

        if !grammar.settings.allow_abbrev || option.is_empty() {
            return Ok(None);
        }

        let candidates: Vec<&'g Rule> = grammar
            .rules
            .iter()
            .filter(|rule| rule.long().is_some_and(|long| long.starts_with(option)))
            .collect();

        match candidates.as_slice() {
            [] => Ok(None),
            [rule] => {
                tracing::trace!(option, matched = ?rule.long(), "expanded abbreviation");
                Ok(Some(rule))
            }
            _ => Err(ParseError::AmbiguousOption {
                option: option.to_owned(),
                candidates: candidates
                    .iter()
                    .filter_map(|rule| rule.long())
                    .map(str::to_owned)
                    .collect(),
            }),
        }
    }

    fn find_short(&self, option: u8) -> Option<&'g Rule> {
        let grammar: &'g Grammar = self.grammar;
        let option = char::from(option);

        grammar.rules.iter().find(|rule| rule.short() == Some(option))
    }

    /// The rule's option string appeared. Flags are set, options pull their
    /// value from `argument`.
    fn present<'arg>(
        &mut self,
        rule: &'g Rule,
        argument: impl ArgAccess<'arg>,
    ) -> Result<(), ParseError> {
        match rule.action {
            Action::Help => Err(ParseError::HelpRequested),
            Action::Flag => {
                tracing::trace!(dest = %rule.dest, "flag");
                self.values.insert(rule.dest.clone(), Box::new(true));
                Ok(())
            }
            Action::Value { ref value, .. } => {
                let attached = argument.attached();

                match argument.take() {
                    Some(argument) if attached || !self.looks_like_option(argument) => {
                        self.store(rule, value, argument)
                    }
                    _ => Err(ParseError::ExpectedArgument {
                        argument: rule.display_name(),
                    }),
                }
            }
        }
    }

    /// A separate token that starts with `-` is never taken as a value,
    /// except for `-` alone and negative numbers.
    fn looks_like_option(&self, argument: Arg<'_>) -> bool {
        match argument.bytes() {
            [b'-', _, ..] => !(self.negative_numbers && is_negative_number(argument.bytes())),
            _ => false,
        }
    }

    /// Check `argument` against the rule's choices, parse it, and record it.
    /// A later occurrence of the same option replaces an earlier one.
    fn store(&mut self, rule: &Rule, value: &ValueRule, argument: Arg<'_>) -> Result<(), ParseError> {
        let token = argument.as_str().ok_or_else(|| ParseError::InvalidUtf8 {
            argument: rule.display_name(),
            value: lossy(argument),
        })?;

        if let Some(ref choices) = value.choices {
            if !choices.iter().any(|choice| choice == token) {
                return Err(ParseError::InvalidChoice {
                    argument: rule.display_name(),
                    value: token.to_owned(),
                    choices: choices.clone(),
                });
            }
        }

        let parsed = (value.parse)(token).map_err(|source| ParseError::InvalidValue {
            argument: rule.display_name(),
            type_name: value.type_name,
            value: token.to_owned(),
            source,
        })?;

        tracing::trace!(dest = %rule.dest, token, "matched value");
        self.values.insert(rule.dest.clone(), parsed);

        Ok(())
    }

    fn finish(mut self) -> Result<Matches, ParseError> {
        let grammar: &'g Grammar = self.grammar;
        let rules = &grammar.rules;

        let missing: Vec<String> = rules
            .iter()
            .filter(|rule| {
                matches!(rule.action, Action::Value { required: true, .. })
                    && !self.values.contains_key(&rule.dest)
            })
            .map(Rule::display_name)
            .collect();

        if !missing.is_empty() {
            return Err(ParseError::MissingRequired { arguments: missing });
        }

        if !self.unrecognized.is_empty() {
            return Err(ParseError::Unrecognized {
                arguments: self.unrecognized,
            });
        }

        for rule in rules {
            if self.values.contains_key(&rule.dest) {
                continue;
            }

            match rule.action {
                Action::Value {
                    default: Some(ref default),
                    ..
                } => {
                    self.values.insert(rule.dest.clone(), default());
                }
                Action::Flag => {
                    self.values.insert(rule.dest.clone(), Box::new(false));
                }
                _ => {}
            }
        }

        Ok(Matches::new(self.values))
    }
}

impl<'arg> Visitor<'arg> for &mut State<'_> {
    type Value = Result<(), ParseError>;

    fn visit_positional(self, argument: Arg<'arg>) -> Self::Value {
        match self.positionals.get(self.position).copied() {
            Some(rule) => {
                self.position += 1;

                match rule.action {
                    Action::Value { ref value, .. } => self.store(rule, value, argument),
                    _ => Ok(()),
                }
            }
            None => {
                self.unrecognized.push(lossy(argument));
                Ok(())
            }
        }
    }

    fn visit_long_option(self, option: Arg<'arg>, argument: Arg<'arg>) -> Self::Value {
        match self.find_long(option)? {
            None => {
                self.unrecognized
                    .push(format!("--{}={}", lossy(option), lossy(argument)));
                Ok(())
            }
            Some(rule) => match rule.action {
                Action::Value { ref value, .. } => self.store(rule, value, argument),
                Action::Flag | Action::Help => Err(ParseError::UnexpectedArgument {
                    argument: rule.display_name(),
                    value: lossy(argument),
                }),
            },
        }
    }

    fn visit_long(self, option: Arg<'arg>, argument: impl ArgAccess<'arg>) -> Self::Value {
        match self.find_long(option)? {
            Some(rule) => self.present(rule, argument),
            None => {
                self.unrecognized.push(format!("--{}", lossy(option)));
                Ok(())
            }
        }
    }

    fn visit_short(self, option: u8, argument: impl ArgAccess<'arg>) -> Self::Value {
        match self.find_short(option) {
            Some(rule) => self.present(rule, argument),
            None if option.is_ascii() => {
                self.unrecognized.push(format!("-{}", char::from(option)));
                Ok(())
            }
            // Part of a multi-byte character; the rest of the cluster goes
            // with it, so it's reported once
            None => {
                let mut bytes = vec![option];

                if argument.attached() {
                    let rest = argument.take().map(|rest| rest.bytes());
                    bytes.extend_from_slice(rest.unwrap_or_default());
                }

                self.unrecognized.push(format!("-{}", String::from_utf8_lossy(&bytes)));
                Ok(())
            }
        }
    }
}
