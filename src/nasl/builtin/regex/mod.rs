// SPDX-FileCopyrightText: 2025 Greenbone AG
//
// SPDX-License-Identifier: GPL-2.0-or-later WITH x11vnc-openssl-exception


use glob::{MatchOptions, Pattern};
use regex::{Regex, RegexBuilder};

use super::BuiltinError;
use crate::nasl::prelude::*;

/// Cuts the search string at the first NUL char unless `rnul` is set, and at
/// the first line break unless `multiline` is set.
fn parse_search_string(mut s: &str, rnul: bool, multiline: bool) -> &str {
    if !rnul {
        s = s.split('\0').next().unwrap_or_default();
    }
    if !multiline {
        s = s.split('\n').next().unwrap_or_default();
    }
    s
}

fn make_regex(pattern: &str, icase: bool, multiline: bool) -> Result<Regex, BuiltinError> {
    RegexBuilder::new(pattern)
        .case_insensitive(icase)
        .multi_line(multiline)
        .build()
        .map_err(|e| BuiltinError::Regex(e.to_string()))
}

struct Search {
    string: String,
    pattern: String,
    icase: bool,
    rnul: bool,
}

impl Search {
    fn new(params: &Params) -> Result<Self, FnError> {
        Ok(Self {
            string: params
                .named_or_positional("string", 1)
                .map(ToString::to_string)
                .unwrap_or_default(),
            pattern: params
                .named_or_positional("pattern", 0)
                .map(ToString::to_string)
                .ok_or_else(|| FnError::missing_argument("pattern"))?,
            icase: params.bool_by_name("icase", false),
            rnul: params.bool_by_name("rnul", true),
        })
    }
}

/// Matches a string against a regular expression.
/// - string  String to search the pattern in
/// - pattern the pattern that should be matched
/// - icase   case insensitive flag
/// - rnul    replace the null char in the string. Default TRUE.
/// - multiline Is FALSE by default (string is truncated at the first
///   “end of line”), and can be set to TRUE for multiline search.
///
/// Returns 1 if it matches, 0 otherwise.
fn ereg(params: &Params, _: &Context) -> NaslResult {
    let search = Search::new(params)?;
    let multiline = params.bool_by_name("multiline", false);
    let string = parse_search_string(&search.string, search.rnul, multiline);
    let re = make_regex(&search.pattern, search.icase, multiline)?;
    Ok(NaslValue::Number(re.is_match(string) as i64))
}

/// Rewrites the `\N` back references of NASL replacements into the
/// `${N}` syntax of the regex crate. A literal `$` is escaped.
fn replacement(replace: &str) -> String {
    let mut result = String::with_capacity(replace.len());
    let mut chars = replace.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.peek() {
                Some(d) if d.is_ascii_digit() => {
                    result.push_str(&format!("${{{d}}}"));
                    chars.next();
                }
                _ => result.push(c),
            },
            '$' => result.push_str("$$"),
            c => result.push(c),
        }
    }
    result
}

/// Search for a pattern in a string and replace it.
///
/// `replace` may refer to groups of the pattern with `\1` to `\9`.
/// Returns the new string with every match replaced.
fn ereg_replace(params: &Params, _: &Context) -> NaslResult {
    let search = Search::new(params)?;
    let replace = params.str_by_name("replace").unwrap_or_default();
    let string = parse_search_string(&search.string, search.rnul, true);
    let re = make_regex(&search.pattern, search.icase, false)?;
    Ok(re
        .replace_all(string, replacement(&replace).as_str())
        .into_owned()
        .into())
}

/// Looks for a pattern in a string, line by line.
///
/// Returns the concatenation of all lines that match. Null otherwise.
fn egrep(params: &Params, _: &Context) -> NaslResult {
    let search = Search::new(params)?;
    let string = parse_search_string(&search.string, search.rnul, true);
    let re = make_regex(&search.pattern, search.icase, true)?;
    let lines: String = string
        .split_inclusive('\n')
        .filter(|l| re.is_match(l))
        .collect();
    Ok(if lines.is_empty() {
        NaslValue::Null
    } else {
        lines.into()
    })
}

/// Does extended regular expression pattern matching.
///
/// Returns a list of the whole match followed by its groups, groups that do
/// not participate are empty strings. With `find_all` the whole matches of
/// all occurrences are returned instead. NULL if no match was found.
fn eregmatch(params: &Params, _: &Context) -> NaslResult {
    let search = Search::new(params)?;
    let find_all = params.bool_by_name("find_all", false);
    let string = parse_search_string(&search.string, search.rnul, true);
    let re = make_regex(&search.pattern, search.icase, true)?;
    let matches: Vec<NaslValue> = if find_all {
        re.find_iter(string).map(|m| m.as_str().into()).collect()
    } else {
        match re.captures(string) {
            Some(caps) => caps
                .iter()
                .map(|m| m.map(|m| m.as_str()).unwrap_or_default().into())
                .collect(),
            None => vec![],
        }
    };
    Ok(if matches.is_empty() {
        NaslValue::Null
    } else {
        NaslValue::list(matches)
    })
}

/// Matches a string against a simple shell like pattern.
///
/// `string` is the string to be searched.
/// `pattern` contains the pattern to search for.
/// The optional argument `icase` toggles case sensitivity. Default: false (case sensitive). If true, search is case insensitive.
fn match_(params: &Params, _: &Context) -> NaslResult {
    let search = Search::new(params)?;
    let options = MatchOptions {
        case_sensitive: !search.icase,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    let pattern = Pattern::new(&search.pattern)
        .map_err(|e| BuiltinError::Pattern(format!("{}: {e}", search.pattern)))?;
    Ok(NaslValue::Number(
        pattern.matches_with(&search.string, options) as i64,
    ))
}

pub struct RegularExpressions;

function_set! {
    RegularExpressions,
    sync_stateless,
    (
        ereg,
        egrep,
        ereg_replace,
        eregmatch,
        (match_, "match"),
    )
}
