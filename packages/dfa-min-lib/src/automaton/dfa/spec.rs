/// In this file, we parse textual `spec` representations of DFAs.
///
/// States are named `1..=n`, letters are single characters. Every row of the
/// transition table lists the target for each letter in alphabet order, `-`
/// marks an undefined transition and rows may be omitted entirely. Lines
/// starting with `#` are comments. An example spec is as follows:
///
/// ```text
/// states 3
/// alphabet a b
/// transitions
///     1: 2 3
///     2: 2 3
///     3: 2 -
/// start 1
/// accepting 3
/// ```
///
/// Structural problems (unknown targets, an unknown start state, ...) are not
/// checked here, they are reported by
/// [`DfaDescription::build`](crate::automaton::dfa::description::DfaDescription::build).
use std::{fmt::Display, num::ParseIntError};

use hashbrown::HashSet;
use nom::{
    Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{digit1, multispace1, not_line_ending, satisfy, space1},
    combinator::{eof, map, map_res, recognize, value},
    error::{FromExternalError, ParseError},
    multi::{many0, separated_list1},
    sequence::preceded,
};

use crate::automaton::{
    AutomatonNode,
    dfa::{DFA, description::DfaDescription},
};

pub trait SpecError<'a>: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError> {}
impl<'a, T> SpecError<'a> for T where T: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>
{}

fn integer<'a, E: SpecError<'a>>(input: &'a str) -> nom::IResult<&'a str, u32, E> {
    map_res(digit1, |digits: &'a str| digits.parse::<u32>()).parse(input)
}

fn comment<'a, E: SpecError<'a>>(input: &'a str) -> nom::IResult<&'a str, &'a str, E> {
    recognize((tag("#"), not_line_ending)).parse(input)
}

// Whitespace including newlines and comment lines.
fn opt_whitespace<'a, E: SpecError<'a>>(input: &'a str) -> nom::IResult<&'a str, (), E> {
    value((), many0(alt((multispace1, comment)))).parse(input)
}

fn keyword<'a, E: SpecError<'a>>(
    word: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = E> {
    preceded(opt_whitespace, tag(word))
}

fn letter<'a, E: SpecError<'a>>(input: &'a str) -> nom::IResult<&'a str, char, E> {
    satisfy(|c: char| !c.is_whitespace() && !matches!(c, '#' | '-' | ':')).parse(input)
}

// E.g., 2 or - for an undefined transition
fn target<'a, E: SpecError<'a>>(input: &'a str) -> nom::IResult<&'a str, Option<u32>, E> {
    alt((map(integer, Some), value(None, tag("-")))).parse(input)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRow {
    pub state: u32,
    pub targets: Vec<Option<u32>>,
}

// E.g., 1: 2 - 3
fn row<'a, E: SpecError<'a>>(input: &'a str) -> nom::IResult<&'a str, SpecRow, E> {
    let (input, _) = opt_whitespace(input)?;
    let (input, state) = integer(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, targets) = many0(preceded(space1, target)).parse(input)?;

    Ok((input, SpecRow { state, targets }))
}

#[test]
fn test_row_1() {
    let input = "3: 2 - 14";
    let (_, row) = row::<nom::error::Error<&str>>(input).unwrap();
    assert_eq!(row.state, 3);
    assert_eq!(row.targets, vec![Some(2), None, Some(14)]);
}

#[test]
fn test_row_2() {
    let input = "\n  # a comment\n  7:\n";
    let (rest, row) = row::<nom::error::Error<&str>>(input).unwrap();
    assert_eq!(row.state, 7);
    assert!(row.targets.is_empty());
    assert_eq!(rest, "\n");
}

fn states<'a, E: SpecError<'a>>(input: &'a str) -> nom::IResult<&'a str, u32, E> {
    let (input, _) = keyword("states").parse(input)?;
    let (input, _) = space1(input)?;

    integer(input)
}

fn alphabet<'a, E: SpecError<'a>>(input: &'a str) -> nom::IResult<&'a str, Vec<char>, E> {
    let (input, _) = keyword("alphabet").parse(input)?;
    let (input, _) = space1(input)?;

    separated_list1(space1, letter).parse(input)
}

#[test]
fn test_alphabet_1() {
    let input = "alphabet a b 0 1";
    let (_, letters) = alphabet::<nom::error::Error<&str>>(input).unwrap();
    assert_eq!(letters, vec!['a', 'b', '0', '1']);
}

fn transitions<'a, E: SpecError<'a>>(input: &'a str) -> nom::IResult<&'a str, Vec<SpecRow>, E> {
    let (input, _) = keyword("transitions").parse(input)?;

    many0(row).parse(input)
}

#[test]
fn test_transitions_1() {
    let input = r#"
    transitions
        1: 2 3
        2: - 3
    start 1"#;

    let (rest, rows) = transitions::<nom::error::Error<&str>>(input).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].targets, vec![None, Some(3)]);
    assert!(rest.trim_start().starts_with("start"));
}

fn start<'a, E: SpecError<'a>>(input: &'a str) -> nom::IResult<&'a str, u32, E> {
    let (input, _) = keyword("start").parse(input)?;
    let (input, _) = space1(input)?;

    integer(input)
}

fn accepting<'a, E: SpecError<'a>>(input: &'a str) -> nom::IResult<&'a str, Vec<u32>, E> {
    let (input, _) = keyword("accepting").parse(input)?;

    many0(preceded(space1, integer)).parse(input)
}

#[test]
fn test_accepting_empty() {
    let input = "accepting\n";
    let (_, states) = accepting::<nom::error::Error<&str>>(input).unwrap();
    assert!(states.is_empty());
}

/// A parsed DFA spec. It mirrors the textual format and still needs to be
/// turned into a [`DfaDescription`] and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaSpec {
    pub state_count: u32,
    pub alphabet: Vec<char>,
    pub rows: Vec<SpecRow>,
    pub start: u32,
    pub accepting: Vec<u32>,
}

impl DfaSpec {
    fn p(input: &str) -> nom::IResult<&str, DfaSpec, nom::error::Error<&str>> {
        let (input, state_count) = states(input)?;
        let (input, alphabet) = alphabet(input)?;
        let (input, rows) = transitions(input)?;
        let (input, start) = start(input)?;
        let (input, accepting) = accepting(input)?;
        let (input, _) = opt_whitespace(input)?;
        let (input, _) = eof(input)?;

        Ok((
            input,
            DfaSpec {
                state_count,
                alphabet,
                rows,
                start,
                accepting,
            },
        ))
    }

    pub fn parse(input: &str) -> anyhow::Result<DfaSpec> {
        match Self::p(input) {
            Ok((_, spec)) => Ok(spec),
            Err(e) => Err(anyhow::anyhow!("Failed to parse DFA spec: {}", e)),
        }
    }

    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<DfaSpec> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Converts the table into a description. Fails if a row does not have
    /// one entry per letter, names a state beyond `state_count` or is given
    /// twice.
    pub fn to_description(&self) -> anyhow::Result<DfaDescription<u32, char>> {
        let mut description = DfaDescription::new(self.alphabet.clone(), self.start)
            .with_states(1..=self.state_count)
            .with_accepting(self.accepting.iter().copied());

        let mut seen = HashSet::new();
        for row in &self.rows {
            if row.state == 0 || row.state > self.state_count {
                anyhow::bail!(
                    "Row for state {} but only states 1 to {} are declared",
                    row.state,
                    self.state_count
                );
            }
            if !seen.insert(row.state) {
                anyhow::bail!("State {} has more than one row", row.state);
            }
            if row.targets.len() != self.alphabet.len() {
                anyhow::bail!(
                    "Row for state {} has {} entries, expected one per letter ({})",
                    row.state,
                    row.targets.len(),
                    self.alphabet.len()
                );
            }

            for (letter, target) in self.alphabet.iter().zip(&row.targets) {
                if let Some(target) = target {
                    description.add_transition(row.state, *letter, *target);
                }
            }
        }

        Ok(description)
    }

    /// Writes a DFA over characters as a spec. States are renumbered to
    /// `1..=n` in node index order.
    pub fn from_dfa<N: AutomatonNode>(dfa: &DFA<N, char>) -> DfaSpec {
        let number = |state: petgraph::graph::NodeIndex<u32>| state.index() as u32 + 1;

        DfaSpec {
            state_count: dfa.state_count() as u32,
            alphabet: dfa.alphabet().to_vec(),
            rows: dfa
                .states()
                .map(|state| SpecRow {
                    state: number(state),
                    targets: dfa
                        .alphabet()
                        .iter()
                        .map(|letter| dfa.transition(state, letter).map(number))
                        .collect(),
                })
                .collect(),
            start: number(dfa.start()),
            accepting: dfa.accepting_states().map(number).collect(),
        }
    }
}

impl Display for DfaSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "states {}", self.state_count)?;
        write!(f, "alphabet")?;
        for letter in &self.alphabet {
            write!(f, " {}", letter)?;
        }
        writeln!(f)?;
        writeln!(f, "transitions")?;
        for row in &self.rows {
            write!(f, "    {}:", row.state)?;
            for target in &row.targets {
                match target {
                    Some(target) => write!(f, " {}", target)?,
                    None => write!(f, " -")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "start {}", self.start)?;
        write!(f, "accepting")?;
        for state in &self.accepting {
            write!(f, " {}", state)?;
        }
        writeln!(f)
    }
}

#[test]
fn test_spec_1() {
    let spec_str = r#"
    # scenario with a redundant state
    states 3
    alphabet a b
    transitions
        1: 2 3
        2: 2 3
        3: 2 -
    start 1
    accepting 3
    "#;

    let spec = DfaSpec::parse(spec_str).unwrap();
    assert_eq!(spec.state_count, 3);
    assert_eq!(spec.alphabet, vec!['a', 'b']);
    assert_eq!(spec.rows.len(), 3);
    assert_eq!(spec.rows[2].targets, vec![Some(2), None]);
    assert_eq!(spec.start, 1);
    assert_eq!(spec.accepting, vec![3]);
}

#[test]
fn test_spec_trailing_garbage() {
    let spec_str = "states 1\nalphabet a\ntransitions\nstart 1\naccepting 1\nfoo";
    assert!(DfaSpec::parse(spec_str).is_err());
}

#[test]
fn test_spec_display_parses_back() {
    let spec_str = "states 2\nalphabet x y\ntransitions\n    1: 2 -\n    2: 2 1\nstart 1\naccepting 2\n";
    let spec = DfaSpec::parse(spec_str).unwrap();
    assert_eq!(spec.to_string(), spec_str);
}
