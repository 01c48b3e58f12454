use winnow::ascii::dec_int;
use winnow::combinator::{alt, preceded, repeat};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

// -- Tokens -----------------------------------------------------------------

const DELIMITERS: [char; 3] = ['[', ']', ','];

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !DELIMITERS.contains(&c)
}

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., char::is_whitespace)
        .void()
        .parse_next(input)
}

fn delimiter<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    one_of(DELIMITERS).take().parse_next(input)
}

fn word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., is_word_char).parse_next(input)
}

fn token<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    preceded(ws, alt((delimiter, word))).parse_next(input)
}

fn tokens<'i>(input: &mut &'i str) -> ModalResult<Vec<&'i str>> {
    let tokens: Vec<&'i str> = repeat(0.., token).parse_next(input)?;
    ws.parse_next(input)?;
    Ok(tokens)
}

/// Split one line into tokens. `[`, `]` and `,` are always tokens of their
/// own, whether or not they are surrounded by whitespace.
pub(crate) fn tokenize(line: &str) -> Vec<&str> {
    // Every character is whitespace, a delimiter or a word character, so the
    // grammar accepts any line.
    tokens.parse(line).unwrap_or_default()
}

// -- Line classification ----------------------------------------------------

/// `#.*` as a whole-token match.
pub(crate) fn is_comment(first: &str) -> bool {
    first.starts_with('#')
}

fn level_number(input: &mut &str) -> ModalResult<i32> {
    dec_int::<_, i32, _>.parse_next(input)
}

/// The priority of a rule line, if `first` is a signed 32-bit integer.
pub(crate) fn level(first: &str) -> Option<i32> {
    level_number.parse(first).ok()
}

fn tag_name_syntax<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic()),
        take_while(1.., |c: char| c.is_ascii_alphanumeric()),
    )
        .take()
        .parse_next(input)
}

/// `[A-Za-z][A-Za-z0-9]+`
pub(crate) fn is_tag_name(first: &str) -> bool {
    tag_name_syntax.parse(first).is_ok()
}
