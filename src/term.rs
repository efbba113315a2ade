//! Elixir Term Conversion Utilities
//!
//! Converts scanner elements, path programs and dash segments to Elixir terms.

use rustler::types::tuple::make_tuple;
use rustler::{Atom, Encoder, Env, NewBinary, Term};

use crate::core::{Attribute, ElementKind, TokenKind, XmlElement, XmlToken};
use crate::dash::CurveSegment;
use crate::error::{PathError, XmlError};
use crate::path::{PathOp, PathProgram, PathSegment};

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    error,
    // element kinds
    start_tag,
    end_tag,
    self_closing,
    content,
    comment,
    cdata,
    doctype,
    processing_instruction,
    xml_decl,
    entity,
    // token kinds
    lt,
    gt,
    slash,
    eq,
    name,
    string,
    text,
    // ops
    move_to,
    line_to,
    quad_to,
    cubic_to,
    arc_to,
    close,
    end,
    // error reasons
    unterminated,
    unknown_declaration,
    invalid_name,
    unterminated_string,
    unknown_command,
    unexpected_number,
    missing_arguments,
    invalid_number,
    invalid_flag,
}

/// Create a binary from bytes
pub fn bytes_to_binary<'a>(env: Env<'a>, bytes: &[u8]) -> Term<'a> {
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}

/// Build a list from terms produced in order
fn list_of<'a, I>(env: Env<'a>, items: I) -> Term<'a>
where
    I: DoubleEndedIterator<Item = Term<'a>>,
{
    let mut list = Term::list_new_empty(env);
    for item in items.rev() {
        list = list.list_prepend(item);
    }
    list
}

pub fn element_kind_atom(kind: ElementKind) -> Atom {
    match kind {
        ElementKind::StartTag => start_tag(),
        ElementKind::EndTag => end_tag(),
        ElementKind::SelfClosing => self_closing(),
        ElementKind::Content => content(),
        ElementKind::Comment => comment(),
        ElementKind::CData => cdata(),
        ElementKind::DocType => doctype(),
        ElementKind::ProcessingInstruction => processing_instruction(),
        ElementKind::XmlDecl => xml_decl(),
        ElementKind::Entity => entity(),
    }
}

/// `{kind, name, data}`
pub fn element_to_term<'a>(env: Env<'a>, element: &XmlElement<'_>) -> Term<'a> {
    (
        element_kind_atom(element.kind()),
        bytes_to_binary(env, element.name().as_bytes()),
        bytes_to_binary(env, element.data().as_bytes()),
    )
        .encode(env)
}

pub fn elements_to_term<'a>(env: Env<'a>, elements: &[XmlElement<'_>]) -> Term<'a> {
    list_of(env, elements.iter().map(|e| element_to_term(env, e)))
}

pub fn token_kind_atom(kind: TokenKind) -> Atom {
    match kind {
        TokenKind::Lt => lt(),
        TokenKind::Gt => gt(),
        TokenKind::Slash => slash(),
        TokenKind::Eq => eq(),
        TokenKind::Name => name(),
        TokenKind::String => string(),
        TokenKind::Text => text(),
    }
}

/// `[{kind, bytes}]`
pub fn tokens_to_term<'a>(env: Env<'a>, tokens: &[XmlToken<'_>]) -> Term<'a> {
    list_of(
        env,
        tokens
            .iter()
            .map(|t| (token_kind_atom(t.kind), bytes_to_binary(env, t.span.as_bytes())).encode(env)),
    )
}

/// `[{name, value}]`
pub fn attributes_to_term<'a>(env: Env<'a>, attrs: &[Attribute<'_>]) -> Term<'a> {
    list_of(
        env,
        attrs.iter().map(|a| {
            (
                bytes_to_binary(env, a.name.as_bytes()),
                bytes_to_binary(env, a.value.as_bytes()),
            )
                .encode(env)
        }),
    )
}

/// `{cmd, iteration, [args]}` with `cmd` as a one-letter binary
pub fn segment_to_term<'a>(env: Env<'a>, seg: &PathSegment) -> Term<'a> {
    let letter = [seg.command.letter() as u8];
    (bytes_to_binary(env, &letter), seg.iteration, seg.args().to_vec()).encode(env)
}

pub fn op_to_term<'a>(env: Env<'a>, op: &PathOp) -> Term<'a> {
    let f = |v: f64| v.encode(env);
    match *op {
        PathOp::MoveTo { x, y } => make_tuple(env, &[move_to().encode(env), f(x), f(y)]),
        PathOp::LineTo { x, y } => make_tuple(env, &[line_to().encode(env), f(x), f(y)]),
        PathOp::QuadTo { x1, y1, x, y } => {
            make_tuple(env, &[quad_to().encode(env), f(x1), f(y1), f(x), f(y)])
        }
        PathOp::CubicTo { x1, y1, x2, y2, x, y } => make_tuple(
            env,
            &[cubic_to().encode(env), f(x1), f(y1), f(x2), f(y2), f(x), f(y)],
        ),
        PathOp::ArcTo {
            rx,
            ry,
            x_axis_rotation,
            large_arc,
            sweep,
            x,
            y,
        } => make_tuple(
            env,
            &[
                arc_to().encode(env),
                f(rx),
                f(ry),
                f(x_axis_rotation),
                large_arc.encode(env),
                sweep.encode(env),
                f(x),
                f(y),
            ],
        ),
        PathOp::Close => close().encode(env),
        PathOp::End => end().encode(env),
    }
}

pub fn program_to_term<'a>(env: Env<'a>, program: &PathProgram) -> Term<'a> {
    list_of(env, program.iter().map(|op| op_to_term(env, op)))
}

/// `{curve_index, t0, t1, visible}`
pub fn curve_segment_to_term<'a>(env: Env<'a>, seg: &CurveSegment) -> Term<'a> {
    (seg.curve.0, seg.t0, seg.t1, seg.visible).encode(env)
}

pub fn path_error_reason(err: &PathError) -> Atom {
    match err {
        PathError::UnknownCommand { .. } => unknown_command(),
        PathError::UnexpectedNumber { .. } => unexpected_number(),
        PathError::MissingArguments { .. } => missing_arguments(),
        PathError::InvalidNumber { .. } => invalid_number(),
        PathError::InvalidFlag { .. } => invalid_flag(),
    }
}

pub fn xml_error_reason(err: &XmlError) -> Atom {
    match err {
        XmlError::Unterminated { .. } => unterminated(),
        XmlError::UnknownDeclaration { .. } => unknown_declaration(),
        XmlError::InvalidName { .. } => invalid_name(),
        XmlError::UnterminatedString { .. } => unterminated_string(),
    }
}

/// `{:error, {reason, offset}}`
pub fn path_error_to_term<'a>(env: Env<'a>, err: &PathError) -> Term<'a> {
    (error(), (path_error_reason(err), err.offset())).encode(env)
}

/// `{:error, {reason, offset}}`
pub fn xml_error_to_term<'a>(env: Env<'a>, err: &XmlError) -> Term<'a> {
    (error(), (xml_error_reason(err), err.offset())).encode(env)
}

/// `{:ok, program}` or `{:error, {reason, offset}}`
pub fn program_result_to_term<'a>(env: Env<'a>, result: &Result<PathProgram, PathError>) -> Term<'a> {
    match result {
        Ok(program) => (ok(), program_to_term(env, program)).encode(env),
        Err(e) => path_error_to_term(env, e),
    }
}
